//! Memoized token trees, keyed by the exact path string.
//!
//! The cache is bounded; the least recently used tree is evicted first.
//! Trees stay valid across grammar changes until evicted or cleared.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::ast::TokenTree;

pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug)]
pub struct PathCache {
    entries: LruCache<String, TokenTree>,
}

impl PathCache {
    pub fn new(capacity: usize) -> Self {
        PathCache {
            entries: LruCache::new(bounded(capacity)),
        }
    }

    pub fn get(&mut self, path: &str) -> Option<TokenTree> {
        let hit = self.entries.get(path).cloned();
        match &hit {
            Some(_) => tracing::debug!(path, "token cache hit"),
            None => tracing::debug!(path, "token cache miss"),
        }
        hit
    }

    pub fn insert(&mut self, path: &str, tree: TokenTree) {
        self.entries.put(path.to_string(), tree);
    }

    pub fn resize(&mut self, capacity: usize) {
        self.entries.resize(bounded(capacity));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn bounded(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}
