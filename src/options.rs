use indexmap::IndexMap;
use serde::Deserialize;

use crate::grammar::{ContainerDef, Modifier, SeparatorRole};

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Changes applied by [`Engine::configure`](crate::Engine::configure).
///
/// Every field is optional; unset fields leave the engine as it is.
/// Grammar maps are merged entry by entry, and a `null` entry removes
/// that character's role.
///
/// Deserializes from JSON, accepting both snake_case names and the short
/// names `advanced` and `force`:
///
/// ```
/// use tkpath::Options;
///
/// let options: Options = serde_json::from_str(r#"{
///     "separators": { "/": "property" },
///     "containers": { "<": { "closer": ">", "role": "evalProperty" } },
///     "prefixes": { "<": null, "^": "parent" },
///     "force": true
/// }"#).unwrap();
///
/// assert_eq!(options.auto_vivify, Some(true));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub prefixes: Option<IndexMap<char, Option<Modifier>>>,
    pub separators: Option<IndexMap<char, Option<SeparatorRole>>>,
    pub containers: Option<IndexMap<char, Option<ContainerDef>>>,
    /// Memoize token trees
    pub cache: Option<bool>,
    pub cache_capacity: Option<usize>,
    /// Reserved; stored but has no effect
    #[serde(alias = "advanced", alias = "advancedMode")]
    pub advanced_mode: Option<bool>,
    /// Create missing intermediate maps on write
    #[serde(alias = "force", alias = "autoVivify")]
    pub auto_vivify: Option<bool>,
    /// Limit on container nesting and recursive resolution
    #[serde(alias = "maxDepth")]
    pub max_depth: Option<usize>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_vivify(mut self, on: bool) -> Self {
        self.auto_vivify = Some(on);
        self
    }

    pub fn cache(mut self, on: bool) -> Self {
        self.cache = Some(on);
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn prefix(mut self, c: char, modifier: Option<Modifier>) -> Self {
        self.prefixes.get_or_insert_with(IndexMap::new).insert(c, modifier);
        self
    }

    pub fn separator(mut self, c: char, role: Option<SeparatorRole>) -> Self {
        self.separators.get_or_insert_with(IndexMap::new).insert(c, role);
        self
    }

    pub fn container(mut self, opener: char, def: Option<ContainerDef>) -> Self {
        self.containers.get_or_insert_with(IndexMap::new).insert(opener, def);
        self
    }

    pub(crate) fn touches_grammar(&self) -> bool {
        self.prefixes.is_some() || self.separators.is_some() || self.containers.is_some()
    }
}

/// Effective engine settings after all `configure` calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub cache: bool,
    pub cache_capacity: usize,
    pub advanced_mode: bool,
    pub auto_vivify: bool,
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cache: true,
            cache_capacity: crate::cache::DEFAULT_CAPACITY,
            advanced_mode: false,
            auto_vivify: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
