use std::cell::RefCell;

use crate::{
    ast::{Token, TokenTree},
    cache::PathCache,
    error::{PathError, Result},
    evaluator::Evaluator,
    grammar::Grammar,
    lexer::Lexer,
    locator::{self, FindMode},
    options::{Options, Settings},
    value::Value,
};

/// A path given either as text or as an already tokenized tree
#[derive(Debug, Clone, Copy)]
pub enum PathRef<'a> {
    Text(&'a str),
    Tokens(&'a [Token]),
}

impl<'a> From<&'a str> for PathRef<'a> {
    fn from(text: &'a str) -> Self {
        PathRef::Text(text)
    }
}

impl<'a> From<&'a String> for PathRef<'a> {
    fn from(text: &'a String) -> Self {
        PathRef::Text(text)
    }
}

impl<'a> From<&'a [Token]> for PathRef<'a> {
    fn from(tokens: &'a [Token]) -> Self {
        PathRef::Tokens(tokens)
    }
}

impl<'a> From<&'a TokenTree> for PathRef<'a> {
    fn from(tokens: &'a TokenTree) -> Self {
        PathRef::Tokens(tokens)
    }
}

/// A path engine: one grammar, one set of settings, one token cache.
///
/// Engines are independent of each other, so differently configured
/// grammars can be used side by side. An engine is not `Sync`; share one
/// per thread or wrap it yourself.
///
/// # Examples
///
/// ```
/// use tkpath::{Engine, Value};
///
/// let engine = Engine::new();
/// let doc = Value::object([
///     ("accounts", Value::list([
///         Value::object([("id", Value::from("a1")), ("balance", Value::from(12))]),
///         Value::object([("id", Value::from("b2")), ("balance", Value::from(30))]),
///     ])),
/// ]);
///
/// assert_eq!(engine.get(&doc, "accounts.1.id", &[]), Some(Value::from("b2")));
/// assert_eq!(
///     engine.get(&doc, "accounts.1.bal*", &[]),
///     Some(Value::list([Value::from(30)])),
/// );
/// assert!(engine.set(&doc, "accounts.0.balance", Value::from(0), &[]));
/// assert_eq!(engine.get(&doc, "accounts.%1.balance", &[Value::from(0)]), Some(Value::from(0)));
/// ```
#[derive(Debug)]
pub struct Engine {
    grammar: Grammar,
    settings: Settings,
    cache: RefCell<PathCache>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with the default grammar and settings
    pub fn new() -> Self {
        let settings = Settings::default();
        Engine {
            grammar: Grammar::default(),
            cache: RefCell::new(PathCache::new(settings.cache_capacity)),
            settings,
        }
    }

    pub fn with_options(options: &Options) -> Result<Self> {
        let mut engine = Self::new();
        engine.configure(options)?;
        Ok(engine)
    }

    /// Apply options. Grammar changes affect later tokenizing only; trees
    /// already in the cache are kept. Disabling the cache empties it.
    pub fn configure(&mut self, options: &Options) -> Result<()> {
        if options.max_depth == Some(0) {
            return Err(PathError::Config("max_depth must be at least 1".into()));
        }
        if options.touches_grammar() {
            self.grammar.merge(
                options.prefixes.as_ref(),
                options.separators.as_ref(),
                options.containers.as_ref(),
            )?;
        }
        if let Some(depth) = options.max_depth {
            self.settings.max_depth = depth;
        }
        if let Some(on) = options.cache {
            self.settings.cache = on;
            if !on {
                self.cache.borrow_mut().clear();
            }
        }
        if let Some(capacity) = options.cache_capacity {
            self.settings.cache_capacity = capacity;
            self.cache.borrow_mut().resize(capacity);
        }
        if let Some(on) = options.advanced_mode {
            self.settings.advanced_mode = on;
        }
        if let Some(on) = options.auto_vivify {
            self.settings.auto_vivify = on;
        }
        tracing::debug!(settings = ?self.settings, "engine configured");
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Tokenize a path, consulting and filling the cache when enabled
    pub fn try_tokenize(&self, path: &str) -> Result<TokenTree> {
        if self.settings.cache {
            if let Some(tree) = self.cache.borrow_mut().get(path) {
                return Ok(tree);
            }
        }
        let tree = Lexer::new(&self.grammar, self.settings.max_depth)
            .tokenize(path)
            .inspect_err(|e| tracing::debug!(path, error = %e, "tokenize failed"))?;
        if self.settings.cache {
            self.cache.borrow_mut().insert(path, tree.clone());
        }
        Ok(tree)
    }

    pub fn tokenize(&self, path: &str) -> Option<TokenTree> {
        self.try_tokenize(path).ok()
    }

    pub fn is_valid(&self, path: &str) -> bool {
        self.try_tokenize(path).is_ok()
    }

    /// Escape every special character so `text` reads as one literal key
    pub fn escape(&self, text: &str) -> String {
        self.grammar.escape(text)
    }

    /// Resolve a path. With `new_value` the final step is assigned instead
    /// of read, and the assigned value (or list of them) is returned.
    pub fn resolve<'p>(
        &self,
        root: &Value,
        path: impl Into<PathRef<'p>>,
        new_value: Option<&Value>,
        args: &[Value],
    ) -> Result<Value> {
        let evaluator = Evaluator::new(args, self.settings.auto_vivify, self.settings.max_depth);
        let result = match path.into() {
            PathRef::Text(text) if !self.grammar.needs_tokenizer(text) => {
                evaluator.resolve_flat(root, text, self.grammar.property_separator(), new_value)
            }
            PathRef::Text(text) => {
                let tree = self.try_tokenize(text)?;
                evaluator.resolve(root, &tree, new_value)
            }
            PathRef::Tokens(tree) => evaluator.resolve(root, tree, new_value),
        };
        result.inspect_err(|e| {
            tracing::debug!(error = %e, write = new_value.is_some(), "resolution failed")
        })
    }

    pub fn try_get<'p>(
        &self,
        root: &Value,
        path: impl Into<PathRef<'p>>,
        args: &[Value],
    ) -> Result<Value> {
        self.resolve(root, path, None, args)
    }

    /// Read the value at `path`; `None` on any failure
    pub fn get<'p>(
        &self,
        root: &Value,
        path: impl Into<PathRef<'p>>,
        args: &[Value],
    ) -> Option<Value> {
        self.try_get(root, path, args).ok()
    }

    pub fn try_set<'p>(
        &self,
        root: &Value,
        path: impl Into<PathRef<'p>>,
        value: Value,
        args: &[Value],
    ) -> Result<()> {
        self.resolve(root, path, Some(&value), args).map(|_| ())
    }

    /// Assign `value` at `path`. True when every targeted location was set.
    pub fn set<'p>(
        &self,
        root: &Value,
        path: impl Into<PathRef<'p>>,
        value: Value,
        args: &[Value],
    ) -> bool {
        self.try_set(root, path, value, args).is_ok()
    }

    /// Flat paths to nodes equal to `target`
    pub fn find(&self, root: &Value, target: &Value, mode: FindMode) -> Option<Vec<String>> {
        locator::find(&self.grammar, root, target, mode, self.settings.max_depth)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }
}
