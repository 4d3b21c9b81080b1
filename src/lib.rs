//! Path expressions for reading and writing nested in-memory data.
//!
//! The free functions below use a per-thread default [`Engine`]; build your
//! own engine when you need a differently configured grammar.

use std::cell::RefCell;

pub mod ast;
pub mod cache;
pub mod cli;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod grammar;
pub mod lexer;
pub mod locator;
pub mod methods;
pub mod options;
pub mod value;
pub mod wildcard;

pub use ast::{Modifiers, Token, TokenTree};
pub use engine::{Engine, PathRef};
pub use error::{ErrorKind, PathError};
pub use grammar::{ContainerDef, ContainerRole, Grammar, Modifier, SeparatorRole};
pub use locator::FindMode;
pub use options::{Options, Settings};
pub use value::{Callable, Value};

thread_local! {
    static DEFAULT_ENGINE: RefCell<Engine> = RefCell::new(Engine::new());
}

fn with_default<T>(f: impl FnOnce(&Engine) -> T) -> T {
    DEFAULT_ENGINE.with(|engine| f(&engine.borrow()))
}

pub fn tokenize(path: &str) -> Option<TokenTree> {
    with_default(|engine| engine.tokenize(path))
}

pub fn is_valid(path: &str) -> bool {
    with_default(|engine| engine.is_valid(path))
}

pub fn escape(text: &str) -> String {
    with_default(|engine| engine.escape(text))
}

pub fn get<'p>(root: &Value, path: impl Into<PathRef<'p>>, args: &[Value]) -> Option<Value> {
    with_default(|engine| engine.get(root, path, args))
}

pub fn set<'p>(root: &Value, path: impl Into<PathRef<'p>>, value: Value, args: &[Value]) -> bool {
    with_default(|engine| engine.set(root, path, value, args))
}

pub fn find(root: &Value, target: &Value, mode: FindMode) -> Option<Vec<String>> {
    with_default(|engine| engine.find(root, target, mode))
}

/// Reconfigure the default engine of the calling thread.
///
/// Fails with [`PathError::Config`] when called from inside a callable
/// that the default engine is currently resolving.
pub fn configure(options: &Options) -> Result<(), PathError> {
    DEFAULT_ENGINE.with(|engine| {
        let mut engine = engine
            .try_borrow_mut()
            .map_err(|_| PathError::Config("default engine is busy resolving".into()))?;
        engine.configure(options)
    })
}
