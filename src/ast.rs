//! # tkpath - Token Tree
//!
//! This module defines the parsed form of a path expression.
//!
//! - **[tokens]** - [`Token`] variants and the [`TokenTree`] alias
//! - **[modifiers]** - prefix modifier counts attached to a word
//!
//! ## Quick Start
//!
//! ```text
//! accounts.1.sav*,[~meta.key].sort()
//! ```
//!
//! tokenizes (default grammar) as:
//!
//! ```text
//! Word("accounts")
//! Word("1")
//! Collection([
//!     Modified { word: "sav*", mods: {} },
//!     Container { role: Property, tree: [Modified { word: "meta", mods: { root: 1 } }, Word("key")] },
//! ])
//! Word("sort")
//! Container { role: Call, tree: [] }
//! ```
//!
//! ## Core Concepts
//!
//! ### Words
//!
//! A run of ordinary characters is a word. Prefixes (`<`, `~`, `%`, `@`)
//! in front of it, or a `*` inside it, turn it into a modified word.
//!
//! ### Containers
//!
//! - `[a.b]` - nested path, spliced into the outer path
//! - `'a.b'`, `"a.b"` - literal key text
//! - `f(x,y)` - call with arguments
//! - `m{k}` - computed key
//!
//! ### Collections
//!
//! Comma-separated alternatives resolved against the same context, their
//! results concatenated into one list.
pub mod modifiers;
pub mod tokens;

pub use modifiers::Modifiers;
pub use tokens::{Token, TokenTree};
