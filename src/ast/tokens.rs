use crate::{ast::Modifiers, grammar::ContainerRole};

/// The parsed form of one path string, or of one container's interior.
pub type TokenTree = Vec<Token>;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal key with no modifiers and no wildcard
    ///
    /// # Examples
    /// ```text
    /// accounts
    /// 0
    /// 'a.b'      (quote container, stored as the text a.b)
    /// ```
    Word(String),

    /// Word carrying prefix modifiers, or containing the wildcard
    ///
    /// # Examples
    /// ```text
    /// <sibling     parent = 1
    /// ~top         root = 1
    /// %1           placeholder = 1, word "1"
    /// @2           context = 1, word "2"
    /// sav*         no modifiers, wildcard word
    /// ```
    Modified { word: String, mods: Modifiers },

    /// Container whose interior is kept as one nested unit
    ///
    /// Only call and evalProperty containers appear at the top level of a
    /// tree; property containers are spliced and quotes become words.
    /// Inside a collection any role may appear.
    ///
    /// # Examples
    /// ```text
    /// fn(a,b)      Container { role: Call, .. }
    /// map{~key}    Container { role: EvalProperty, .. }
    /// ```
    Container {
        tree: TokenTree,
        role: ContainerRole,
    },

    /// Comma-grouped alternatives resolved against one shared context
    ///
    /// # Examples
    /// ```text
    /// items.0,2
    /// a*,[b.c]
    /// ```
    Collection(Vec<Token>),
}

impl Token {
    pub fn word(w: impl Into<String>) -> Self {
        Token::Word(w.into())
    }

    pub fn modified(w: impl Into<String>, mods: Modifiers) -> Self {
        Token::Modified {
            word: w.into(),
            mods,
        }
    }

    pub fn container(tree: TokenTree, role: ContainerRole) -> Self {
        Token::Container { tree, role }
    }
}
