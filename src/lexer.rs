use std::mem;

use crate::{
    ast::{Modifiers, Token, TokenTree},
    error::{PathError, Result},
    grammar::{ContainerDef, ContainerRole, ESCAPE, Grammar, SeparatorRole, WILDCARD},
};

/// Turns path strings into token trees under a grammar.
pub struct Lexer<'g> {
    grammar: &'g Grammar,
    max_depth: usize,
}

impl<'g> Lexer<'g> {
    pub fn new(grammar: &'g Grammar, max_depth: usize) -> Self {
        Lexer { grammar, max_depth }
    }

    pub fn tokenize(&self, path: &str) -> Result<TokenTree> {
        self.tokenize_nested(path, 0)
    }

    fn tokenize_nested(&self, path: &str, level: usize) -> Result<TokenTree> {
        if level > self.max_depth {
            return Err(PathError::DepthExceeded(self.max_depth));
        }
        let path = self.grammar.strip_needless_escapes(path);
        Scan::new(self, &path, level).run()
    }
}

/// State of one left-to-right pass over a single path string
struct Scan<'l, 'g> {
    lexer: &'l Lexer<'g>,
    input: Vec<char>,
    position: usize,
    level: usize,
    tokens: TokenTree,
    collection: Vec<Token>,
    word: String,
    mods: Modifiers,
    has_wildcard: bool,
    // whether the current segment produced a word or a container yet
    segment_filled: bool,
    seen_separator: bool,
}

impl<'l, 'g> Scan<'l, 'g> {
    fn new(lexer: &'l Lexer<'g>, path: &str, level: usize) -> Self {
        Scan {
            lexer,
            input: path.chars().collect(),
            position: 0,
            level,
            tokens: Vec::new(),
            collection: Vec::new(),
            word: String::new(),
            mods: Modifiers::default(),
            has_wildcard: false,
            segment_filled: false,
            seen_separator: false,
        }
    }

    fn grammar(&self) -> &'g Grammar {
        self.lexer.grammar
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn run(mut self) -> Result<TokenTree> {
        while let Some(ch) = self.current_char() {
            let grammar = self.grammar();
            if ch == ESCAPE {
                let literal = self.peek_char(1).ok_or_else(|| {
                    PathError::syntax(self.position, "path ends with an unmatched escape")
                })?;
                self.push_char(literal);
                self.position += 2;
            } else if let Some(modifier) = grammar.prefix(ch) {
                self.mods.add(modifier);
                self.advance();
            } else if let Some(role) = grammar.separator(ch) {
                self.separator(role)?;
                self.advance();
            } else if let Some(def) = grammar.container(ch) {
                self.container(ch, def)?;
            } else if grammar.is_closer(ch) {
                return Err(PathError::syntax(
                    self.position,
                    format!("'{}' has no matching opener", ch),
                ));
            } else {
                if ch == WILDCARD {
                    self.has_wildcard = true;
                }
                self.push_char(ch);
                self.advance();
            }
        }
        self.finish()
    }

    fn push_char(&mut self, ch: char) {
        self.word.push(ch);
        self.segment_filled = true;
    }

    /// Take the accumulated word as a token, if any.
    ///
    /// Modifiers with no word to apply to are a syntax error.
    fn take_word(&mut self) -> Result<Option<Token>> {
        if self.word.is_empty() {
            if !self.mods.is_empty() {
                return Err(PathError::syntax(
                    self.position,
                    "modifier prefix is not followed by a word",
                ));
            }
            return Ok(None);
        }
        let word = mem::take(&mut self.word);
        let token = if !self.mods.is_empty() || self.has_wildcard {
            Token::Modified {
                word,
                mods: mem::take(&mut self.mods),
            }
        } else {
            Token::Word(word)
        };
        self.has_wildcard = false;
        Ok(Some(token))
    }

    /// Route a committed token into the open collection, or the output
    fn commit(&mut self, token: Token) {
        if self.collection.is_empty() {
            self.tokens.push(token);
        } else {
            self.collection.push(token);
        }
    }

    fn close_collection(&mut self) {
        if !self.collection.is_empty() {
            let members = mem::take(&mut self.collection);
            self.tokens.push(Token::Collection(members));
        }
    }

    fn separator(&mut self, role: SeparatorRole) -> Result<()> {
        let word = self.take_word()?;
        if word.is_none() && !self.segment_filled {
            return Err(PathError::syntax(self.position, "empty path segment"));
        }
        match role {
            SeparatorRole::Property => {
                if let Some(token) = word {
                    self.commit(token);
                }
                self.close_collection();
            }
            SeparatorRole::Collection => {
                if let Some(token) = word {
                    self.collection.push(token);
                }
            }
        }
        self.segment_filled = false;
        self.seen_separator = true;
        Ok(())
    }

    fn container(&mut self, opener: char, def: ContainerDef) -> Result<()> {
        if let Some(token) = self.take_word()? {
            self.commit(token);
        }
        let subpath = self.read_container(opener, def)?;

        let before_collection_separator = self
            .current_char()
            .is_some_and(|ch| self.grammar().separator(ch) == Some(SeparatorRole::Collection));

        if before_collection_separator || !self.collection.is_empty() {
            let member = match def.role {
                ContainerRole::Quote => Token::Word(unescape(&subpath)),
                role => Token::Container {
                    tree: self.nested(&subpath)?,
                    role,
                },
            };
            self.collection.push(member);
            if !before_collection_separator {
                self.close_collection();
            }
        } else {
            match def.role {
                ContainerRole::Property => {
                    let tree = self.nested(&subpath)?;
                    self.tokens.extend(tree);
                }
                ContainerRole::Quote => self.tokens.push(Token::Word(unescape(&subpath))),
                role => {
                    let tree = self.nested(&subpath)?;
                    self.tokens.push(Token::Container { tree, role });
                }
            }
        }
        self.segment_filled = true;
        Ok(())
    }

    fn nested(&self, subpath: &str) -> Result<TokenTree> {
        self.lexer.tokenize_nested(subpath, self.level + 1)
    }

    /// Read raw text up to the closer matching `opener`, consuming both.
    ///
    /// Escapes are kept in the returned text so the nested tokenize sees
    /// them. A quote uses one character for both ends, so for quotes the
    /// depth never grows past one.
    fn read_container(&mut self, opener: char, def: ContainerDef) -> Result<String> {
        let start = self.position;
        self.advance();
        let mut depth = 1usize;
        let mut subpath = String::new();

        while let Some(ch) = self.current_char() {
            if ch == ESCAPE {
                let literal = self.peek_char(1).ok_or_else(|| {
                    PathError::syntax(self.position, "path ends with an unmatched escape")
                })?;
                subpath.push(ESCAPE);
                subpath.push(literal);
                self.position += 2;
                continue;
            }
            if ch == def.closer {
                depth -= 1;
                if depth == 0 {
                    self.advance();
                    return Ok(subpath);
                }
            } else if ch == opener {
                depth += 1;
            }
            subpath.push(ch);
            self.advance();
        }

        Err(PathError::syntax(
            start,
            format!("'{}' is never closed with '{}'", opener, def.closer),
        ))
    }

    fn finish(mut self) -> Result<TokenTree> {
        match self.take_word()? {
            Some(token) => self.commit(token),
            None if self.seen_separator && !self.segment_filled => {
                return Err(PathError::syntax(self.position, "path ends with a separator"));
            }
            None => {}
        }
        self.close_collection();
        Ok(self.tokens)
    }
}

/// Resolve escapes in quoted text: each escaped character stands for itself
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
fn lex(path: &str) -> Result<TokenTree> {
    let grammar = Grammar::new()?;
    Lexer::new(&grammar, 64).tokenize(path)
}

#[test]
fn test_plain_words() {
    assert_eq!(
        lex("a.b.c").unwrap(),
        vec![Token::word("a"), Token::word("b"), Token::word("c")]
    );
}

#[test]
fn test_quote_keeps_specials() {
    assert_eq!(
        lex("a.'b.c'").unwrap(),
        vec![Token::word("a"), Token::word("b.c")]
    );
    assert_eq!(lex("'it\\'s'").unwrap(), vec![Token::word("it's")]);
}

#[test]
fn test_nesting_limit() {
    let grammar = Grammar::new().unwrap();
    let lexer = Lexer::new(&grammar, 3);
    assert!(lexer.tokenize("a{b{c}}").is_ok());
    let err = lexer.tokenize("a{b{c{d{e{f}}}}}").unwrap_err();
    assert_eq!(err, PathError::DepthExceeded(3));
}
