//! Grammar table consulted by the lexer.
//!
//! Three character tables drive tokenizing: prefixes (modifiers placed in
//! front of a word), separators and containers. The table also owns the
//! regular expressions derived from it, rebuilt on every change.

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::error::{PathError, Result};

/// Wildcard character inside words. Not configurable.
pub const WILDCARD: char = '*';

/// Escape character. Not configurable.
pub const ESCAPE: char = '\\';

/// Effect of a prefix character on the word that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    /// Step back through the value stack (`<`)
    Parent,
    /// Restart from the root (`~`)
    Root,
    /// Substitute a positional argument as the key (`%`)
    Placeholder,
    /// Replace the context with a positional argument (`@`)
    Context,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeparatorRole {
    Property,
    Collection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerRole {
    /// Interior is a nested path spliced into the outer one
    Property,
    /// Interior is literal text
    Quote,
    /// Interior is an argument list
    Call,
    /// Interior is resolved and its value used as a key
    EvalProperty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ContainerDef {
    pub closer: char,
    #[serde(alias = "exec")]
    pub role: ContainerRole,
}

impl ContainerDef {
    pub fn new(closer: char, role: ContainerRole) -> Self {
        ContainerDef { closer, role }
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    prefixes: IndexMap<char, Modifier>,
    separators: IndexMap<char, SeparatorRole>,
    containers: IndexMap<char, ContainerDef>,
    property_separator: char,
    /// Anything that forces the tokenizer, i.e. every special except the
    /// property separator
    flat_specials: Regex,
    /// Every special character including closers and the escape character
    all_specials: Regex,
    escape_pair: Regex,
}

impl Grammar {
    pub fn new() -> Result<Self> {
        let prefixes = IndexMap::from([
            ('<', Modifier::Parent),
            ('~', Modifier::Root),
            ('%', Modifier::Placeholder),
            ('@', Modifier::Context),
        ]);
        let separators = IndexMap::from([
            ('.', SeparatorRole::Property),
            (',', SeparatorRole::Collection),
        ]);
        let containers = IndexMap::from([
            ('[', ContainerDef::new(']', ContainerRole::Property)),
            ('\'', ContainerDef::new('\'', ContainerRole::Quote)),
            ('"', ContainerDef::new('"', ContainerRole::Quote)),
            ('(', ContainerDef::new(')', ContainerRole::Call)),
            ('{', ContainerDef::new('}', ContainerRole::EvalProperty)),
        ]);
        Self::build(prefixes, separators, containers)
    }

    fn build(
        prefixes: IndexMap<char, Modifier>,
        separators: IndexMap<char, SeparatorRole>,
        containers: IndexMap<char, ContainerDef>,
    ) -> Result<Self> {
        let mut property = separators
            .iter()
            .filter(|(_, role)| **role == SeparatorRole::Property)
            .map(|(c, _)| *c);
        let property_separator = property
            .next()
            .ok_or_else(|| PathError::Config("no property separator is configured".into()))?;
        if property.next().is_some() {
            return Err(PathError::Config(
                "more than one property separator is configured".into(),
            ));
        }

        let mut flat = vec![ESCAPE, WILDCARD];
        flat.extend(prefixes.keys());
        flat.extend(separators.keys().filter(|c| **c != property_separator));
        flat.extend(containers.keys());
        flat.extend(containers.values().map(|def| def.closer));

        let mut all = flat.clone();
        all.push(property_separator);

        Ok(Grammar {
            flat_specials: char_class(&flat)?,
            all_specials: char_class(&all)?,
            escape_pair: Regex::new(r"(?s)\\(.)").map_err(|e| PathError::Config(e.to_string()))?,
            prefixes,
            separators,
            containers,
            property_separator,
        })
    }

    /// Merge entries into the tables. `None` removes a character's role.
    ///
    /// A newly configured property separator replaces the previous one.
    pub fn merge(
        &mut self,
        prefixes: Option<&IndexMap<char, Option<Modifier>>>,
        separators: Option<&IndexMap<char, Option<SeparatorRole>>>,
        containers: Option<&IndexMap<char, Option<ContainerDef>>>,
    ) -> Result<()> {
        let empty_prefixes = IndexMap::new();
        let empty_separators = IndexMap::new();
        let empty_containers = IndexMap::new();
        let prefixes = prefixes.unwrap_or(&empty_prefixes);
        let separators = separators.unwrap_or(&empty_separators);
        let containers = containers.unwrap_or(&empty_containers);

        for c in prefixes.keys().chain(separators.keys()).chain(containers.keys()) {
            reject_reserved(*c)?;
        }
        for def in containers.values().flatten() {
            reject_reserved(def.closer)?;
        }

        let mut new_prefixes = self.prefixes.clone();
        merge_entries(&mut new_prefixes, prefixes);

        let mut new_separators = self.separators.clone();
        let replaces_property = separators
            .values()
            .any(|role| *role == Some(SeparatorRole::Property));
        if replaces_property {
            new_separators.retain(|_, role| *role != SeparatorRole::Property);
        }
        merge_entries(&mut new_separators, separators);

        let mut new_containers = self.containers.clone();
        merge_entries(&mut new_containers, containers);

        *self = Self::build(new_prefixes, new_separators, new_containers)?;
        tracing::debug!(
            property_separator = %self.property_separator,
            "grammar reconfigured"
        );
        Ok(())
    }

    pub fn prefix(&self, c: char) -> Option<Modifier> {
        self.prefixes.get(&c).copied()
    }

    pub fn separator(&self, c: char) -> Option<SeparatorRole> {
        self.separators.get(&c).copied()
    }

    pub fn container(&self, c: char) -> Option<ContainerDef> {
        self.containers.get(&c).copied()
    }

    pub fn is_closer(&self, c: char) -> bool {
        self.containers.values().any(|def| def.closer == c)
    }

    pub fn property_separator(&self) -> char {
        self.property_separator
    }

    pub fn is_special(&self, c: char) -> bool {
        c == ESCAPE
            || c == WILDCARD
            || self.prefixes.contains_key(&c)
            || self.separators.contains_key(&c)
            || self.containers.contains_key(&c)
            || self.containers.values().any(|def| def.closer == c)
    }

    /// True when the path must go through the tokenizer
    pub fn needs_tokenizer(&self, path: &str) -> bool {
        self.flat_specials.is_match(path)
    }

    /// Prefix every special character with the escape character
    pub fn escape(&self, text: &str) -> String {
        self.all_specials
            .replace_all(text, |caps: &regex::Captures| format!("{}{}", ESCAPE, &caps[0]))
            .into_owned()
    }

    /// Drop escapes in front of characters that are not special.
    ///
    /// Pairs are consumed left to right, so an escaped escape character is
    /// never mistaken for the start of a new pair.
    pub fn strip_needless_escapes<'a>(&self, path: &'a str) -> std::borrow::Cow<'a, str> {
        self.escape_pair
            .replace_all(path, |caps: &regex::Captures| {
                let escaped = &caps[1];
                match escaped.chars().next() {
                    Some(c) if self.is_special(c) => format!("{}{}", ESCAPE, escaped),
                    _ => escaped.to_string(),
                }
            })
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new().expect("default grammar characters form valid patterns")
    }
}

fn char_class(chars: &[char]) -> Result<Regex> {
    let mut class = String::from("[");
    for c in chars {
        class.push_str(&regex::escape(&c.to_string()));
    }
    class.push(']');
    Regex::new(&class).map_err(|e| PathError::Config(e.to_string()))
}

fn reject_reserved(c: char) -> Result<()> {
    if c == ESCAPE || c == WILDCARD {
        return Err(PathError::Config(format!(
            "'{}' is reserved and cannot be given a grammar role",
            c
        )));
    }
    Ok(())
}

fn merge_entries<T: Copy>(table: &mut IndexMap<char, T>, entries: &IndexMap<char, Option<T>>) {
    for (c, entry) in entries {
        match entry {
            Some(value) => {
                table.insert(*c, *value);
            }
            None => {
                table.shift_remove(c);
            }
        }
    }
}
