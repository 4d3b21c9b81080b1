//! Exhaustive search for a value inside a data graph.
//!
//! The locator knows nothing about path syntax beyond the property
//! separator and escaping: it walks every node in pre-order and reports
//! where the target occurs as flat paths (`accounts.1.checking`).

use crate::{grammar::Grammar, value::Value};

/// How many matches [`find`] collects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FindMode {
    /// Stop at the first match
    #[default]
    One,
    /// Collect every match
    Many,
}

/// Paths to nodes equal to `target`, in pre-order. `None` when nothing
/// matches.
///
/// Lists and maps match only the very handle passed as `target`, never a
/// structurally equal copy. The root itself is not compared. A matching
/// node is not searched further, and containers already on the current
/// branch are skipped so cyclic graphs terminate. Keys containing special characters are
/// escaped so every path can be fed back to the resolver.
pub fn find(
    grammar: &Grammar,
    root: &Value,
    target: &Value,
    mode: FindMode,
    max_depth: usize,
) -> Option<Vec<String>> {
    let mut locator = Locator {
        grammar,
        target,
        mode,
        max_depth,
        found: Vec::new(),
        segments: Vec::new(),
        branch: Vec::new(),
    };
    locator.descend(root);
    if locator.found.is_empty() {
        None
    } else {
        Some(locator.found)
    }
}

struct Locator<'a> {
    grammar: &'a Grammar,
    target: &'a Value,
    mode: FindMode,
    max_depth: usize,
    found: Vec<String>,
    segments: Vec<String>,
    // container identities on the current branch
    branch: Vec<usize>,
}

impl Locator<'_> {
    /// Returns false once the search should stop
    fn descend(&mut self, node: &Value) -> bool {
        let Some(id) = node.container_id() else {
            return true;
        };
        if self.branch.contains(&id) {
            return true;
        }
        if self.segments.len() >= self.max_depth {
            tracing::debug!(depth = self.segments.len(), "locator depth limit reached");
            return true;
        }

        let children: Vec<(String, Value)> = match node {
            Value::Map(map) => map
                .borrow()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            Value::List(list) => list
                .borrow()
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect(),
            _ => Vec::new(),
        };

        self.branch.push(id);
        let mut more = true;
        for (key, child) in children {
            self.segments.push(self.grammar.escape(&key));
            more = self.visit(&child);
            self.segments.pop();
            if !more {
                break;
            }
        }
        self.branch.pop();
        more
    }

    fn visit(&mut self, node: &Value) -> bool {
        if self.is_target(node) {
            let separator = self.grammar.property_separator().to_string();
            self.found.push(self.segments.join(&separator));
            return self.mode == FindMode::Many;
        }
        self.descend(node)
    }

    /// Containers match by identity, scalars by value
    fn is_target(&self, node: &Value) -> bool {
        match (node.container_id(), self.target.container_id()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => node == self.target,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> Grammar {
        Grammar::new().unwrap()
    }

    #[test]
    fn finds_first_match_in_preorder() {
        let doc = Value::object([
            ("a", Value::list([Value::from(1), Value::from(2)])),
            ("b", Value::object([("c", Value::from(2))])),
        ]);
        let found = find(&grammar(), &doc, &Value::from(2), FindMode::One, 16);
        assert_eq!(found, Some(vec!["a.1".to_string()]));
    }

    #[test]
    fn finds_every_match() {
        let doc = Value::object([
            ("a", Value::list([Value::from(1), Value::from(2)])),
            ("b", Value::object([("c", Value::from(2))])),
        ]);
        let found = find(&grammar(), &doc, &Value::from(2), FindMode::Many, 16);
        assert_eq!(found, Some(vec!["a.1".to_string(), "b.c".to_string()]));
    }

    #[test]
    fn no_match_is_none() {
        let doc = Value::object([("a", Value::from(1))]);
        assert_eq!(find(&grammar(), &doc, &Value::from(9), FindMode::Many, 16), None);
    }

    #[test]
    fn special_keys_are_escaped() {
        let doc = Value::object([("a.b", Value::from(true))]);
        let found = find(&grammar(), &doc, &Value::from(true), FindMode::One, 16);
        assert_eq!(found, Some(vec!["a\\.b".to_string()]));
    }

    #[test]
    fn cycles_terminate() {
        let doc = Value::object([("x", Value::from(1))]);
        let inner = Value::list([Value::from(0)]);
        doc.set_key("inner", inner.clone()).unwrap();
        inner.set_key("1", doc.clone()).unwrap();
        let found = find(&grammar(), &doc, &Value::from(7), FindMode::Many, 64);
        assert_eq!(found, None);
    }

    #[test]
    fn container_target_in_cycle() {
        let inner = Value::object([("n", Value::from(1))]);
        inner.set_key("self", inner.clone()).unwrap();
        let doc = Value::object([("x", inner.clone())]);
        let found = find(&grammar(), &doc, &inner, FindMode::Many, 64);
        assert_eq!(found, Some(vec!["x".to_string()]));
    }

    #[test]
    fn equal_copy_is_not_the_target() {
        let doc = Value::object([("a", Value::list([Value::from(1)]))]);
        let copy = Value::list([Value::from(1)]);
        assert_eq!(find(&grammar(), &doc, &copy, FindMode::One, 16), None);
    }
}
