use crate::grammar::Modifier;

/// Prefix modifiers seen before a word, counted per kind.
///
/// Counts matter only for `parent`, where `<<x` steps back two frames;
/// the others behave the same whether seen once or several times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub parent: usize,
    pub root: usize,
    pub placeholder: usize,
    pub context: usize,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        *self == Modifiers::default()
    }

    pub fn add(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Parent => self.parent += 1,
            Modifier::Root => self.root += 1,
            Modifier::Placeholder => self.placeholder += 1,
            Modifier::Context => self.context += 1,
        }
    }

    pub fn parent(levels: usize) -> Self {
        Modifiers {
            parent: levels,
            ..Default::default()
        }
    }

    pub fn root() -> Self {
        Modifiers {
            root: 1,
            ..Default::default()
        }
    }

    pub fn placeholder() -> Self {
        Modifiers {
            placeholder: 1,
            ..Default::default()
        }
    }

    pub fn context() -> Self {
        Modifiers {
            context: 1,
            ..Default::default()
        }
    }
}
