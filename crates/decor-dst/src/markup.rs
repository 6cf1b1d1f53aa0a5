/// A comment or line break kept around a structural node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Trivia {
    /// Full comment text including its `//` or `/* */` delimiters.
    Comment(String),
    Line,
}

impl Trivia {
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }
}

/// Trivia printed before a node's first token and after its last one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Markup {
    pub before: Vec<Trivia>,
    pub after: Vec<Trivia>,
}

impl Markup {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    pub fn before(before: Vec<Trivia>) -> Self {
        Self { before, after: Vec::new() }
    }

    pub fn after(after: Vec<Trivia>) -> Self {
        Self { before: Vec::new(), after }
    }
}
