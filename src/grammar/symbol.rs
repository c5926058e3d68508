use std::fmt::Display;

pub const EMPTY: &str = "";
pub const EPSILON: &str = "<empty>";
pub const START: &str = "<start>";

// The base unit in a grammar rule. Nonterminals are written in angle
// brackets, everything else is a terminal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl Into<String>) -> Self {
        Symbol(value.into())
    }

    pub fn empty() -> Self {
        Symbol::new(EMPTY)
    }

    pub fn epsilon() -> Self {
        Symbol::new(EPSILON)
    }

    pub fn start() -> Self {
        Symbol::new(START)
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    fn is_bracketed(&self) -> bool {
        self.0.starts_with('<')
    }

    pub fn is_epsilon(&self) -> bool {
        self.0 == EPSILON
    }

    /// Epsilon is bracketed but never expanded, so it counts as neither a
    /// terminal nor a nonterminal.
    pub fn is_non_terminal(&self) -> bool {
        self.is_bracketed() && !self.is_epsilon()
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_bracketed()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.0.contains(text)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Symbol(value)
    }
}
