use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

use itertools::Itertools;

use super::symbol::Symbol;
use super::GrammarError;

// The left side of a rule. Always holds exactly one nonterminal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonTerminal(Symbol);

impl NonTerminal {
    pub fn start() -> Self {
        NonTerminal(Symbol::start())
    }

    pub fn symbol(&self) -> &Symbol {
        &self.0
    }
}

impl TryFrom<Symbol> for NonTerminal {
    type Error = GrammarError;

    fn try_from(symbol: Symbol) -> Result<Self, Self::Error> {
        if symbol.is_non_terminal() {
            Ok(NonTerminal(symbol))
        } else {
            Err(GrammarError::NotANonTerminal(symbol))
        }
    }
}

impl TryFrom<&str> for NonTerminal {
    type Error = GrammarError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        NonTerminal::try_from(Symbol::new(value))
    }
}

impl Display for NonTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One alternative of a rule: an ordered symbol sequence plus the ids of
/// the code coverage units it is tied to.
///
/// Identity (equality, ordering, hashing) only looks at the symbol
/// sequence. Coverage is metadata.
#[derive(Debug, Clone)]
pub struct Production {
    values: Vec<Symbol>,
    coverage: BTreeSet<u64>,
    terminals: Vec<Symbol>,
    non_terminals: Vec<Symbol>,
}

impl Production {
    pub fn new(values: Vec<Symbol>) -> Self {
        Production::with_coverage(values, BTreeSet::new())
    }

    pub fn with_coverage(values: Vec<Symbol>, coverage: impl IntoIterator<Item = u64>) -> Self {
        let terminals = values.iter().filter(|s| s.is_terminal()).cloned().collect();
        let non_terminals = values.iter().filter(|s| s.is_non_terminal()).cloned().collect();

        Production {
            values,
            coverage: coverage.into_iter().collect(),
            terminals,
            non_terminals,
        }
    }

    pub fn epsilon() -> Self {
        Production::new(vec![Symbol::epsilon()])
    }

    pub fn values(&self) -> &[Symbol] {
        &self.values
    }

    pub fn coverage(&self) -> &BTreeSet<u64> {
        &self.coverage
    }

    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &[Symbol] {
        &self.non_terminals
    }

    pub fn replace_where(&self, condition: impl Fn(&Symbol) -> bool, new_symbol: &Symbol) -> Production {
        let values = self.values.iter()
            .map(|symbol| if condition(symbol) { new_symbol.clone() } else { symbol.clone() })
            .collect();

        Production::with_coverage(values, self.coverage.iter().copied())
    }

    pub fn replace(&self, old_symbol: &Symbol, new_symbol: &Symbol) -> Production {
        self.replace_where(|symbol| symbol == old_symbol, new_symbol)
    }

    pub fn replace_by_epsilon(&self, old_symbol: &Symbol) -> Production {
        self.replace(old_symbol, &Symbol::epsilon())
    }

    pub fn is_start(&self) -> bool {
        self.values.iter().any(|s| *s == Symbol::start())
    }

    /// True when nothing in the sequence derives a token. An empty sequence
    /// counts as epsilon.
    pub fn is_epsilon(&self) -> bool {
        self.values.iter().all(Symbol::is_epsilon)
    }

    pub fn has_value(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.values.contains(symbol)
    }
}

impl PartialEq for Production {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Production {}

impl Hash for Production {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.values.hash(state);
    }
}

impl PartialOrd for Production {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Lexicographic over the symbol sequence. This is the tie-break order used
// by the generator, so it must not depend on container iteration order.
// It compares symbol by symbol, not the space-joined rendering: the two only
// disagree when a symbol holds a character that sorts below ' ', e.g.
// ["a\t"] > ["a", "b"] here while "a\t" < "a b" as printed.
impl Ord for Production {
    fn cmp(&self, other: &Self) -> Ordering {
        self.values.cmp(&other.values)
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.values.iter().join(" "))
    }
}

impl From<Symbol> for Production {
    fn from(value: Symbol) -> Self {
        Production::new(vec![value])
    }
}

impl From<&str> for Production {
    fn from(value: &str) -> Self {
        Production::from(Symbol::new(value))
    }
}

impl From<Vec<Symbol>> for Production {
    fn from(values: Vec<Symbol>) -> Self {
        Production::new(values)
    }
}

impl<S: Into<Symbol>> FromIterator<S> for Production {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Production::new(iter.into_iter().map(Into::into).collect())
    }
}
