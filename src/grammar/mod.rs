/*
    This module is for storing and manipulating grammars
*/

mod production;
mod symbol;

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

pub use production::{NonTerminal, Production};
pub use symbol::{Symbol, EMPTY, EPSILON, START};

// The alternatives of every rule, keyed by the nonterminal they rewrite.
// Alternatives keep the order they were added in.
pub type Rules = BTreeMap<NonTerminal, Vec<Production>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("No rule defined for `<start>`")]
    MissingStart,
    #[error("No definition for nonterminal `{symbol}` (used by `{key}`)")]
    UndefinedNonTerminal { key: NonTerminal, symbol: Symbol },
    #[error("Alternative `{production}` is defined more than once for `{key}`")]
    DuplicateAlternative { key: NonTerminal, production: Production },
    #[error("No alternatives defined for `{0}`")]
    NoAlternatives(NonTerminal),
    #[error("`{0}` is not a nonterminal")]
    NotANonTerminal(Symbol),
}

impl GrammarError {
    // The rule the error was found in, if it belongs to one
    pub fn key(&self) -> Option<&NonTerminal> {
        match self {
            GrammarError::UndefinedNonTerminal { key, .. } => Some(key),
            GrammarError::DuplicateAlternative { key, .. } => Some(key),
            GrammarError::NoAlternatives(key) => Some(key),
            GrammarError::MissingStart | GrammarError::NotANonTerminal(_) => None,
        }
    }
}

impl Borrow<Symbol> for NonTerminal {
    fn borrow(&self) -> &Symbol {
        self.symbol()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    rules: Rules,
}

impl Grammar {
    /// Wraps the rules as they are. Nothing is checked here, use
    /// [`Grammar::validate`] before deriving from it.
    pub fn new(rules: Rules) -> Self {
        Grammar { rules }
    }

    pub fn add_rule(&mut self, key: NonTerminal, production: Production) {
        self.rules.entry(key).or_default().push(production);
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn alternatives(&self, symbol: &Symbol) -> Option<&[Production]> {
        self.rules.get(symbol).map(Vec::as_slice)
    }

    // Every broken invariant, in rule order
    pub fn violations(&self) -> Vec<GrammarError> {
        let mut errors = Vec::new();

        if !self.rules.contains_key(&Symbol::start()) {
            errors.push(GrammarError::MissingStart);
        }

        for (key, alternatives) in &self.rules {
            if alternatives.is_empty() {
                errors.push(GrammarError::NoAlternatives(key.clone()));
            }

            errors.extend(alternatives.iter()
                .flat_map(Production::non_terminals)
                .filter(|symbol| !self.rules.contains_key(*symbol))
                .unique()
                .map(|symbol| GrammarError::UndefinedNonTerminal {
                    key: key.clone(),
                    symbol: symbol.clone()
                }));

            // Identity ignores coverage, so two alternatives that only differ
            // in coverage are duplicates as well.
            errors.extend(alternatives.iter()
                .duplicates()
                .map(|production| GrammarError::DuplicateAlternative {
                    key: key.clone(),
                    production: production.clone()
                }));
        }

        errors
    }

    pub fn validate(&self) -> Result<(), GrammarError> {
        match self.violations().into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }

    /// All terminals used by any alternative, reachable from the start rule
    /// or not.
    pub fn defined_terminals(&self) -> BTreeSet<Symbol> {
        self.rules.values()
            .flatten()
            .flat_map(Production::terminals)
            .cloned()
            .collect()
    }

    /// Rebuilds every alternative from its coverage ids followed by its
    /// nonterminals, so deriving the new grammar yields coverage ids instead
    /// of tokens. With a `target`, only coverage ids matching it are kept.
    pub fn to_coverage_grammar(&self, target: Option<&Symbol>) -> Result<Grammar, GrammarError> {
        let mut rules = Rules::new();

        for (key, alternatives) in &self.rules {
            let derived = rules.entry(key.clone()).or_default();

            for production in alternatives {
                let production = coverage_production(production, target);
                // Alternatives without coverage can collapse onto each other
                if !derived.contains(&production) {
                    derived.push(production);
                }
            }
        }

        let grammar = Grammar::new(rules);
        grammar.validate()?;

        debug!(
            "Derived coverage grammar with {} rules (target: {})",
            grammar.rules.len(),
            target.map_or("none".to_string(), Symbol::to_string)
        );

        Ok(grammar)
    }
}

fn coverage_production(production: &Production, target: Option<&Symbol>) -> Production {
    if production.is_epsilon() {
        return Production::epsilon();
    }

    let coverage: BTreeSet<u64> = production.coverage()
        .iter()
        .copied()
        .filter(|id| target.map_or(true, |target| target.value() == id.to_string()))
        .collect();

    let values = coverage.iter()
        .map(|id| Symbol::new(id.to_string()))
        .chain(production.non_terminals().iter().cloned())
        .collect();

    Production::with_coverage(values, coverage)
}
