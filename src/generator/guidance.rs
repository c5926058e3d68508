/*
    Policies that steer the generator towards alternatives it has not seen
*/

use std::collections::BTreeSet;

use crate::grammar::{Grammar, Production, Symbol};

use super::tree::Node;

// Symbols introduced by at least one expansion so far. It only grows, and
// only a guidance policy adds to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    symbols: BTreeSet<Symbol>,
}

impl Coverage {
    pub fn new() -> Self {
        Coverage::default()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &BTreeSet<Symbol> {
        &self.symbols
    }

    /// Adds the symbols and returns how many of them were new.
    pub fn record<'a>(&mut self, symbols: impl IntoIterator<Item = &'a Symbol>) -> usize {
        symbols.into_iter()
            .filter(|symbol| self.symbols.insert((*symbol).clone()))
            .count()
    }
}

impl FromIterator<Symbol> for Coverage {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Coverage { symbols: iter.into_iter().collect() }
    }
}

/// Scores alternatives by novelty and records what an expansion covered.
pub trait Guidance {
    fn name(&self) -> &'static str;

    /// The symbols of `production` this policy cares about that are not
    /// covered yet. Alternatives with a non-empty result are preferred.
    fn uncovered_symbols(&self, production: &Production, coverage: &Coverage) -> BTreeSet<Symbol>;

    /// Called after `node` was expanded into `new_nodes`.
    fn on_expanded(&self, node: &Node, new_nodes: &[Node], coverage: &mut Coverage);

    /// True once no derivation can add to the coverage this policy tracks.
    fn is_exhausted(&self, _grammar: &Grammar, _coverage: &Coverage) -> bool {
        false
    }
}

fn uncovered(symbols: &[Symbol], coverage: &Coverage) -> BTreeSet<Symbol> {
    symbols.iter()
        .filter(|symbol| !coverage.contains(symbol))
        .cloned()
        .collect()
}

// Favors alternatives with nonterminals that were never expanded into,
// which spreads derivations over different rule paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonTerminalGuided;

impl Guidance for NonTerminalGuided {
    fn name(&self) -> &'static str {
        "non-terminal"
    }

    fn uncovered_symbols(&self, production: &Production, coverage: &Coverage) -> BTreeSet<Symbol> {
        uncovered(production.non_terminals(), coverage)
    }

    fn on_expanded(&self, _node: &Node, new_nodes: &[Node], coverage: &mut Coverage) {
        coverage.record(new_nodes.iter()
            .map(Node::symbol)
            .filter(|symbol| symbol.is_non_terminal()));
    }
}

// Favors alternatives with terminal tokens that were never produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalGuided;

impl TerminalGuided {
    /// Terminals of the grammar no derivation has produced yet. Once this
    /// is empty, more derivations cannot raise terminal coverage.
    pub fn non_covered_symbols(&self, grammar: &Grammar, coverage: &Coverage) -> BTreeSet<Symbol> {
        grammar.defined_terminals()
            .into_iter()
            .filter(|symbol| !coverage.contains(symbol))
            .collect()
    }
}

impl Guidance for TerminalGuided {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn uncovered_symbols(&self, production: &Production, coverage: &Coverage) -> BTreeSet<Symbol> {
        uncovered(production.terminals(), coverage)
    }

    fn on_expanded(&self, _node: &Node, new_nodes: &[Node], coverage: &mut Coverage) {
        coverage.record(new_nodes.iter()
            .map(Node::symbol)
            .filter(|symbol| symbol.is_terminal()));
    }

    fn is_exhausted(&self, grammar: &Grammar, coverage: &Coverage) -> bool {
        self.non_covered_symbols(grammar, coverage).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::tests::grammar;

    fn symbols(values: &[&str]) -> BTreeSet<Symbol> {
        values.iter().map(|v| Symbol::new(*v)).collect()
    }

    fn nodes(values: &[&str]) -> Vec<Node> {
        values.iter().map(|v| Node::new(Symbol::new(*v))).collect()
    }

    #[test]
    fn record_counts_new_symbols() {
        let mut coverage = Coverage::new();
        let a = Symbol::new("a");
        let b = Symbol::new("b");

        assert_eq!(coverage.record([&a, &b, &a]), 2);
        assert_eq!(coverage.record([&b]), 0);
        assert_eq!(coverage.len(), 2);
    }

    #[test]
    fn non_terminal_guided_looks_at_non_terminals() {
        let coverage: Coverage = [Symbol::new("<a>")].into_iter().collect();
        let production = Production::from_iter(["x", "<a>", "<b>"]);

        assert_eq!(NonTerminalGuided.uncovered_symbols(&production, &coverage), symbols(&["<b>"]));
    }

    #[test]
    fn non_terminal_guided_records_non_terminals() {
        let mut coverage = Coverage::new();
        let parent = Node::new(Symbol::start());

        NonTerminalGuided.on_expanded(&parent, &nodes(&["x", "<a>", "<empty>"]), &mut coverage);

        assert_eq!(coverage.symbols(), &symbols(&["<a>"]));
    }

    #[test]
    fn terminal_guided_looks_at_terminals() {
        let coverage: Coverage = [Symbol::new("x")].into_iter().collect();
        let production = Production::from_iter(["x", "y", "<a>"]);

        assert_eq!(TerminalGuided.uncovered_symbols(&production, &coverage), symbols(&["y"]));
    }

    #[test]
    fn terminal_guided_records_terminals() {
        let mut coverage = Coverage::new();
        let parent = Node::new(Symbol::start());

        TerminalGuided.on_expanded(&parent, &nodes(&["x", "<a>", "y"]), &mut coverage);

        assert_eq!(coverage.symbols(), &symbols(&["x", "y"]));
    }

    #[test]
    fn terminal_guided_exhaustion() {
        let grammar = grammar(&[("<start>", &[&["<a>"]]), ("<a>", &[&["x"], &["y"]])]);
        let mut coverage: Coverage = [Symbol::new("x")].into_iter().collect();

        assert_eq!(TerminalGuided.non_covered_symbols(&grammar, &coverage), symbols(&["y"]));
        assert!(!TerminalGuided.is_exhausted(&grammar, &coverage));

        coverage.record([&Symbol::new("y")]);
        assert!(TerminalGuided.is_exhausted(&grammar, &coverage));
        assert!(!NonTerminalGuided.is_exhausted(&grammar, &coverage));
    }
}
