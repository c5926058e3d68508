/*
    This module derives test inputs from a grammar
*/

mod guidance;
mod tree;

use std::fmt::Display;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::grammar::*;

pub use guidance::{Coverage, Guidance, NonTerminalGuided, TerminalGuided};
pub use tree::{Node, NodeId, Tree};

pub const DEFAULT_MAX_EXPANSIONS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    // The grammar broke one of its invariants
    #[error("Invalid grammar: {0}")]
    InvalidGrammar(#[from] GrammarError),
    // The derivation did not terminate, usually a rule that only recurses
    #[error("Derivation with seed {seed} did not finish within {limit} expansions")]
    ExpansionLimit { seed: u64, limit: usize },
}

pub type GenResult<T> = Result<T, GenerateError>;

/// Whether covered symbols carry over from one seed to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoveragePolicy {
    #[default]
    Carry,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub max_expansions: usize,
    pub coverage_policy: CoveragePolicy,
    // Log every expansion
    pub log: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed: 0,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            coverage_policy: CoveragePolicy::default(),
            log: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub seed: u64,
    pub tree: Tree,
    pub expansions: usize,
}

impl Derivation {
    /// Terminal leaves from left to right. Empty tokens produce nothing.
    pub fn tokens(&self) -> Vec<&Symbol> {
        self.tree.leaves()
            .into_iter()
            .map(Node::symbol)
            .filter(|symbol| symbol.is_terminal() && !symbol.value().is_empty())
            .collect()
    }

    pub fn input_size(&self) -> usize {
        self.tokens().len()
    }
}

impl Display for Derivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tokens().iter().join(" "))
    }
}

pub struct Generator<'g> {
    grammar: &'g Grammar,
    guidance: Box<dyn Guidance>,
    config: GeneratorConfig,
    coverage: Coverage,
}

impl<'g> Generator<'g> {
    pub fn new(grammar: &'g Grammar, guidance: Box<dyn Guidance>, config: GeneratorConfig) -> GenResult<Self> {
        grammar.validate()?;

        Ok(Generator {
            grammar,
            guidance,
            config,
            coverage: Coverage::new(),
        })
    }

    /// Starts from coverage collected elsewhere, e.g. by an earlier batch.
    pub fn with_coverage(mut self, coverage: Coverage) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    pub fn into_coverage(self) -> Coverage {
        self.coverage
    }

    pub fn guidance(&self) -> &dyn Guidance {
        self.guidance.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.guidance.is_exhausted(self.grammar, &self.coverage)
    }

    pub fn generate(&mut self) -> GenResult<Derivation> {
        self.generate_seed(self.config.seed)
    }

    /// Derives one input from the start symbol using `seed`. The result only
    /// depends on the grammar, the seed, the guidance, the expansion limit
    /// and the coverage the run starts with.
    pub fn generate_seed(&mut self, seed: u64) -> GenResult<Derivation> {
        if self.config.coverage_policy == CoveragePolicy::Reset {
            self.coverage = Coverage::new();
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut tree = Tree::new(Symbol::start());
        let mut expansions = 0;

        // Unexpanded nonterminal leaves, the leftmost one on top
        let mut pending = vec![Tree::ROOT];

        while let Some(id) = pending.pop() {
            if expansions >= self.config.max_expansions {
                return Err(GenerateError::ExpansionLimit { seed, limit: self.config.max_expansions });
            }

            let production = self.select(tree.node(id).symbol(), &mut rng)?;
            let children = tree.expand(id, production);
            expansions += 1;

            let new_nodes = tree.children(id);
            let newly_covered = self.coverage.len();
            self.guidance.on_expanded(tree.node(id), new_nodes, &mut self.coverage);

            if self.config.log {
                debug!(
                    "Expanded {} -> {} ({} newly covered)",
                    tree.node(id).symbol(),
                    production,
                    self.coverage.len() - newly_covered
                );
            }

            pending.extend(children.rev().filter(|child| tree.node(*child).is_expandable()));
        }

        let derivation = Derivation { seed, tree, expansions };
        debug!(
            "Seed {} derived {} tokens in {} expansions, {} symbols covered",
            seed,
            derivation.input_size(),
            expansions,
            self.coverage.len()
        );

        Ok(derivation)
    }

    /// Derives one input per seed. With `stop_when_exhausted` the batch ends
    /// early once the guidance reports nothing left to cover.
    pub fn generate_batch(
        &mut self,
        seeds: impl IntoIterator<Item = u64>,
        stop_when_exhausted: bool,
    ) -> GenResult<Vec<Derivation>> {
        let mut derivations = Vec::new();

        for seed in seeds {
            derivations.push(self.generate_seed(seed)?);

            if stop_when_exhausted && self.is_exhausted() {
                info!("Nothing left to cover for {} guidance after seed {}", self.guidance.name(), seed);
                break;
            }
        }

        Ok(derivations)
    }

    // Prefers alternatives with uncovered symbols, then picks uniformly at
    // random among the preferred ones in production order.
    fn select(&self, symbol: &Symbol, rng: &mut ChaCha8Rng) -> GenResult<&'g Production> {
        let grammar: &'g Grammar = self.grammar;
        let key = NonTerminal::try_from(symbol.clone())?;

        let mut candidates: Vec<&'g Production> = grammar.alternatives(symbol)
            .map(|alternatives| alternatives.iter().collect())
            .unwrap_or_default();
        candidates.sort();

        let novel: Vec<&'g Production> = candidates.iter()
            .copied()
            .filter(|production| !self.guidance.uncovered_symbols(production, &self.coverage).is_empty())
            .collect();

        let pool = if novel.is_empty() { candidates } else { novel };

        pool.choose(rng)
            .copied()
            .ok_or(GenerateError::InvalidGrammar(GrammarError::NoAlternatives(key)))
    }
}
