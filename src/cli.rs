use std::ops::Range;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::generator::{
    CoveragePolicy, GeneratorConfig, Guidance, NonTerminalGuided, TerminalGuided, DEFAULT_MAX_EXPANSIONS,
};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Amount of inputs to generate, one per seed
    #[arg(short = 'n', long, value_name = "AMOUNT", default_value_t = 1)]
    pub amount: u64,

    /// Seed of the first input
    #[arg(short, long, value_name = "SEED", default_value_t = 0)]
    pub seed: u64,

    /// Which symbols to steer towards
    #[arg(short, long, value_enum, default_value_t = GuidanceKind::Terminal)]
    pub guidance: GuidanceKind,

    /// Give up on a derivation after this many expansions
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_MAX_EXPANSIONS)]
    pub max_expansions: usize,

    /// Forget covered symbols between seeds
    #[arg(long)]
    pub reset_coverage: bool,

    /// Stop early once there is nothing left to cover
    #[arg(long)]
    pub until_covered: bool,

    /// Derive coverage ids instead of tokens
    #[arg(long)]
    pub coverage_grammar: bool,

    /// Only keep this coverage id in the coverage grammar
    #[arg(long, value_name = "ID", requires = "coverage_grammar")]
    pub target: Option<String>,

    /// Also write each input to DIR/inputsNN.txt
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Log every expansion
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GuidanceKind {
    Terminal,
    NonTerminal,
}

impl GuidanceKind {
    pub fn build(self) -> Box<dyn Guidance> {
        match self {
            GuidanceKind::Terminal => Box::new(TerminalGuided),
            GuidanceKind::NonTerminal => Box::new(NonTerminalGuided),
        }
    }
}

impl Cli {
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            seed: self.seed,
            max_expansions: self.max_expansions,
            coverage_policy: if self.reset_coverage { CoveragePolicy::Reset } else { CoveragePolicy::Carry },
            log: self.verbose,
        }
    }

    pub fn seeds(&self) -> Range<u64> {
        self.seed..self.seed.saturating_add(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["guidegram", "app.bnf"]).unwrap();

        assert_eq!(cli.file, PathBuf::from("app.bnf"));
        assert_eq!(cli.seeds(), 0..1);
        assert_eq!(cli.guidance, GuidanceKind::Terminal);
        assert_eq!(cli.config(), GeneratorConfig::default());
    }

    #[test]
    fn full_configuration() {
        let cli = Cli::try_parse_from([
            "guidegram", "app.bnf",
            "-n", "10", "--seed", "5",
            "--guidance", "non-terminal",
            "--max-expansions", "50",
            "--reset-coverage", "-v",
            "--coverage-grammar", "--target", "42",
        ]).unwrap();

        assert_eq!(cli.seeds(), 5..15);
        assert_eq!(cli.guidance.build().name(), "non-terminal");
        assert_eq!(cli.target.as_deref(), Some("42"));
        assert_eq!(cli.config(), GeneratorConfig {
            seed: 5,
            max_expansions: 50,
            coverage_policy: CoveragePolicy::Reset,
            log: true,
        });
    }

    #[test]
    fn target_needs_coverage_grammar() {
        assert!(Cli::try_parse_from(["guidegram", "app.bnf", "--target", "42"]).is_err());
    }
}
