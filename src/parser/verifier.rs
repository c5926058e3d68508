use std::collections::HashMap;
use std::path::Path;

use crate::grammar::{Grammar, GrammarError, NonTerminal};
use super::CompileErrorType::InvalidGrammar;
use super::{CompileError, CompileErrors, FileResult, Location};

// Where each nonterminal was first defined
pub type RuleLocations = HashMap<NonTerminal, Location>;

fn locate_violation(error: GrammarError, locations: &RuleLocations, path: &Path) -> CompileError {
    // Errors that belong to no rule, like a missing start rule, point at the
    // file as a whole
    let location = error.key()
        .and_then(|key| locations.get(key))
        .cloned()
        .unwrap_or_else(|| Location::in_file(path));

    CompileError {
        location,
        error: InvalidGrammar(error)
    }
}

pub fn verify_rules(grammar: &Grammar, locations: &RuleLocations, path: &Path) -> FileResult<()> {
    let mut errors: CompileErrors = grammar.violations()
        .into_iter()
        .map(|error| locate_violation(error, locations, path))
        .collect();

    errors.sort_by_key(|error| error.location.line);

    if errors.len() > 0 {
        Err(errors)
    } else {
        Ok(())
    }
}
