/*
    This module parses grammar files

    <rule> = <symbol> "terminal" bare-terminal {1 2} | <empty>
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use tracing::info;
use verifier::verify_rules;
use verifier::RuleLocations;

#[derive(Debug)]
pub enum CompileErrorType {
    // A line which should contain a rule does not
    MissingEquals,
    // A rule has multiple equals signs
    UnexpectedEquals,
    // The user starts a rule line with something other than a nonterminal
    MissingNonterminal,
    // There is an unclosed quote
    UnmatchedQuote,
    // A nonterminal is missing its closing `>`
    UnmatchedBracket,
    // A coverage list is missing its closing `}`
    UnmatchedBrace,
    // A quoted terminal starts with `<` and would read as a nonterminal
    BracketedTerminal(String),
    // The rules were read but break a grammar invariant
    InvalidGrammar(GrammarError),
    // Somehow a full rewrite was parsed as a base alternative
    // This is a problem with guidegram, not the grammar
    UnsplitRewrite,
    // A blank line got too deep into the parser
    // This is a problem with guidegram, not the grammar
    UnexpectedBlankLine,
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) => a.kind() == b.kind(),
            (CompileErrorType::InvalidGrammar(a), CompileErrorType::InvalidGrammar(b)) => a == b,
            (CompileErrorType::BracketedTerminal(a), CompileErrorType::BracketedTerminal(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingEquals => write!(f, "Expected `=` after nonterminal"),
            CompileErrorType::UnexpectedEquals => write!(f, "Unexpected `=` encountered"),
            CompileErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            CompileErrorType::UnmatchedQuote => write!(f, "Unmatched quotes"),
            CompileErrorType::UnmatchedBracket => write!(f, "Unmatched `<`"),
            CompileErrorType::UnmatchedBrace => write!(f, "Unmatched `{{` or `}}`"),
            CompileErrorType::BracketedTerminal(text) => write!(f, "Quoted terminal `{}` cannot start with `<`", text),
            CompileErrorType::InvalidGrammar(error) => write!(f, "{}", error),
            CompileErrorType::UnsplitRewrite => write!(f, "Rewrite was not fully split (this is a problem with guidegram, not the grammar)"),
            CompileErrorType::UnexpectedBlankLine => write!(f, "Blank line encountered in rule parser (this is a problem with guidegram, not the grammar)"),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: &Path) -> CompileError {
    CompileError {
        location: Location::in_file(file),
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    key: NonTerminal,
    rewrite: Vec<Production>,
    location: Location
}

fn parse_alternative(tokens: &[Token]) -> Result<Production> {
    let mut values = Vec::new();
    let mut coverage = Vec::new();

    for token in tokens {
        match token {
            Token::Equals => return Err(CompileErrorType::UnexpectedEquals),
            Token::Or => return Err(CompileErrorType::UnsplitRewrite),
            Token::Nonterminal(s) | Token::Terminal(s) => values.push(Symbol::new(s.clone())),
            Token::Coverage(ids) => coverage.extend(ids.iter().copied()),
        }
    }

    Ok(Production::with_coverage(values, coverage))
}

fn parse_rewrite(tokens: &[Token]) -> Result<Vec<Production>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    // Try to get the nonterminal the rule is for. The match returns a result
    // which is then unwrapped with the ? operator
    let key = match tokens.get(0) {
        Some(Token::Nonterminal(s)) => NonTerminal::try_from(s.as_str())
            .map_err(|_| CompileErrorType::MissingNonterminal),
        Some(_) => Err(CompileErrorType::MissingNonterminal),
        None => Err(CompileErrorType::UnexpectedBlankLine)
    }?;

    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MissingEquals)
    }

    let rewrite = parse_rewrite(&tokens[2..])?;

    return Ok(Rule {
        key,
        rewrite,
        location
    });
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location: location, error })
}

fn is_rule_line(line: &String) -> bool {
    !line.trim().is_empty() && !line.starts_with(';')
}

// Returns an iterator over the lines of a file, with the io errors wrapped
// in CompileError and enumerated
fn file_line_nums<'a>(file: File, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    std::io::BufReader::new(file)
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path)))
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

// Builds a grammar from the parsed rules. Rules for the same nonterminal
// add to its alternatives.
fn grammar_from_rules(rules: Vec<Rule>, path: &Path) -> FileResult<Grammar> {
    let mut grammar = Grammar::default();
    let mut locations = RuleLocations::with_capacity(rules.len());

    for rule in rules {
        locations.entry(rule.key.clone()).or_insert(rule.location);
        for production in rule.rewrite {
            grammar.add_rule(rule.key.clone(), production);
        }
    }

    verify_rules(&grammar, &locations, path)?;

    return Ok(grammar);
}

pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path)])?;
    let lines = file_line_nums(file, path);

    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location {
            file: path.to_path_buf(),
            line: num
        }))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition(LineResult::is_ok);
    if errors.len() > 0 {
        return Err(errors.into_iter().filter_map(LineResult::err).collect_vec());
    }
    let rules_unwrapped = rules.into_iter().filter_map(LineResult::ok).collect_vec();

    let grammar = grammar_from_rules(rules_unwrapped, path)?;
    info!(
        "Loaded {} rules with {} terminals from {}",
        grammar.rules().len(),
        grammar.defined_terminals().len(),
        path.display()
    );

    return Ok(grammar);
}
