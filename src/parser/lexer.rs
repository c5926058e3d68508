use itertools::{Itertools, PeekingNext};
use tracing::warn;

use super::{CompileErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Equals,
    Or,
    Nonterminal(String),
    Terminal(String),
    Coverage(Vec<u64>)
}

// Characters that end a bare terminal
const DELIMITERS: &str = "=|\"{}<";

pub fn lex_terminal(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    line.next(); // Consume open quote
    let token_text: String = line.peeking_take_while(|&c| c != '\"').collect();

    // Check if there is a close quote and consume it if there is
    if line.next() != Some('\"') {
        return Err(CompileErrorType::UnmatchedQuote);
    }

    // A leading `<` would make the symbol a nonterminal
    if token_text.starts_with('<') {
        return Err(CompileErrorType::BracketedTerminal(token_text));
    }

    Ok(Token::Terminal(token_text))
}

pub fn lex_bare_terminal(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    Ok(Token::Terminal(
        line.peeking_take_while(|&c| !c.is_whitespace() && !DELIMITERS.contains(c)).collect()
    ))
}

pub fn lex_nonterminal(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    let mut token_text: String = line.peeking_take_while(|&c| c != '>' && !c.is_whitespace()).collect();

    if line.next() != Some('>') {
        return Err(CompileErrorType::UnmatchedBracket);
    }
    token_text.push('>');

    Ok(Token::Nonterminal(token_text))
}

// Ids that are not numbers are reported and left out
pub fn lex_coverage(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    line.next(); // Consume open brace
    let text: String = line.peeking_take_while(|&c| c != '}').collect();

    if line.next() != Some('}') {
        return Err(CompileErrorType::UnmatchedBrace);
    }

    let ids = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|id| !id.is_empty())
        .filter_map(|id| match id.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Ignoring malformed coverage id `{}`", id);
                None
            }
        })
        .collect_vec();

    Ok(Token::Coverage(ids))
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(c) = line_chars.peek() {
        if *c == '=' {
            line_chars.next();
            tokens.push(Token::Equals);
        } else if *c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if *c == '\"' {
            tokens.push(lex_terminal(&mut line_chars)?);
        } else if *c == '{' {
            tokens.push(lex_coverage(&mut line_chars)?);
        } else if *c == '}' {
            return Err(CompileErrorType::UnmatchedBrace);
        } else if *c == '<' {
            tokens.push(lex_nonterminal(&mut line_chars)?);
        } else if !c.is_whitespace() {
            tokens.push(lex_bare_terminal(&mut line_chars)?);
        } else {
            line_chars.next();
        }
    }

    return Ok(tokens);
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn lex_normal_terminal() {
        let lines = vec![
            "\"alpha\" bravo charlie",
            "\"delta\"",
            "\"january\"\"february\"\"march\""
        ];
        // (result from the function, rest of the iterator)
        let answers = vec![
            (Token::Terminal("alpha".to_string()), " bravo charlie"),
            (Token::Terminal("delta".to_string()), ""),
            (Token::Terminal("january".to_string()), "\"february\"\"march\"")
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_terminal(&mut chars).unwrap(), answer_token);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_mismatched_terminal() {
        let lines = vec![
            "\"welcome",
            "\"alpha bravo charlie"
        ];

        for line in lines {
            let mut chars = line.chars().peekable();
            chars.next();

            assert_eq!(lex_terminal(&mut chars).unwrap_err(), CompileErrorType::UnmatchedQuote);
        }
    }

    #[test]
    fn lex_bracketed_terminal() {
        let mut chars = "\"<x>\" rest".chars().peekable();
        assert_eq!(
            lex_terminal(&mut chars).unwrap_err(),
            CompileErrorType::BracketedTerminal("<x>".to_string())
        );

        // Brackets further in are fine
        let mut chars = "\"a<x>\"".chars().peekable();
        assert_eq!(lex_terminal(&mut chars).unwrap(), Token::Terminal("a<x>".to_string()));
    }

    #[test]
    fn lex_bare_terminal_stops_at_delimiters() {
        let lines = vec![
            "click(a) rest",
            "click(a){1 2}",
            "x|y",
            "x=y",
            "x\"y\"",
            "x<y>",
            "a>b"
        ];
        // (result from the function, rest of the iterator)
        let answers = vec![
            (Token::Terminal("click(a)".to_string()), " rest"),
            (Token::Terminal("click(a)".to_string()), "{1 2}"),
            (Token::Terminal("x".to_string()), "|y"),
            (Token::Terminal("x".to_string()), "=y"),
            (Token::Terminal("x".to_string()), "\"y\""),
            (Token::Terminal("x".to_string()), "<y>"),
            (Token::Terminal("a>b".to_string()), "")
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_bare_terminal(&mut chars).unwrap(), answer_token);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_normal_nonterminal() {
        let lines = vec![
            "<alpha> <bravo> charlie",
            "<delta>",
            "<january><february>"
        ];
        // (result from the function, rest of the iterator)
        let answers = vec![
            (Token::Nonterminal("<alpha>".to_string()), " <bravo> charlie"),
            (Token::Nonterminal("<delta>".to_string()), ""),
            (Token::Nonterminal("<january>".to_string()), "<february>")
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_nonterminal(&mut chars).unwrap(), answer_token);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_mismatched_nonterminal() {
        for line in ["<alpha", "<alpha bravo>"] {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_nonterminal(&mut chars).unwrap_err(), CompileErrorType::UnmatchedBracket);
        }
    }

    #[test]
    fn lex_coverage_ids() {
        let lines = vec![
            "{1 2 3} rest",
            "{42,7}",
            "{}",
            "{12 abc 5}"
        ];
        let answers = vec![
            (Token::Coverage(vec![1, 2, 3]), " rest"),
            (Token::Coverage(vec![42, 7]), ""),
            (Token::Coverage(vec![]), ""),
            (Token::Coverage(vec![12, 5]), "")
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_coverage(&mut chars).unwrap(), answer_token);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }

        let mut chars = "{1 2".chars().peekable();
        assert_eq!(lex_coverage(&mut chars).unwrap_err(), CompileErrorType::UnmatchedBrace);
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec![
            "<action> = <click> | \"text(name)\" {4 5}",
            "<more> = click(a) <more> | <empty>",
            "<a> = x|y",
            "<a> = click(a){1 2}|y"
        ];
        let answers = vec![
            vec![
                Token::Nonterminal("<action>".to_string()),
                Token::Equals,
                Token::Nonterminal("<click>".to_string()),
                Token::Or,
                Token::Terminal("text(name)".to_string()),
                Token::Coverage(vec![4, 5])
            ],
            vec![
                Token::Nonterminal("<more>".to_string()),
                Token::Equals,
                Token::Terminal("click(a)".to_string()),
                Token::Nonterminal("<more>".to_string()),
                Token::Or,
                Token::Nonterminal("<empty>".to_string())
            ],
            vec![
                Token::Nonterminal("<a>".to_string()),
                Token::Equals,
                Token::Terminal("x".to_string()),
                Token::Or,
                Token::Terminal("y".to_string())
            ],
            vec![
                Token::Nonterminal("<a>".to_string()),
                Token::Equals,
                Token::Terminal("click(a)".to_string()),
                Token::Coverage(vec![1, 2]),
                Token::Or,
                Token::Terminal("y".to_string())
            ]
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line).unwrap(), answer)
        }
    }

    #[test]
    fn lex_stray_brace() {
        assert_eq!(lex_line("<a> = x}").unwrap_err(), CompileErrorType::UnmatchedBrace);
        assert_eq!(lex_line("<a> = } x").unwrap_err(), CompileErrorType::UnmatchedBrace);
    }
}
