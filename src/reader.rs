//! A reader for the extended grammar syntax.
//!
//! ```text
//! <Sentence> -> <Noun phrase> <Verb phrase> | <Sentence> "and" <Sentence>
//! <Noun phrase> -> "noun"
//! ```
//!
//! Nonterminal names appear in angle brackets and may contain any character
//! except `>`; terminal names appear in double quotes. Rules are separated
//! by newlines and an empty alternate denotes ε.

use crate::error::{GrammarError, Result};
use crate::grammar::{ContextFreeGrammar, Production};
use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Nonterminal(String),
    Terminal(String),
    Arrow,
    Pipe,
    Newline,
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '<' => {
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '>' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(GrammarError::Syntax(
                        "unterminated nonterminal name".to_string(),
                    ));
                }
                tokens.push(Token::Nonterminal(name));
            }
            '"' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(GrammarError::Syntax(
                                "unterminated terminal name".to_string(),
                            ));
                        }
                    }
                }
                tokens.push(Token::Terminal(name));
            }
            '-' => match chars.next() {
                Some('>') => tokens.push(Token::Arrow),
                _ => {
                    return Err(GrammarError::Syntax(
                        "expected \">\" after \"-\"".to_string(),
                    ));
                }
            },
            '|' => tokens.push(Token::Pipe),
            '\n' => tokens.push(Token::Newline),
            ' ' | '\t' | '\r' => {}
            other => {
                return Err(GrammarError::Syntax(format!(
                    "unexpected character {:?}",
                    other
                )));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    productions: Vec<Production>,
}

impl Parser {
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn try_read(&mut self, token: &Token) -> bool {
        if self.current() == Some(token) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn read_grammar(&mut self) -> Result<()> {
        while self.try_read(&Token::Newline) {}
        if matches!(self.current(), Some(Token::Nonterminal(_))) {
            loop {
                self.read_rule()?;
                if !self.try_read(&Token::Newline) {
                    break;
                }
                while self.try_read(&Token::Newline) {}
                if !matches!(self.current(), Some(Token::Nonterminal(_))) {
                    break;
                }
            }
        }
        if self.pos != self.tokens.len() {
            return Err(GrammarError::Syntax(
                "could not read the whole grammar".to_string(),
            ));
        }
        Ok(())
    }

    fn read_rule(&mut self) -> Result<()> {
        let lhs = match self.current() {
            Some(Token::Nonterminal(name)) => Symbol::nonterminal(name.clone()),
            _ => return Err(GrammarError::Syntax("expected a nonterminal".to_string())),
        };
        self.pos += 1;
        if !self.try_read(&Token::Arrow) {
            return Err(GrammarError::Syntax("expected \"->\"".to_string()));
        }
        loop {
            let mut rhs = Vec::new();
            loop {
                match self.current() {
                    Some(Token::Nonterminal(name)) => {
                        rhs.push(Symbol::nonterminal(name.clone()));
                        self.pos += 1;
                    }
                    Some(Token::Terminal(name)) => {
                        rhs.push(Symbol::terminal(name.clone()));
                        self.pos += 1;
                    }
                    _ => break,
                }
            }
            self.productions.push(Production::new(lhs.clone(), rhs));
            if !self.try_read(&Token::Pipe) {
                break;
            }
        }
        Ok(())
    }
}

/// Parses a grammar in the extended syntax.
pub fn parse_extended(text: &str) -> Result<ContextFreeGrammar> {
    let mut parser = Parser {
        tokens: tokenize(text)?,
        pos: 0,
        productions: Vec::new(),
    };
    parser.read_grammar()?;
    ContextFreeGrammar::from_productions(parser.productions)
}

/// Parses a grammar in either surface form: text containing angle brackets
/// or double quotes is read as the extended syntax, anything else as the
/// single-character short form.
pub fn parse_cfg(text: &str) -> Result<ContextFreeGrammar> {
    if text.contains('<') || text.contains('"') {
        parse_extended(text)
    } else {
        text.parse()
    }
}
