//! Error types for the grammar analyzer.

use thiserror::Error;

/// Errors that can occur while constructing or analyzing grammars.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("input is not in the language of the grammar")]
    ParseFailure,

    #[error("input symbol {0} is not a terminal of the grammar")]
    InputMismatch(String),

    #[error("syntax error in grammar text: {0}")]
    Syntax(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
