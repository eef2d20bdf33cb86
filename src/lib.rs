//! Context-Free Grammar Analyzer
//!
//! A library of context-free grammar analysis and parsing algorithms:
//! grammar representation and classification, conversion to Chomsky normal
//! form, the classic backtrack, CYK, and Earley parsers, FIRST/FOLLOW set
//! computation, the canonical LR(0) automaton, and multi-valued SLR(1)
//! parse tables.
//!
//! # References
//! Aho, Alfred V., and Ullman, Jeffrey D. "The Theory of Parsing,
//! Translation, and Compiling: Volume I: Parsing". Prentice-Hall, 1972.

pub mod backtrack;
pub mod cli;
pub mod cnf;
pub mod cyk;
pub mod digraph;
pub mod earley;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod parse;
pub mod reader;
pub mod slr;
pub mod symbol;
pub mod table;
pub mod tree;

// Re-export the types most callers need.
pub use error::{GrammarError, Result};
pub use grammar::{ContextFreeGrammar, Production};
pub use parse::{LeftParse, RightParse};
pub use symbol::Symbol;
pub use tree::ParseTree;
