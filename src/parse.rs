//! Parses as sequences of production numbers.
//!
//! A parse is a derivation of an input string recorded as the sequence of
//! 1-based production indices applied, together with the grammar they refer
//! to. Replaying the indices leftmost-first or rightmost-first recovers the
//! parse tree.

use crate::error::{GrammarError, Result};
use crate::grammar::ContextFreeGrammar;
use crate::tree::ParseTree;

/// Returns the 1-based index of the first production equal to the given
/// left and right side.
pub(crate) fn production_index(
    grammar: &ContextFreeGrammar,
    lhs: &crate::symbol::Symbol,
    rhs: &[crate::symbol::Symbol],
) -> Option<usize> {
    grammar
        .productions()
        .iter()
        .position(|p| p.lhs == *lhs && p.rhs == rhs)
        .map(|i| i + 1)
}

/// A leftmost derivation.
pub struct LeftParse<'a> {
    grammar: &'a ContextFreeGrammar,
    parse: Vec<usize>,
}

impl<'a> LeftParse<'a> {
    pub fn new(grammar: &'a ContextFreeGrammar, parse: Vec<usize>) -> Self {
        LeftParse { grammar, parse }
    }

    pub fn indices(&self) -> &[usize] {
        &self.parse
    }

    /// Replays the derivation into a parse tree.
    pub fn tree(&self) -> Result<ParseTree> {
        let (tree, next) = self.subtree(0)?;
        if tree.value() != self.grammar.start() || next != self.parse.len() {
            return Err(GrammarError::ParseFailure);
        }
        Ok(tree)
    }

    fn subtree(&self, at: usize) -> Result<(ParseTree, usize)> {
        let rule = self
            .parse
            .get(at)
            .and_then(|&i| self.grammar.productions().get(i.wrapping_sub(1)))
            .ok_or(GrammarError::ParseFailure)?;
        let mut next = at + 1;
        let mut children = Vec::with_capacity(rule.rhs.len());
        for symbol in &rule.rhs {
            if symbol.is_nonterminal() {
                let (child, n) = self.subtree(next)?;
                if child.value() != symbol {
                    return Err(GrammarError::ParseFailure);
                }
                children.push(child);
                next = n;
            } else {
                children.push(ParseTree::leaf(symbol.clone()));
            }
        }
        Ok((ParseTree::new(rule.lhs.clone(), children), next))
    }
}

/// A rightmost derivation.
pub struct RightParse<'a> {
    grammar: &'a ContextFreeGrammar,
    parse: Vec<usize>,
}

impl<'a> RightParse<'a> {
    pub fn new(grammar: &'a ContextFreeGrammar, parse: Vec<usize>) -> Self {
        RightParse { grammar, parse }
    }

    pub fn indices(&self) -> &[usize] {
        &self.parse
    }

    /// Replays the derivation into a parse tree, consuming the indices from
    /// the back.
    pub fn tree(&self) -> Result<ParseTree> {
        if self.parse.is_empty() {
            return Err(GrammarError::ParseFailure);
        }
        let (tree, used) = self.subtree(self.parse.len() - 1)?;
        if tree.value() != self.grammar.start() || used != self.parse.len() {
            return Err(GrammarError::ParseFailure);
        }
        Ok(tree)
    }

    /// Builds the subtree whose rule index sits at position `at`, returning
    /// the tree and the number of indices it consumed.
    fn subtree(&self, at: usize) -> Result<(ParseTree, usize)> {
        let rule = self
            .parse
            .get(at)
            .and_then(|&i| self.grammar.productions().get(i.wrapping_sub(1)))
            .ok_or(GrammarError::ParseFailure)?;
        let mut used = 1;
        let mut children = Vec::with_capacity(rule.rhs.len());
        for symbol in rule.rhs.iter().rev() {
            if symbol.is_nonterminal() {
                if at < used {
                    return Err(GrammarError::ParseFailure);
                }
                let (child, n) = self.subtree(at - used)?;
                if child.value() != symbol {
                    return Err(GrammarError::ParseFailure);
                }
                children.insert(0, child);
                used += n;
            } else {
                children.insert(0, ParseTree::leaf(symbol.clone()));
            }
        }
        Ok((ParseTree::new(rule.lhs.clone(), children), used))
    }
}
