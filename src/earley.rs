//! Earley's parsing algorithm.

use crate::error::{GrammarError, Result};
use crate::grammar::{ContextFreeGrammar, Production};
use crate::parse::production_index;
use crate::symbol::Symbol;
use std::fmt;

/// An Earley item `[A -> α · β, i]`: a production, a dot position, and the
/// 1-based origin position in the input where recognition started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarleyItem {
    pub production: Production,
    pub dot: usize,
    pub origin: usize,
}

impl EarleyItem {
    pub fn new(production: Production, dot: usize, origin: usize) -> Self {
        EarleyItem {
            production,
            dot,
            origin,
        }
    }

    /// The symbol after the dot, if the dot is not at the end.
    pub fn after_dot(&self) -> Option<&Symbol> {
        self.production.rhs.get(self.dot)
    }

    pub fn complete(&self) -> bool {
        self.dot == self.production.rhs.len()
    }

    pub fn advanced(&self) -> Self {
        EarleyItem {
            production: self.production.clone(),
            dot: self.dot + 1,
            origin: self.origin,
        }
    }
}

impl fmt::Display for EarleyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut strs: Vec<String> = self
            .production
            .rhs
            .iter()
            .map(|s| s.to_string())
            .collect();
        let sep = if strs.iter().any(|s| s.chars().count() > 1) {
            " "
        } else {
            ""
        };
        strs.insert(self.dot, ".".to_string());
        write!(
            f,
            "[{} -> {}, {}]",
            self.production.lhs,
            strs.join(sep),
            self.origin
        )
    }
}

fn check_input(grammar: &ContextFreeGrammar, input: &[Symbol]) -> Result<()> {
    for symbol in input {
        if !symbol.is_terminal() || !grammar.terminals().contains(symbol) {
            return Err(GrammarError::InputMismatch(symbol.to_string()));
        }
    }
    Ok(())
}

/// Saturates parse list `j` under the completer and predictor rules until
/// no new items can be added.
fn saturate(grammar: &ContextFreeGrammar, lists: &mut [Vec<EarleyItem>], j: usize) {
    let mut added = true;
    while added {
        added = false;

        // Completer: a finished constituent advances every item waiting for
        // it in its origin list.
        let mut new_items: Vec<EarleyItem> = Vec::new();
        for item in &lists[j] {
            if item.complete() {
                for other in &lists[item.origin] {
                    if other.after_dot() == Some(&item.production.lhs) {
                        let new_item = other.advanced();
                        if !lists[j].contains(&new_item) && !new_items.contains(&new_item) {
                            new_items.push(new_item);
                            added = true;
                        }
                    }
                }
            }
        }
        lists[j].extend(new_items);

        // Predictor: a nonterminal after a dot seeds its rules at j.
        let mut new_items: Vec<EarleyItem> = Vec::new();
        for item in &lists[j] {
            if let Some(b) = item.after_dot() {
                if b.is_nonterminal() {
                    for p in grammar.productions() {
                        if p.lhs == *b {
                            let new_item = EarleyItem::new(p.clone(), 0, j);
                            if !lists[j].contains(&new_item) && !new_items.contains(&new_item) {
                                new_items.push(new_item);
                                added = true;
                            }
                        }
                    }
                }
            }
        }
        lists[j].extend(new_items);
    }
}

/// Builds the parse lists I₀, I₁, ..., Iₙ for an input string.
///
/// `input` is in L(G) iff the last list contains a completed item for the
/// start symbol with origin 0.
pub fn earley_parse(
    grammar: &ContextFreeGrammar,
    input: &[Symbol],
) -> Result<Vec<Vec<EarleyItem>>> {
    check_input(grammar, input)?;
    let n = input.len();
    let mut lists: Vec<Vec<EarleyItem>> = vec![Vec::new(); n + 1];

    for p in grammar.productions() {
        if p.lhs == *grammar.start() {
            lists[0].push(EarleyItem::new(p.clone(), 0, 0));
        }
    }
    saturate(grammar, &mut lists, 0);

    for j in 1..=n {
        // Scanner: move items from the previous list over the input symbol.
        let mut scanned: Vec<EarleyItem> = Vec::new();
        for item in &lists[j - 1] {
            if item.after_dot() == Some(&input[j - 1]) {
                let new_item = item.advanced();
                if !scanned.contains(&new_item) {
                    scanned.push(new_item);
                }
            }
        }
        lists[j] = scanned;
        saturate(grammar, &mut lists, j);
    }

    Ok(lists)
}

/// Extracts a right parse from the parse lists, as 1-based production
/// indices. The grammar must be cycle-free.
pub fn right_parse_from_lists(
    grammar: &ContextFreeGrammar,
    input: &[Symbol],
    lists: &[Vec<EarleyItem>],
) -> Result<Vec<usize>> {
    check_input(grammar, input)?;
    if grammar.cyclic() {
        return Err(GrammarError::Precondition("grammar is cyclic".to_string()));
    }
    let n = input.len();
    let root = lists[n]
        .iter()
        .find(|item| item.production.lhs == *grammar.start() && item.complete() && item.origin == 0)
        .ok_or(GrammarError::ParseFailure)?;
    let mut parse = Vec::new();
    extract(grammar, lists, root, n, &mut parse)?;
    Ok(parse)
}

/// Prepends the rule of a completed item and walks its constituents from
/// right to left, choosing for each nonterminal the first completed child
/// item consistent with the parse lists.
fn extract(
    grammar: &ContextFreeGrammar,
    lists: &[Vec<EarleyItem>],
    item: &EarleyItem,
    j: usize,
    parse: &mut Vec<usize>,
) -> Result<()> {
    let h = production_index(grammar, &item.production.lhs, &item.production.rhs)
        .ok_or(GrammarError::ParseFailure)?;
    parse.insert(0, h);

    let rhs = &item.production.rhs;
    let mut k = rhs.len();
    let mut l = j;
    while k > 0 {
        let x = &rhs[k - 1];
        if x.is_terminal() {
            k -= 1;
            l -= 1;
        } else {
            let mut witness = None;
            for other in &lists[l] {
                if other.production.lhs == *x && other.complete() {
                    let check_item =
                        EarleyItem::new(item.production.clone(), k - 1, item.origin);
                    if lists[other.origin].contains(&check_item) {
                        witness = Some(other);
                        break;
                    }
                }
            }
            let other = witness.ok_or(GrammarError::ParseFailure)?;
            extract(grammar, lists, other, l, parse)?;
            k -= 1;
            l = other.origin;
        }
    }
    Ok(())
}
