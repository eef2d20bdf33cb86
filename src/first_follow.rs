//! FIRST and FOLLOW set computation.
//!
//! FIRST sets are kept per nonterminal as a set of terminals plus a nullable
//! flag; ε is never stored as a set member. FOLLOW sets are sets of
//! terminals which may include the `$` end marker.

use crate::grammar::ContextFreeGrammar;
use crate::symbol::Symbol;
use log::debug;
use std::collections::{HashMap, HashSet};

/// The FIRST sets of a grammar's nonterminals.
#[derive(Debug, Clone)]
pub struct FirstSets {
    table: HashMap<Symbol, (HashSet<Symbol>, bool)>,
}

impl FirstSets {
    /// Computes the FIRST sets by fixed-point iteration.
    ///
    /// For each production A → X₁…Xₘ the right side is walked left to
    /// right: a terminal is added to FIRST(A) and ends the walk; a
    /// nonterminal contributes its FIRST set and ends the walk unless it is
    /// nullable. Walking past Xₘ marks A nullable. This repeats until
    /// nothing changes.
    pub fn compute(grammar: &ContextFreeGrammar) -> Self {
        let mut table: HashMap<Symbol, (HashSet<Symbol>, bool)> = grammar
            .nonterminals()
            .iter()
            .map(|n| (n.clone(), (HashSet::new(), false)))
            .collect();

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for p in grammar.productions() {
                let mut additions = HashSet::new();
                let mut nullable = true;
                for x in &p.rhs {
                    if let Some((first_x, nullable_x)) = table.get(x) {
                        additions.extend(first_x.iter().cloned());
                        if !*nullable_x {
                            nullable = false;
                            break;
                        }
                    } else {
                        additions.insert(x.clone());
                        nullable = false;
                        break;
                    }
                }
                if let Some((first_a, nullable_a)) = table.get_mut(&p.lhs) {
                    let before = first_a.len();
                    first_a.extend(additions);
                    if first_a.len() != before {
                        changed = true;
                    }
                    if nullable && !*nullable_a {
                        *nullable_a = true;
                        changed = true;
                    }
                }
            }
        }
        debug!("first sets converged after {} passes", passes);
        FirstSets { table }
    }

    /// The terminals that can begin a derivation from `a`.
    pub fn terminals(&self, a: &Symbol) -> Option<&HashSet<Symbol>> {
        self.table.get(a).map(|(set, _)| set)
    }

    /// Whether `a` can derive ε.
    pub fn nullable(&self, a: &Symbol) -> bool {
        self.table.get(a).map(|(_, n)| *n).unwrap_or(false)
    }

    /// FIRST of a sentential form, by the same left-to-right rule. The
    /// returned flag tells whether the whole form is nullable.
    pub fn string_first(&self, form: &[Symbol]) -> (HashSet<Symbol>, bool) {
        let mut result = HashSet::new();
        for x in form {
            if let Some((first_x, nullable_x)) = self.table.get(x) {
                result.extend(first_x.iter().cloned());
                if !*nullable_x {
                    return (result, false);
                }
            } else {
                result.insert(x.clone());
                return (result, false);
            }
        }
        (result, true)
    }
}

/// The FOLLOW sets of a grammar's nonterminals.
#[derive(Debug, Clone)]
pub struct FollowSets {
    table: HashMap<Symbol, HashSet<Symbol>>,
}

impl FollowSets {
    /// Computes the FOLLOW sets by fixed-point iteration, given the FIRST
    /// sets. FOLLOW(S) starts with the `$` end marker. For every rule
    /// A → α B β, FOLLOW(B) absorbs FIRST(β) and, when β is nullable or
    /// empty, FOLLOW(A).
    pub fn compute(grammar: &ContextFreeGrammar, first: &FirstSets) -> Self {
        let mut table: HashMap<Symbol, HashSet<Symbol>> = grammar
            .nonterminals()
            .iter()
            .map(|n| (n.clone(), HashSet::new()))
            .collect();
        if let Some(follow_start) = table.get_mut(grammar.start()) {
            follow_start.insert(Symbol::end_marker());
        }

        let mut changed = true;
        while changed {
            changed = false;
            for p in grammar.productions() {
                for (i, b) in p.rhs.iter().enumerate() {
                    if !b.is_nonterminal() {
                        continue;
                    }
                    let (beta_first, beta_nullable) = first.string_first(&p.rhs[i + 1..]);
                    let mut additions = beta_first;
                    if beta_nullable {
                        if let Some(follow_a) = table.get(&p.lhs) {
                            additions.extend(follow_a.iter().cloned());
                        }
                    }
                    if let Some(follow_b) = table.get_mut(b) {
                        let before = follow_b.len();
                        follow_b.extend(additions);
                        if follow_b.len() != before {
                            changed = true;
                        }
                    }
                }
            }
        }
        FollowSets { table }
    }

    /// The terminals that may appear immediately after `a` in a sentential
    /// form derived from S · $.
    pub fn terminals(&self, a: &Symbol) -> Option<&HashSet<Symbol>> {
        self.table.get(a)
    }
}
