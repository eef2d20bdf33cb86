//! LR(0) items, closures, and the canonical automaton.

use crate::error::Result;
use crate::grammar::{ContextFreeGrammar, Production};
use crate::symbol::{next_unused_prime, Symbol};
use log::debug;
use std::fmt;

/// An LR(0) item: a production with a dot position between 0 and the length
/// of the right side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    production: Production,
    dot: usize,
}

impl Item {
    pub fn new(production: Production, dot: usize) -> Self {
        assert!(dot <= production.rhs.len(), "dot position out of bounds");
        Item { production, dot }
    }

    pub fn production(&self) -> &Production {
        &self.production
    }

    pub fn dot(&self) -> usize {
        self.dot
    }

    /// The symbol after the dot, if the item is not complete.
    pub fn after_dot(&self) -> Option<&Symbol> {
        self.production.rhs.get(self.dot)
    }

    pub fn complete(&self) -> bool {
        self.dot == self.production.rhs.len()
    }

    pub fn advanced(&self) -> Item {
        Item::new(self.production.clone(), self.dot + 1)
    }
}

impl fmt::Display for Item {
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
        write!(f, "{} -> {}", self.production.lhs, strs.join(sep))
    }
}

/// The closure of a set of kernel items. Only the kernel is stored; the
/// closure items are enumerated on demand against the grammar, so closures
/// can live inside the automaton that owns the grammar.
#[derive(Debug, Clone)]
pub struct Closure {
    kernel: Vec<Item>,
}

impl Closure {
    pub fn new(kernel: Vec<Item>) -> Self {
        Closure { kernel }
    }

    pub fn kernel_items(&self) -> &[Item] {
        &self.kernel
    }

    pub fn is_empty(&self) -> bool {
        self.kernel.is_empty()
    }

    /// The nonterminals whose rules belong to the closure: those after a
    /// dot in a kernel item, expanded transitively through rule heads.
    fn closure_nonterminals(&self, grammar: &ContextFreeGrammar) -> Vec<Symbol> {
        let mut result: Vec<Symbol> = Vec::new();
        for item in &self.kernel {
            if let Some(x) = item.after_dot() {
                if x.is_nonterminal() && !result.contains(x) {
                    result.push(x.clone());
                }
            }
        }
        let mut i = 0;
        while i < result.len() {
            let a = result[i].clone();
            for p in grammar.productions_with_lhs(&a) {
                if let Some(x) = p.rhs.first() {
                    if x.is_nonterminal() && !result.contains(x) {
                        result.push(x.clone());
                    }
                }
            }
            i += 1;
        }
        result
    }

    /// All items of the closure: the kernel followed by a fresh item for
    /// every rule of every closure nonterminal.
    pub fn items(&self, grammar: &ContextFreeGrammar) -> Vec<Item> {
        let mut result = self.kernel.clone();
        for a in self.closure_nonterminals(grammar) {
            for p in grammar.productions_with_lhs(&a) {
                result.push(Item::new(p.clone(), 0));
            }
        }
        result
    }

    /// The symbols on which this closure has transitions to non-empty
    /// closures, in enumeration order.
    pub fn goto_symbols(&self, grammar: &ContextFreeGrammar) -> Vec<Symbol> {
        let mut seen = Vec::new();
        for item in self.items(grammar) {
            if let Some(x) = item.after_dot() {
                if !seen.contains(x) {
                    seen.push(x.clone());
                }
            }
        }
        seen
    }

    /// The closure this one transitions to on a symbol.
    pub fn goto(&self, grammar: &ContextFreeGrammar, x: &Symbol) -> Closure {
        let kernel = self
            .items(grammar)
            .into_iter()
            .filter(|item| item.after_dot() == Some(x))
            .map(|item| item.advanced())
            .collect();
        Closure::new(kernel)
    }

    /// Kernel-set equality, order-insensitive.
    pub fn same_kernel(&self, other: &Closure) -> bool {
        self.kernel.len() == other.kernel.len()
            && self.kernel.iter().all(|item| other.kernel.contains(item))
    }
}

/// Checks whether a grammar is already augmented: the start symbol is the
/// left side of exactly one rule and appears on no right side.
pub fn is_augmented(grammar: &ContextFreeGrammar) -> bool {
    grammar.productions_with_lhs(grammar.start()).count() == 1
        && !grammar
            .productions()
            .iter()
            .any(|p| p.rhs.contains(grammar.start()))
}

/// Augments a grammar with a fresh primed start symbol, if necessary. The
/// new rule S' → S is placed first.
pub fn augmented(grammar: &ContextFreeGrammar) -> Result<ContextFreeGrammar> {
    if is_augmented(grammar) {
        return Ok(grammar.clone());
    }
    let fresh = next_unused_prime(grammar.start().name(), grammar.nonterminals());
    let mut nonterminals = grammar.nonterminals().clone();
    nonterminals.insert(fresh.clone());
    let mut productions = vec![Production::new(fresh.clone(), vec![grammar.start().clone()])];
    productions.extend(grammar.productions().iter().cloned());
    ContextFreeGrammar::new(
        nonterminals,
        grammar.terminals().clone(),
        productions,
        fresh,
    )
}

/// The canonical collection of LR(0) item sets of the augmented grammar,
/// with its transitions. States are numbered in discovery (BFS) order from
/// the closure of `[S' -> ·S]`.
#[derive(Debug)]
pub struct Automaton {
    grammar: ContextFreeGrammar,
    states: Vec<Closure>,
    transitions: Vec<(usize, Symbol, usize)>,
}

impl Automaton {
    pub fn new(grammar: &ContextFreeGrammar) -> Result<Automaton> {
        let grammar = augmented(grammar)?;
        let initial = {
            let mut kernel = Vec::new();
            for p in grammar.productions_with_lhs(grammar.start()) {
                kernel.push(Item::new(p.clone(), 0));
            }
            Closure::new(kernel)
        };

        let mut states = vec![initial];
        let mut transitions = Vec::new();
        let mut i = 0;
        while i < states.len() {
            for x in states[i].goto_symbols(&grammar) {
                let target = states[i].goto(&grammar, &x);
                if target.is_empty() {
                    continue;
                }
                let index = match states.iter().position(|s| s.same_kernel(&target)) {
                    Some(index) => index,
                    None => {
                        states.push(target);
                        states.len() - 1
                    }
                };
                transitions.push((i, x, index));
            }
            i += 1;
        }
        debug!("LR(0) automaton has {} states", states.len());
        Ok(Automaton {
            grammar,
            states,
            transitions,
        })
    }

    /// The augmented grammar the states refer to.
    pub fn augmented_grammar(&self) -> &ContextFreeGrammar {
        &self.grammar
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// The states with their indices, in discovery order.
    pub fn states(&self) -> impl Iterator<Item = (usize, &Closure)> {
        self.states.iter().enumerate()
    }

    pub fn state(&self, i: usize) -> &Closure {
        &self.states[i]
    }

    /// All transitions as (source, symbol, target) triples.
    pub fn transitions(&self) -> &[(usize, Symbol, usize)] {
        &self.transitions
    }
}
