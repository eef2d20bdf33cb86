//! Conversion of grammars to Chomsky normal form.
//!
//! The transformation runs in five phases: start augmentation, ε-rule
//! removal, unit-rule removal, binarization, and terminal proxying. The
//! first three phases always act on the first matching rule so results are
//! reproducible.

use crate::error::Result;
use crate::grammar::{ContextFreeGrammar, Production};
use crate::symbol::{next_unused_subscript, Symbol};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Returns whether a production rule is in CNF with respect to the
/// grammar's start symbol: a single terminal, two non-start nonterminals,
/// or the start-only ε rule.
pub fn is_cnf_rule(rule: &Production, start: &Symbol) -> bool {
    (rule.rhs.len() == 1 && rule.rhs[0].is_terminal())
        || (rule.rhs.len() == 2
            && rule.rhs.iter().all(|x| x.is_nonterminal() && x != start))
        || (rule.lhs == *start && rule.rhs.is_empty())
}

/// Returns whether a grammar is in CNF.
pub fn is_cnf(grammar: &ContextFreeGrammar) -> bool {
    grammar
        .productions()
        .iter()
        .all(|p| is_cnf_rule(p, grammar.start()))
}

/// All of the distinct ways of replacing any subset of the occurrences of
/// `rule.lhs` in a sentence with `rule.rhs`, including no change at all.
fn substitutions(sentence: &[Symbol], rule: &Production) -> Vec<Vec<Symbol>> {
    let indices: Vec<usize> = sentence
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == rule.lhs)
        .map(|(i, _)| i)
        .collect();
    let mut result = Vec::new();
    for mask in 0u64..(1u64 << indices.len()) {
        let mut substitution = Vec::new();
        for (i, symbol) in sentence.iter().enumerate() {
            match indices.iter().position(|&j| j == i) {
                Some(bit) if mask & (1 << bit) != 0 => {
                    substitution.extend(rule.rhs.iter().cloned());
                }
                _ => substitution.push(symbol.clone()),
            }
        }
        if !result.contains(&substitution) {
            result.push(substitution);
        }
    }
    result
}

/// Rewrites a rule into an equivalent list of rules whose right sides are at
/// most two symbols long, naming the fresh nonterminals after the tail they
/// produce.
fn chain(rule: Production, used: &HashSet<Symbol>) -> Vec<Production> {
    if rule.rhs.len() <= 2 {
        return vec![rule];
    }
    let first = rule.rhs[0].clone();
    let tail: Vec<Symbol> = rule.rhs[1..].to_vec();
    let tail_name: String = tail.iter().map(|s| s.to_string()).collect();
    let second = next_unused_subscript(&tail_name, used);
    let head_rule = Production::new(rule.lhs, vec![first, second.clone()]);
    let tail_rule = Production::new(second.clone(), tail);
    let mut deeper_used = used.clone();
    deeper_used.insert(second);
    let mut result = vec![head_rule];
    result.extend(chain(tail_rule, &deeper_used));
    result
}

/// The nonterminals appearing anywhere in a list of productions.
fn rule_variables(productions: &[Production]) -> HashSet<Symbol> {
    let mut result = HashSet::new();
    for p in productions {
        result.insert(p.lhs.clone());
        for s in &p.rhs {
            if s.is_nonterminal() {
                result.insert(s.clone());
            }
        }
    }
    result
}

/// Converts a grammar to an equivalent grammar in Chomsky normal form.
///
/// The result generates L(G) \ {ε}, plus ε via a start-only ε rule exactly
/// when ε ∈ L(G).
pub fn chomsky_normal_form(grammar: &ContextFreeGrammar) -> Result<ContextFreeGrammar> {
    let mut productions: Vec<Production> = grammar.productions().to_vec();

    // Fresh start variable, subscript 0 unless that name is taken.
    let start = {
        let mut n = 0;
        loop {
            let candidate = Symbol::subscripted(grammar.start().name(), n);
            if !grammar.nonterminals().contains(&candidate) {
                break candidate;
            }
            n += 1;
        }
    };
    productions.insert(0, Production::new(start.clone(), vec![grammar.start().clone()]));

    // Remove ε rules, always the first remaining one, substituting every
    // subset of the removed variable's occurrences throughout.
    let mut removed: Vec<Production> = Vec::new();
    while let Some(i) = productions
        .iter()
        .position(|p| p.rhs.is_empty() && p.lhs != start)
    {
        let pe = productions.remove(i);
        removed.push(pe.clone());
        let mut next = Vec::new();
        for rule in &productions {
            for sentence in substitutions(&rule.rhs, &pe) {
                let candidate = Production::new(rule.lhs.clone(), sentence);
                if !removed.contains(&candidate) && !next.contains(&candidate) {
                    next.push(candidate);
                }
            }
        }
        productions = next;
    }
    debug!("{} rules after epsilon removal", productions.len());

    // Remove unit rules, again first-match order.
    let mut removed: Vec<Production> = Vec::new();
    while let Some(i) = productions
        .iter()
        .position(|p| p.rhs.len() == 1 && p.rhs[0].is_nonterminal())
    {
        let pu = productions[i].clone();
        removed.push(pu.clone());
        let replacement: Vec<Production> = productions
            .iter()
            .filter(|p| p.lhs == pu.rhs[0])
            .map(|p| Production::new(pu.lhs.clone(), p.rhs.clone()))
            .filter(|r| !productions.contains(r) && !removed.contains(r))
            .collect();
        productions.splice(i..i + 1, replacement);
    }
    debug!("{} rules after unit removal", productions.len());

    // Chain long right sides down to length two.
    let mut i = 0;
    while i < productions.len() {
        let used = rule_variables(&productions);
        let new_rules = chain(productions[i].clone(), &used);
        let advance = new_rules.len();
        productions.splice(i..i + 1, new_rules);
        i += advance;
    }

    // Replace terminals in long rules with proxy variables. Proxies are
    // allocated in symbol order, each reserving its name before the next is
    // chosen.
    let mut taken = rule_variables(&productions);
    let mut sorted_terminals: Vec<Symbol> = grammar.terminals().iter().cloned().collect();
    sorted_terminals.sort();
    let mut proxy_rules: HashMap<Symbol, Production> = HashMap::new();
    for t in &sorted_terminals {
        let proxy = next_unused_subscript(&t.name().to_uppercase(), &taken);
        taken.insert(proxy.clone());
        proxy_rules.insert(t.clone(), Production::new(proxy, vec![t.clone()]));
    }
    let mut appended: HashSet<Symbol> = HashSet::new();
    let mut i = 0;
    while i < productions.len() {
        if productions[i].rhs.len() >= 2 {
            let mut new_rhs = Vec::with_capacity(productions[i].rhs.len());
            let mut replaced = Vec::new();
            for s in &productions[i].rhs {
                match proxy_rules.get(s) {
                    Some(proxy) if s.is_terminal() => {
                        new_rhs.push(proxy.lhs.clone());
                        replaced.push(s.clone());
                    }
                    _ => new_rhs.push(s.clone()),
                }
            }
            productions[i] = Production::new(productions[i].lhs.clone(), new_rhs);
            for t in replaced {
                if appended.insert(t.clone()) {
                    if let Some(proxy) = proxy_rules.get(&t) {
                        productions.push(proxy.clone());
                    }
                }
            }
        }
        i += 1;
    }

    ContextFreeGrammar::from_productions(productions)
}
