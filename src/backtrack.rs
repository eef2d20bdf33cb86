//! Top-down and bottom-up backtrack parsing.
//!
//! Both parsers are configuration machines over 4-tuples
//! (state, input pointer, history pushdown, work pushdown) in the style of
//! Aho & Ullman, "The Theory of Parsing, Translation, and Compiling",
//! algorithms 4.1 and 4.2. Each can emit its configuration sequence, one
//! line per configuration, to an injectable sink.

use crate::error::{GrammarError, Result};
use crate::grammar::ContextFreeGrammar;
use crate::parse::production_index;
use crate::symbol::Symbol;
use std::collections::{HashMap, VecDeque};

/// A sink receiving one trace line per parser configuration. `None` traces
/// nothing and costs nothing.
pub type TraceSink<'a> = Option<&'a mut dyn FnMut(&str)>;

#[derive(Clone, Copy, PartialEq)]
enum State {
    Normal,
    Backtracking,
    Accepted,
}

impl State {
    fn letter(self) -> char {
        match self {
            State::Normal => 'q',
            State::Backtracking => 'b',
            State::Accepted => 't',
        }
    }
}

fn emit(trace: &mut TraceSink<'_>, line: &str) {
    if let Some(sink) = trace.as_mut() {
        sink(line);
    }
}

/// Checks that every input symbol is a terminal declared in the grammar.
fn check_input(grammar: &ContextFreeGrammar, input: &[Symbol]) -> Result<()> {
    for symbol in input {
        if !symbol.is_terminal() || !grammar.terminals().contains(symbol) {
            return Err(GrammarError::InputMismatch(symbol.to_string()));
        }
    }
    Ok(())
}

/// An entry of the top-down parser's history pushdown: either an input
/// symbol shifted over, or a nonterminal with the 1-based index of the
/// alternate currently tried for it.
enum TopdownEntry {
    Input(Symbol),
    Alternate(Symbol, usize),
}

fn topdown_config(state: State, i: usize, alpha: &[TopdownEntry], beta: &[Symbol]) -> String {
    let alpha_str = if alpha.is_empty() {
        "e".to_string()
    } else {
        alpha
            .iter()
            .map(|entry| match entry {
                TopdownEntry::Input(s) => s.to_string(),
                TopdownEntry::Alternate(a, j) => format!("{}{}", a, j),
            })
            .collect::<Vec<_>>()
            .join(" ")
    };
    let beta_str = if beta.is_empty() {
        "e".to_string()
    } else {
        beta.iter().map(|s| s.to_string()).collect()
    };
    format!("({}, {}, {}, {})", state.letter(), i, alpha_str, beta_str)
}

/// Top-down backtrack parsing.
///
/// The grammar must not be left-recursive. On success returns the left
/// parse of `input` as a sequence of 1-based production indices.
pub fn topdown_backtrack_parse(
    grammar: &ContextFreeGrammar,
    input: &[Symbol],
    mut trace: TraceSink<'_>,
) -> Result<Vec<usize>> {
    check_input(grammar, input)?;
    if grammar.left_recursive() {
        return Err(GrammarError::Precondition(
            "grammar is left-recursive".to_string(),
        ));
    }

    let alternates: HashMap<Symbol, Vec<Vec<Symbol>>> = grammar.production_dict();
    let alts = |a: &Symbol| -> &[Vec<Symbol>] {
        alternates.get(a).map(Vec::as_slice).unwrap_or(&[])
    };
    let n = input.len();
    let marker = Symbol::end_marker();
    let start = grammar.start().clone();

    let mut state = State::Normal;
    let mut i: usize = 1;
    let mut alpha: Vec<TopdownEntry> = Vec::new();
    let mut beta: Vec<Symbol> = vec![start.clone(), marker.clone()];

    emit(&mut trace, &topdown_config(state, i, &alpha, &beta));

    loop {
        let moved = match state {
            State::Normal if i == n + 1 && beta.len() == 1 && beta[0] == marker => {
                // Successful conclusion.
                state = State::Accepted;
                beta.clear();
                true
            }
            State::Normal if beta.first().is_some_and(Symbol::is_nonterminal) => {
                // Expand the leftmost nonterminal with its first alternate.
                let a = beta[0].clone();
                match alts(&a).first().cloned() {
                    Some(gamma) => {
                        beta.splice(0..1, gamma);
                        alpha.push(TopdownEntry::Alternate(a, 1));
                    }
                    None => state = State::Backtracking,
                }
                true
            }
            State::Normal if !beta.is_empty() => {
                // Terminal on top of the work pushdown: match or fail.
                if i <= n && beta[0] == input[i - 1] {
                    let t = beta.remove(0);
                    alpha.push(TopdownEntry::Input(t));
                    i += 1;
                } else {
                    state = State::Backtracking;
                }
                true
            }
            State::Backtracking => match alpha.pop() {
                Some(TopdownEntry::Input(t)) => {
                    // Shift an input symbol back.
                    i -= 1;
                    beta.insert(0, t);
                    true
                }
                Some(TopdownEntry::Alternate(a, j)) => {
                    let glen = alts(&a)[j - 1].len();
                    if beta.len() >= glen && beta[..glen] == alts(&a)[j - 1][..] {
                        if j < alts(&a).len() {
                            // Try the next alternate.
                            let gamma_next: Vec<Symbol> = alts(&a)[j].clone();
                            alpha.push(TopdownEntry::Alternate(a, j + 1));
                            beta.splice(0..glen, gamma_next);
                            true
                        } else if i == 1 && a == start {
                            // All alternates of the start symbol exhausted
                            // at the first input position: no parse exists.
                            false
                        } else {
                            // Alternates exhausted: restore the nonterminal.
                            beta.splice(0..glen, [a]);
                            true
                        }
                    } else {
                        false
                    }
                }
                None => false,
            },
            _ => false,
        };
        if !moved {
            break;
        }
        emit(&mut trace, &format!("|- {}", topdown_config(state, i, &alpha, &beta)));
    }

    if state == State::Accepted && i == n + 1 && beta.is_empty() {
        let mut parse = Vec::new();
        for entry in &alpha {
            if let TopdownEntry::Alternate(a, j) = entry {
                let index = production_index(grammar, a, &alts(a)[j - 1])
                    .ok_or(GrammarError::ParseFailure)?;
                parse.push(index);
            }
        }
        Ok(parse)
    } else {
        Err(GrammarError::ParseFailure)
    }
}

/// An entry of the bottom-up parser's history pushdown: a shift, or the
/// 1-based index of a reduction.
#[derive(Clone, Copy, PartialEq)]
enum BottomupEntry {
    Shift,
    Reduce(usize),
}

fn bottomup_config(
    state: State,
    i: usize,
    alpha: &[Symbol],
    history: &VecDeque<BottomupEntry>,
) -> String {
    let alpha_str = if alpha.is_empty() {
        "e".to_string()
    } else {
        alpha.iter().map(|s| s.to_string()).collect()
    };
    let history_str = if history.is_empty() {
        "e".to_string()
    } else {
        history
            .iter()
            .map(|entry| match entry {
                BottomupEntry::Shift => "s".to_string(),
                BottomupEntry::Reduce(j) => j.to_string(),
            })
            .collect()
    };
    format!("({}, {}, {}, {})", state.letter(), i, alpha_str, history_str)
}

/// Bottom-up backtrack parsing.
///
/// The grammar must have no ε-productions and no cycles. On success returns
/// the right parse of `input` in reverse, as a sequence of 1-based
/// production indices.
pub fn bottomup_backtrack_parse(
    grammar: &ContextFreeGrammar,
    input: &[Symbol],
    mut trace: TraceSink<'_>,
) -> Result<Vec<usize>> {
    check_input(grammar, input)?;
    if grammar.has_empty_rules() {
        return Err(GrammarError::Precondition(
            "grammar has empty rules".to_string(),
        ));
    }
    if grammar.cyclic() {
        return Err(GrammarError::Precondition("grammar is cyclic".to_string()));
    }

    let productions = grammar.productions();
    let p = productions.len();
    let n = input.len();
    let marker = Symbol::end_marker();
    let start = grammar.start().clone();

    // Lowest-numbered rule, counting from `from`, whose right side is a
    // suffix of the sentential form.
    let first_suffix = |form: &[Symbol], from: usize| -> Option<usize> {
        (from..=p).find(|&k| form.ends_with(&productions[k - 1].rhs))
    };

    let mut state = State::Normal;
    let mut i: usize = 1;
    let mut alpha: Vec<Symbol> = vec![marker.clone()];
    let mut history: VecDeque<BottomupEntry> = VecDeque::new();

    emit(&mut trace, &bottomup_config(state, i, &alpha, &history));

    loop {
        // Step 1: reduce with the lowest-numbered applicable rule.
        if state == State::Normal {
            if let Some(j) = first_suffix(&alpha, 1) {
                let rule = &productions[j - 1];
                alpha.truncate(alpha.len() - rule.rhs.len());
                alpha.push(rule.lhs.clone());
                history.push_front(BottomupEntry::Reduce(j));
                emit(&mut trace, &format!("|- {}", bottomup_config(state, i, &alpha, &history)));
                continue;
            }
        }

        // Step 2: shift.
        if state == State::Normal && i != n + 1 {
            alpha.push(input[i - 1].clone());
            history.push_front(BottomupEntry::Shift);
            i += 1;
            emit(&mut trace, &format!("|- {}", bottomup_config(state, i, &alpha, &history)));
            continue;
        }

        // Step 3: accept.
        if state == State::Normal && i == n + 1 && alpha == [marker.clone(), start.clone()] {
            state = State::Accepted;
            emit(&mut trace, &format!("|- {}", bottomup_config(state, i, &alpha, &history)));
            return Ok(history
                .iter()
                .filter_map(|entry| match entry {
                    BottomupEntry::Reduce(j) => Some(*j),
                    BottomupEntry::Shift => None,
                })
                .collect());
        }

        // Step 4: enter backtracking mode.
        if state == State::Normal {
            state = State::Backtracking;
            emit(&mut trace, &format!("|- {}", bottomup_config(state, i, &alpha, &history)));
        }

        // Step 5: undo the most recent reduction or shift.
        loop {
            let top_reduction = match (alpha.last(), history.front()) {
                (Some(a), Some(BottomupEntry::Reduce(j)))
                    if a.is_nonterminal() && productions[*j - 1].lhs == *a =>
                {
                    Some(*j)
                }
                _ => None,
            };
            if let Some(j) = top_reduction {
                let mut tempalpha = alpha[..alpha.len() - 1].to_vec();
                tempalpha.extend(productions[j - 1].rhs.iter().cloned());
                if let Some(k) = first_suffix(&tempalpha, j + 1) {
                    // (a) Try the next alternative reduction.
                    let rule = &productions[k - 1];
                    tempalpha.truncate(tempalpha.len() - rule.rhs.len());
                    tempalpha.push(rule.lhs.clone());
                    alpha = tempalpha;
                    history[0] = BottomupEntry::Reduce(k);
                    state = State::Normal;
                    emit(&mut trace, &format!("|- {}", bottomup_config(state, i, &alpha, &history)));
                    break;
                } else if i == n + 1 {
                    // (b) Undo the reduction and keep backtracking.
                    alpha = tempalpha;
                    history.pop_front();
                    emit(&mut trace, &format!("|- {}", bottomup_config(state, i, &alpha, &history)));
                    continue;
                } else {
                    // (c) Undo the reduction and shift instead.
                    tempalpha.push(input[i - 1].clone());
                    alpha = tempalpha;
                    i += 1;
                    history[0] = BottomupEntry::Shift;
                    state = State::Normal;
                    emit(&mut trace, &format!("|- {}", bottomup_config(state, i, &alpha, &history)));
                    break;
                }
            } else if alpha.last().is_some_and(Symbol::is_terminal)
                && history.front() == Some(&BottomupEntry::Shift)
                && alpha.len() > 1
            {
                // (d) Undo a shift.
                i -= 1;
                alpha.pop();
                history.pop_front();
                emit(&mut trace, &format!("|- {}", bottomup_config(state, i, &alpha, &history)));
                continue;
            } else {
                return Err(GrammarError::ParseFailure);
            }
        }
    }
}
