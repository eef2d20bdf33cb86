//! SLR(1) parse tables.
//!
//! The tables here are multi-valued: shift-reduce and reduce-reduce
//! conflicts are kept as extra entries in a cell instead of being reported
//! as errors. Two tables can be compared up to state renumbering through
//! their normal forms.

use crate::error::{GrammarError, Result};
use crate::first_follow::{FirstSets, FollowSets};
use crate::grammar::ContextFreeGrammar;
use crate::parse::production_index;
use crate::slr::Automaton;
use crate::symbol::Symbol;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

/// A parsing action in an ACTION cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    /// Reduce by the production with this 1-based index in the original
    /// grammar.
    Reduce(usize),
    Accept,
}

/// An SLR(1) parse table built from the LR(0) automaton of the augmented
/// grammar.
#[derive(Debug)]
pub struct ParsingTable {
    original: ContextFreeGrammar,
    automaton: Automaton,
    first: FirstSets,
    follow: FollowSets,
    action: Vec<HashMap<Symbol, Vec<Action>>>,
    goto: Vec<HashMap<Symbol, usize>>,
}

impl ParsingTable {
    pub fn new(grammar: &ContextFreeGrammar) -> Result<ParsingTable> {
        let automaton = Automaton::new(grammar)?;
        let augmented = automaton.augmented_grammar();
        let first = FirstSets::compute(augmented);
        let follow = FollowSets::compute(augmented, &first);

        let mut action: Vec<HashMap<Symbol, Vec<Action>>> =
            vec![HashMap::new(); automaton.num_states()];
        let mut goto: Vec<HashMap<Symbol, usize>> = vec![HashMap::new(); automaton.num_states()];

        // Shifts and gotos come straight from the transitions.
        for (i, x, j) in automaton.transitions() {
            if x.is_terminal() {
                add_action(&mut action[*i], x, Action::Shift(*j));
            } else {
                goto[*i].insert(x.clone(), *j);
            }
        }

        // Completed items yield accept for the augmenting rule and reduce
        // entries over FOLLOW of the head for every other rule.
        let end = Symbol::end_marker();
        for (i, closure) in automaton.states() {
            for item in closure.items(augmented) {
                if !item.complete() {
                    continue;
                }
                let head = &item.production().lhs;
                if head == augmented.start() {
                    add_action(&mut action[i], &end, Action::Accept);
                } else {
                    let p = production_index(grammar, head, &item.production().rhs)
                        .ok_or_else(|| {
                            GrammarError::InvalidGrammar(format!(
                                "rule {} is not in the grammar",
                                item.production()
                            ))
                        })?;
                    if let Some(follow_head) = follow.terminals(head) {
                        let mut lookaheads: Vec<&Symbol> = follow_head.iter().collect();
                        lookaheads.sort();
                        for a in lookaheads {
                            add_action(&mut action[i], a, Action::Reduce(p));
                        }
                    }
                }
            }
        }

        Ok(ParsingTable {
            original: grammar.clone(),
            automaton,
            first,
            follow,
            action,
            goto,
        })
    }

    /// The ACTION entries for a state and a terminal, possibly empty and
    /// possibly conflicting.
    pub fn action(&self, state: usize, a: &Symbol) -> &[Action] {
        self.action
            .get(state)
            .and_then(|row| row.get(a))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The GOTO entry for a state and a nonterminal.
    pub fn goto_state(&self, state: usize, a: &Symbol) -> Option<usize> {
        self.goto.get(state).and_then(|row| row.get(a)).copied()
    }

    pub fn num_states(&self) -> usize {
        self.action.len()
    }

    pub fn original_grammar(&self) -> &ContextFreeGrammar {
        &self.original
    }

    pub fn augmented_grammar(&self) -> &ContextFreeGrammar {
        self.automaton.augmented_grammar()
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn first_sets(&self) -> &FirstSets {
        &self.first
    }

    pub fn follow_sets(&self) -> &FollowSets {
        &self.follow
    }

    /// This table as a normal form suitable for equivalence testing.
    pub fn to_normal_form(&self) -> NormalForm {
        let mut result = NormalForm::new();
        for (state, row) in self.action.iter().enumerate() {
            for (a, actions) in row {
                for action in actions {
                    match action {
                        Action::Shift(j) => result.set_gotoshift(state, a.clone(), *j),
                        Action::Reduce(p) => result.add_reduction(state, a.clone(), *p),
                        Action::Accept => result.set_accept(state, a.clone()),
                    }
                }
            }
        }
        for (state, row) in self.goto.iter().enumerate() {
            for (a, j) in row {
                result.set_gotoshift(state, a.clone(), *j);
            }
        }
        result
    }

    /// Whether this table is equivalent to another one up to state
    /// renumbering.
    pub fn equivalent(&self, other: &ParsingTable) -> bool {
        self.to_normal_form().equivalent(&other.to_normal_form())
    }
}

fn add_action(row: &mut HashMap<Symbol, Vec<Action>>, a: &Symbol, action: Action) {
    let cell = row.entry(a.clone()).or_default();
    if !cell.contains(&action) {
        cell.push(action);
    }
}

/// A normal form for multi-valued SLR parse tables which makes different
/// table representations comparable.
#[derive(Debug, Clone, Default)]
pub struct NormalForm {
    reductions: HashMap<usize, HashMap<Symbol, Vec<usize>>>,
    gotoshifts: HashMap<usize, HashMap<Symbol, usize>>,
    accepts: HashMap<usize, HashSet<Symbol>>,
    terminals: HashSet<Symbol>,
    nonterminals: HashSet<Symbol>,
}

impl NormalForm {
    pub fn new() -> Self {
        NormalForm::default()
    }

    pub fn add_reduction(&mut self, state: usize, terminal: Symbol, production: usize) {
        self.note_symbol(&terminal);
        self.reductions
            .entry(state)
            .or_default()
            .entry(terminal)
            .or_default()
            .push(production);
    }

    pub fn set_gotoshift(&mut self, state: usize, symbol: Symbol, target: usize) {
        self.note_symbol(&symbol);
        self.gotoshifts.entry(state).or_default().insert(symbol, target);
    }

    pub fn set_accept(&mut self, state: usize, terminal: Symbol) {
        self.note_symbol(&terminal);
        self.accepts.entry(state).or_default().insert(terminal);
    }

    fn note_symbol(&mut self, x: &Symbol) {
        if x.is_nonterminal() {
            self.nonterminals.insert(x.clone());
        } else if *x != Symbol::end_marker() {
            self.terminals.insert(x.clone());
        }
    }

    fn reductions_of(&self, state: usize) -> HashMap<&Symbol, Vec<usize>> {
        self.reductions
            .get(&state)
            .map(|row| {
                row.iter()
                    .map(|(a, cell)| {
                        let mut sorted = cell.clone();
                        sorted.sort_unstable();
                        (a, sorted)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn gotoshift_of(&self, state: usize, x: &Symbol) -> Option<usize> {
        self.gotoshifts.get(&state).and_then(|row| row.get(x)).copied()
    }

    fn accepts_of(&self, state: usize) -> HashSet<Symbol> {
        self.accepts.get(&state).cloned().unwrap_or_default()
    }

    /// Whether two tables are equivalent up to a renumbering of states.
    ///
    /// Breadth-first search from the state pair (0, 0) in lockstep,
    /// matching transitions and accumulating a partial mapping of states.
    /// Matched states must carry equal reduction multisets per terminal,
    /// the mapping must be consistent on every shift and goto, and mapped
    /// states must agree on accepts. Both tables must range over the same
    /// terminals and nonterminals.
    pub fn equivalent(&self, other: &NormalForm) -> bool {
        if self.terminals != other.terminals || self.nonterminals != other.nonterminals {
            return false;
        }
        let symbols: Vec<&Symbol> = self.terminals.union(&self.nonterminals).collect();
        let mut queue: VecDeque<(usize, usize)> = VecDeque::from([(0, 0)]);
        let mut mapping: HashMap<usize, usize> = HashMap::from([(0, 0)]);
        while let Some((s, t)) = queue.pop_front() {
            if self.reductions_of(s) != other.reductions_of(t) {
                return false;
            }
            for &x in &symbols {
                match (self.gotoshift_of(s, x), other.gotoshift_of(t, x)) {
                    (None, None) => {}
                    (Some(_), None) | (None, Some(_)) => return false,
                    (Some(ss), Some(tt)) => match mapping.get(&ss) {
                        Some(&mapped) => {
                            if mapped != tt {
                                return false;
                            }
                        }
                        None => {
                            mapping.insert(ss, tt);
                            queue.push_back((ss, tt));
                        }
                    },
                }
            }
        }
        mapping
            .iter()
            .all(|(s, t)| self.accepts_of(*s) == other.accepts_of(*t))
    }

    fn header_and_rows(&self) -> (Vec<String>, Vec<(String, Vec<String>)>) {
        let mut terminals: Vec<&Symbol> = self.terminals.iter().collect();
        terminals.sort();
        let mut nonterminals: Vec<&Symbol> = self.nonterminals.iter().collect();
        nonterminals.sort();
        let end = Symbol::end_marker();
        let mut symbols: Vec<Symbol> = terminals.into_iter().cloned().collect();
        symbols.push(end);
        symbols.extend(nonterminals.into_iter().cloned());

        let mut states: BTreeSet<usize> = BTreeSet::new();
        states.extend(self.gotoshifts.keys());
        states.extend(self.reductions.keys());
        states.extend(self.accepts.keys());

        let mut rows = Vec::new();
        for state in states {
            let mut cells = Vec::new();
            for x in &symbols {
                let mut entries: Vec<String> = Vec::new();
                if let Some(j) = self.gotoshift_of(state, x) {
                    if x.is_terminal() {
                        entries.push(format!("sh{}", j));
                    } else {
                        entries.push(j.to_string());
                    }
                }
                if let Some(row) = self.reductions.get(&state) {
                    if let Some(cell) = row.get(x) {
                        entries.extend(cell.iter().map(|p| format!("re{}", p)));
                    }
                }
                if self.accepts_of(state).contains(x) {
                    entries.push("acc".to_string());
                }
                cells.push(entries.join(","));
            }
            rows.push((state.to_string(), cells));
        }
        let header = symbols.iter().map(|x| x.to_string()).collect();
        (header, rows)
    }

    /// The table with tab-separated cells.
    pub fn tabbed_str(&self) -> String {
        let (header, rows) = self.header_and_rows();
        let mut out = format!("\t{}", header.join("\t"));
        for (state, cells) in rows {
            out.push('\n');
            out.push_str(&state);
            out.push('\t');
            out.push_str(&cells.join("\t"));
        }
        out
    }

    /// The table with evenly spaced columns.
    pub fn spaced_str(&self) -> String {
        let (header, rows) = self.header_and_rows();
        let width = |cells: Vec<&str>| -> usize {
            (cells.iter().map(|c| c.chars().count()).max().unwrap_or(0) + 1).max(8)
        };
        let state_width = width(rows.iter().map(|(s, _)| s.as_str()).collect());
        let col_widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let mut cells: Vec<&str> = vec![h.as_str()];
                cells.extend(rows.iter().map(|(_, r)| r[i].as_str()));
                width(cells)
            })
            .collect();
        let mut out = format!("{:w$}", "", w = state_width);
        for (h, w) in header.iter().zip(&col_widths) {
            out.push_str(&format!("{:<w$}", h, w = *w));
        }
        for (state, cells) in &rows {
            out.push('\n');
            out.push_str(&format!("{:<w$}", state, w = state_width));
            for (c, w) in cells.iter().zip(&col_widths) {
                out.push_str(&format!("{:<w$}", c, w = *w));
            }
        }
        out
    }
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spaced_str())
    }
}

impl fmt::Display for ParsingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_normal_form())
    }
}

/// Builds an SLR table for a grammar directly, without materializing the
/// LR(0) closures.
///
/// State 0 is seeded from the start symbol's rules and state 1 is fixed as
/// the accept state, the goto of state 0 on the start symbol; further
/// states are numbered from 2 in discovery order. The result is equivalent
/// to `ParsingTable::new(grammar)` up to state renumbering.
pub fn build_slr_table(grammar: &ContextFreeGrammar) -> Result<NormalForm> {
    let first = FirstSets::compute(grammar);
    let follow = FollowSets::compute(grammar, &first);
    let productions = grammar.productions();

    // Items are (0-based production index, dot position).
    type ItemKey = (usize, usize);
    type Kernel = BTreeSet<ItemKey>;

    let rules_of = |a: &Symbol| -> Vec<usize> {
        productions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.lhs == *a)
            .map(|(i, _)| i)
            .collect()
    };

    let mut table = NormalForm::new();
    let mut queue: VecDeque<ItemKey> = VecDeque::new();
    // Goto kernels under construction, in first-seen symbol order.
    let mut d: Vec<(Symbol, Kernel)> = Vec::new();

    let close = |state: usize,
                     queue: &mut VecDeque<ItemKey>,
                     d: &mut Vec<(Symbol, Kernel)>,
                     table: &mut NormalForm| {
        while let Some((pi, dot)) = queue.pop_front() {
            let p = &productions[pi];
            if dot < p.rhs.len() {
                let x = &p.rhs[dot];
                let seen = d.iter().any(|(sym, _)| sym == x);
                if x.is_nonterminal() && !seen {
                    for r in rules_of(x) {
                        queue.push_back((r, 0));
                    }
                }
                match d.iter_mut().find(|(sym, _)| sym == x) {
                    Some((_, kernel)) => {
                        kernel.insert((pi, dot + 1));
                    }
                    None => {
                        d.push((x.clone(), Kernel::from([(pi, dot + 1)])));
                    }
                }
            } else if let Some(lookaheads) = follow.terminals(&p.lhs) {
                let mut sorted: Vec<&Symbol> = lookaheads.iter().collect();
                sorted.sort();
                for a in sorted {
                    table.add_reduction(state, a.clone(), pi + 1);
                }
            }
        }
    };

    let start = grammar.start().clone();
    let mut interned: HashMap<Kernel, usize> = HashMap::new();
    let mut pending: VecDeque<(Kernel, usize)> = VecDeque::new();

    // State 0: close the start rules. The goto on the start symbol becomes
    // state 1, the accept state; every other goto gets a fresh number.
    d.push((start.clone(), Kernel::new()));
    for r in rules_of(&start) {
        queue.push_back((r, 0));
    }
    close(0, &mut queue, &mut d, &mut table);
    let start_kernel = d
        .iter()
        .position(|(sym, _)| *sym == start)
        .map(|i| d.remove(i).1)
        .unwrap_or_default();
    queue.extend(start_kernel.iter().copied());
    table.set_gotoshift(0, start.clone(), 1);
    for (x, kernel) in d.drain(..) {
        let j = interned.len() + 2;
        interned.insert(kernel.clone(), j);
        pending.push_back((kernel, j));
        table.set_gotoshift(0, x, j);
    }

    // State 1 closes the items carried over the start symbol; the rest of
    // the states follow in discovery order.
    let process = |state: usize,
                       queue: &mut VecDeque<ItemKey>,
                       d: &mut Vec<(Symbol, Kernel)>,
                       table: &mut NormalForm,
                       interned: &mut HashMap<Kernel, usize>,
                       pending: &mut VecDeque<(Kernel, usize)>| {
        d.clear();
        close(state, queue, d, table);
        for (x, kernel) in d.drain(..) {
            let j = match interned.get(&kernel) {
                Some(&j) => j,
                None => {
                    let j = interned.len() + 2;
                    interned.insert(kernel.clone(), j);
                    pending.push_back((kernel, j));
                    j
                }
            };
            table.set_gotoshift(state, x, j);
        }
    };

    process(1, &mut queue, &mut d, &mut table, &mut interned, &mut pending);
    while let Some((kernel, state)) = pending.pop_front() {
        queue.extend(kernel.iter().copied());
        process(state, &mut queue, &mut d, &mut table, &mut interned, &mut pending);
    }

    table.set_accept(1, Symbol::end_marker());
    Ok(table)
}
