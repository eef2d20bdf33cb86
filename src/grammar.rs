//! Production rules and the context-free grammar type.

use crate::digraph::Digraph;
use crate::error::{GrammarError, Result};
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// A production rule A → α. The left side is a single nonterminal and the
/// right side is a sequence of symbols. An empty right side denotes an
/// ε-production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }

    /// True iff this is an ε-production.
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Production {
    /// Arrow notation. Right-side symbols are separated by spaces unless
    /// every one of them renders to a single character.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strs: Vec<String> = self.rhs.iter().map(|s| s.to_string()).collect();
        let sep = if strs.iter().all(|s| s.chars().count() == 1) {
            ""
        } else {
            " "
        };
        write!(f, "{} -> {}", self.lhs, strs.join(sep))
    }
}

/// A context-free grammar (N, Σ, P, S).
///
/// Immutable after construction; algorithms that transform a grammar return
/// a new one. The order of `P` is preserved, since most of the algorithms in
/// this crate number productions 1-based in definition order.
#[derive(Debug, Clone)]
pub struct ContextFreeGrammar {
    productions: Vec<Production>,
    nonterminals: HashSet<Symbol>,
    terminals: HashSet<Symbol>,
    start: Symbol,
}

impl ContextFreeGrammar {
    /// Builds a grammar from an explicit 4-tuple, validating that the left
    /// side of every rule is a declared nonterminal, that every right-side
    /// symbol is declared, and that the start symbol is a declared
    /// nonterminal.
    pub fn new(
        nonterminals: HashSet<Symbol>,
        terminals: HashSet<Symbol>,
        productions: Vec<Production>,
        start: Symbol,
    ) -> Result<Self> {
        for n in &nonterminals {
            if !n.is_nonterminal() {
                return Err(GrammarError::InvalidGrammar(format!(
                    "{} is declared as a nonterminal but is not one",
                    n
                )));
            }
        }
        for t in &terminals {
            if !t.is_terminal() {
                return Err(GrammarError::InvalidGrammar(format!(
                    "{} is declared as a terminal but is not one",
                    t
                )));
            }
        }
        if productions.is_empty() {
            return Err(GrammarError::InvalidGrammar(
                "no production rules were given".to_string(),
            ));
        }
        for p in &productions {
            if !nonterminals.contains(&p.lhs) {
                return Err(GrammarError::InvalidGrammar(format!(
                    "{} is on the left side of a production rule but is not a nonterminal of the grammar",
                    p.lhs
                )));
            }
            for s in &p.rhs {
                if !nonterminals.contains(s) && !terminals.contains(s) {
                    return Err(GrammarError::InvalidGrammar(format!(
                        "{} is on the right side of a production rule but is not a symbol of the grammar",
                        s
                    )));
                }
            }
        }
        if !start.is_nonterminal() || !nonterminals.contains(&start) {
            return Err(GrammarError::InvalidGrammar(format!(
                "start symbol {} is not a nonterminal of the grammar",
                start
            )));
        }
        Ok(Self {
            productions,
            nonterminals,
            terminals,
            start,
        })
    }

    /// Builds a grammar from a production list alone. The nonterminal and
    /// terminal sets are inferred from the rules and the start symbol is the
    /// left side of the first rule.
    pub fn from_productions(productions: Vec<Production>) -> Result<Self> {
        if productions.is_empty() {
            return Err(GrammarError::InvalidGrammar(
                "no production rules were given".to_string(),
            ));
        }
        let mut nonterminals = HashSet::new();
        let mut terminals = HashSet::new();
        for p in &productions {
            if !p.lhs.is_nonterminal() {
                return Err(GrammarError::InvalidGrammar(format!(
                    "{} is on the left side of a production rule but is not a nonterminal",
                    p.lhs
                )));
            }
            nonterminals.insert(p.lhs.clone());
            for s in &p.rhs {
                if s.is_nonterminal() {
                    nonterminals.insert(s.clone());
                } else {
                    terminals.insert(s.clone());
                }
            }
        }
        let start = productions[0].lhs.clone();
        Ok(Self {
            productions,
            nonterminals,
            terminals,
            start,
        })
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn nonterminals(&self) -> &HashSet<Symbol> {
        &self.nonterminals
    }

    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// All nonterminals and terminals of the grammar.
    pub fn symbols(&self) -> HashSet<Symbol> {
        self.nonterminals.union(&self.terminals).cloned().collect()
    }

    /// The rules with a certain symbol on the left side, in definition order.
    pub fn productions_with_lhs<'a>(
        &'a self,
        lhs: &'a Symbol,
    ) -> impl Iterator<Item = &'a Production> {
        self.productions.iter().filter(move |p| p.lhs == *lhs)
    }

    /// A mapping from each nonterminal to the right sides it produces, in
    /// definition order. Nonterminals without rules map to an empty list.
    pub fn production_dict(&self) -> HashMap<Symbol, Vec<Vec<Symbol>>> {
        let mut result: HashMap<Symbol, Vec<Vec<Symbol>>> = self
            .nonterminals
            .iter()
            .map(|n| (n.clone(), Vec::new()))
            .collect();
        for p in &self.productions {
            if let Some(alts) = result.get_mut(&p.lhs) {
                alts.push(p.rhs.clone());
            }
        }
        result
    }

    /// Returns whether the grammar has ε-productions.
    pub fn has_empty_rules(&self) -> bool {
        self.productions.iter().any(|p| p.rhs.is_empty())
    }

    /// Returns whether the grammar is left-recursive.
    ///
    /// Only direct left recursion through leading nonterminals is detected;
    /// left recursion hidden behind nullable prefixes is not.
    pub fn left_recursive(&self) -> bool {
        self.detect_cycle(|rhs| !rhs.is_empty())
    }

    /// Returns whether the grammar has a cycle A ⇒+ A.
    ///
    /// Only cycles through unit rules are detected; cycles hidden behind
    /// nullable siblings are not.
    pub fn cyclic(&self) -> bool {
        self.detect_cycle(|rhs| rhs.len() == 1)
    }

    fn detect_cycle(&self, condition: impl Fn(&[Symbol]) -> bool) -> bool {
        let mut g = Digraph::new();
        for p in &self.productions {
            if condition(&p.rhs) && p.rhs[0].is_nonterminal() {
                g.add_edge(p.lhs.clone(), p.rhs[0].clone());
            }
        }
        g.cyclic()
    }
}

impl FromStr for ContextFreeGrammar {
    type Err = GrammarError;

    /// Parses the short grammar form: one line per left side,
    ///
    /// ```text
    /// A -> X1 | X2 | ... | Xn
    /// ```
    ///
    /// where every symbol name is one character long and capital letters are
    /// nonterminals. An empty alternate denotes ε. The left side of the
    /// first rule becomes the start symbol.
    fn from_str(text: &str) -> Result<Self> {
        let mut productions = Vec::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let (left, right) = line.split_once("->").ok_or_else(|| {
                GrammarError::InvalidGrammar(format!("missing \"->\" in line {:?}", line))
            })?;
            let left = left.trim();
            let mut left_chars = left.chars();
            let lhs = match (left_chars.next(), left_chars.next()) {
                (Some(c), None) if c.is_uppercase() => Symbol::nonterminal(c.to_string()),
                _ => {
                    return Err(GrammarError::InvalidGrammar(format!(
                        "{:?} is not valid on the left side of a production rule",
                        left
                    )));
                }
            };
            for alternate in right.split('|') {
                let rhs: Vec<Symbol> = alternate
                    .trim()
                    .chars()
                    .map(|c| {
                        if c.is_uppercase() {
                            Symbol::nonterminal(c.to_string())
                        } else {
                            Symbol::terminal(c.to_string())
                        }
                    })
                    .collect();
                productions.push(Production::new(lhs.clone(), rhs));
            }
        }
        Self::from_productions(productions)
    }
}

impl fmt::Display for ContextFreeGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.productions {
            writeln!(f, "{}", p)?;
        }
        Ok(())
    }
}
