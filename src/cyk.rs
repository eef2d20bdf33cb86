//! The Cocke-Younger-Kasami parsing algorithm.

use crate::cnf::is_cnf;
use crate::error::{GrammarError, Result};
use crate::grammar::ContextFreeGrammar;
use crate::symbol::Symbol;
use std::collections::HashSet;
use std::fmt;

/// The triangular CYK parse table. Cell (i, j), for 1 <= i <= n and
/// 1 <= j <= n - i + 1, holds every nonterminal deriving
/// w_i ... w_{i+j-1}.
#[derive(Debug, Clone)]
pub struct CykTable {
    n: usize,
    cells: Vec<Vec<HashSet<Symbol>>>,
}

impl CykTable {
    fn new(n: usize) -> Self {
        CykTable {
            n,
            cells: (0..n).map(|i| vec![HashSet::new(); n - i]).collect(),
        }
    }

    /// The input length this table was built for.
    pub fn size(&self) -> usize {
        self.n
    }

    /// The cell for the substring of length `j` starting at position `i`,
    /// both 1-based.
    pub fn get(&self, i: usize, j: usize) -> &HashSet<Symbol> {
        &self.cells[i - 1][j - 1]
    }

    /// Whether `symbol` derives the substring of length `j` at position `i`.
    pub fn contains(&self, i: usize, j: usize, symbol: &Symbol) -> bool {
        self.get(i, j).contains(symbol)
    }

    fn insert(&mut self, i: usize, j: usize, symbol: Symbol) {
        self.cells[i - 1][j - 1].insert(symbol);
    }
}

impl fmt::Display for CykTable {
    /// A column-aligned grid: one row per substring length, longest on top,
    /// with the 1-based positions along the bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.n;
        let cell_str = |i: usize, j: usize| -> String {
            let mut symbols: Vec<&Symbol> = self.get(i, j).iter().collect();
            symbols.sort();
            symbols
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut width = n.to_string().len();
        for i in 1..=n {
            for j in 1..=n - i + 1 {
                width = width.max(cell_str(i, j).chars().count());
            }
        }
        let pad = |s: &str| format!("{:<width$}", s, width = width);
        for j in (1..=n).rev() {
            let mut row = vec![pad(&j.to_string())];
            for i in 1..=n - j + 1 {
                row.push(pad(&cell_str(i, j)));
            }
            writeln!(f, "{}", row.join("|"))?;
        }
        let mut footer = vec![pad("")];
        for i in 1..=n {
            footer.push(pad(&i.to_string()));
        }
        write!(f, "{}", footer.join(" "))
    }
}

fn check_args(
    grammar: &ContextFreeGrammar,
    input: &[Symbol],
    check: bool,
) -> Result<()> {
    for symbol in input {
        if !symbol.is_terminal() || !grammar.terminals().contains(symbol) {
            return Err(GrammarError::InputMismatch(symbol.to_string()));
        }
    }
    if grammar.has_empty_rules() {
        return Err(GrammarError::Precondition(
            "grammar has empty rules".to_string(),
        ));
    }
    if check && !is_cnf(grammar) {
        return Err(GrammarError::Precondition(
            "grammar is not in Chomsky normal form".to_string(),
        ));
    }
    if input.is_empty() {
        return Err(GrammarError::Precondition(
            "input string is empty".to_string(),
        ));
    }
    Ok(())
}

/// Builds the CYK parse table for an input string.
///
/// The grammar must be ε-free and, unless `check` is disabled for testing
/// against partially normalized grammars, in Chomsky normal form.
pub fn cyk_parse_table(
    grammar: &ContextFreeGrammar,
    input: &[Symbol],
    check: bool,
) -> Result<CykTable> {
    check_args(grammar, input, check)?;
    let n = input.len();
    let mut table = CykTable::new(n);

    for i in 1..=n {
        for p in grammar.productions() {
            if p.rhs == [input[i - 1].clone()] {
                table.insert(i, 1, p.lhs.clone());
            }
        }
    }

    for j in 2..=n {
        for i in 1..=n - j + 1 {
            for k in 1..j {
                let mut additions = Vec::new();
                for p in grammar.productions() {
                    if p.rhs.len() == 2
                        && table.contains(i, k, &p.rhs[0])
                        && table.contains(i + k, j - k, &p.rhs[1])
                    {
                        additions.push(p.lhs.clone());
                    }
                }
                for a in additions {
                    table.insert(i, j, a);
                }
            }
        }
    }

    Ok(table)
}

/// Extracts a left parse from a CYK parse table, as 1-based production
/// indices. Ties are broken by the smallest split point and then the
/// smallest production index.
pub fn left_parse_from_table(
    grammar: &ContextFreeGrammar,
    input: &[Symbol],
    table: &CykTable,
    check: bool,
) -> Result<Vec<usize>> {
    check_args(grammar, input, check)?;
    let n = input.len();
    if !table.contains(1, n, grammar.start()) {
        return Err(GrammarError::ParseFailure);
    }
    let mut parse = Vec::new();
    gen_tree(grammar, input, table, 1, n, grammar.start(), &mut parse)?;
    Ok(parse)
}

fn gen_tree(
    grammar: &ContextFreeGrammar,
    input: &[Symbol],
    table: &CykTable,
    i: usize,
    j: usize,
    a: &Symbol,
    parse: &mut Vec<usize>,
) -> Result<()> {
    if j == 1 {
        for (m, p) in grammar.productions().iter().enumerate() {
            if p.lhs == *a && p.rhs == [input[i - 1].clone()] {
                parse.push(m + 1);
                return Ok(());
            }
        }
        return Err(GrammarError::ParseFailure);
    }
    for k in 1..j {
        for (m, p) in grammar.productions().iter().enumerate() {
            if p.lhs == *a
                && p.rhs.len() == 2
                && table.contains(i, k, &p.rhs[0])
                && table.contains(i + k, j - k, &p.rhs[1])
            {
                parse.push(m + 1);
                gen_tree(grammar, input, table, i, k, &p.rhs[0], parse)?;
                gen_tree(grammar, input, table, i + k, j - k, &p.rhs[1], parse)?;
                return Ok(());
            }
        }
    }
    Err(GrammarError::ParseFailure)
}
