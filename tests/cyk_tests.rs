//! Unit tests for the CYK engine

use cfg_analyzer::cyk::{cyk_parse_table, left_parse_from_table};
use cfg_analyzer::error::GrammarError;
use cfg_analyzer::grammar::ContextFreeGrammar;
use cfg_analyzer::parse::LeftParse;
use cfg_analyzer::symbol::{terminal_string, Symbol};
use std::collections::HashSet;

fn nt(name: &str) -> Symbol {
    Symbol::nonterminal(name)
}

/// Aho & Ullman example 4.8. Not quite CNF (the start symbol recurs on
/// right sides), which is what the `check` escape hatch is for.
fn example_grammar() -> ContextFreeGrammar {
    "\
S -> AA | AS | b
A -> SA | AS | a
"
    .parse()
    .unwrap()
}

fn set(names: &[&str]) -> HashSet<Symbol> {
    names.iter().map(|n| nt(n)).collect()
}

#[test]
fn test_preconditions() {
    // Not in CNF with checks on.
    let grammar = example_grammar();
    let result = cyk_parse_table(&grammar, &terminal_string("ab"), true);
    assert!(matches!(result, Err(GrammarError::Precondition(_))));

    // Empty rules are never allowed.
    let with_empty: ContextFreeGrammar = "S -> a |".parse().unwrap();
    let result = cyk_parse_table(&with_empty, &terminal_string("a"), false);
    assert!(matches!(result, Err(GrammarError::Precondition(_))));

    // Input symbols must be grammar terminals.
    let result = cyk_parse_table(&example_grammar(), &terminal_string("ax"), false);
    assert!(matches!(result, Err(GrammarError::InputMismatch(_))));

    // The algorithm is defined for nonempty input only.
    let result = cyk_parse_table(&example_grammar(), &[], false);
    assert!(matches!(result, Err(GrammarError::Precondition(_))));
}

#[test]
fn test_example_parse_table() {
    let grammar = example_grammar();
    let input = terminal_string("abaab");
    let table = cyk_parse_table(&grammar, &input, false).unwrap();

    assert_eq!(table.size(), 5);

    let expected: Vec<Vec<HashSet<Symbol>>> = vec![
        vec![
            set(&["A"]),
            set(&["A", "S"]),
            set(&["A", "S"]),
            set(&["A", "S"]),
            set(&["A", "S"]),
        ],
        vec![set(&["S"]), set(&["A"]), set(&["S"]), set(&["A", "S"])],
        vec![set(&["A"]), set(&["S"]), set(&["A", "S"])],
        vec![set(&["A"]), set(&["A", "S"])],
        vec![set(&["S"])],
    ];
    for (i, row) in expected.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            assert_eq!(
                table.get(i + 1, j + 1),
                cell,
                "cell ({}, {})",
                i + 1,
                j + 1
            );
        }
    }
    assert!(table.contains(1, 5, grammar.start()));
}

#[test]
fn test_example_left_parse() {
    let grammar = example_grammar();
    let input = terminal_string("abaab");
    let table = cyk_parse_table(&grammar, &input, false).unwrap();
    let parse = left_parse_from_table(&grammar, &input, &table, false).unwrap();

    // Smallest split point first, then smallest production index.
    assert_eq!(parse, vec![1, 6, 4, 3, 5, 6, 2, 6, 3]);

    let tree = LeftParse::new(&grammar, parse).tree().unwrap();
    let leaves: Vec<String> = tree.leaves().map(|s| s.to_string()).collect();
    assert_eq!(leaves.join(""), "abaab");
}

#[test]
fn test_membership() {
    let grammar = example_grammar();
    for word in ["b", "aa", "ab", "baa"] {
        let input = terminal_string(word);
        let table = cyk_parse_table(&grammar, &input, false).unwrap();
        let parse = left_parse_from_table(&grammar, &input, &table, false).unwrap();
        let tree = LeftParse::new(&grammar, parse).tree().unwrap();
        let leaves: Vec<String> = tree.leaves().map(|s| s.to_string()).collect();
        assert_eq!(leaves.join(""), word);
        assert!(table.contains(1, input.len(), grammar.start()));
    }
    for word in ["a", "ba"] {
        let input = terminal_string(word);
        let table = cyk_parse_table(&grammar, &input, false).unwrap();
        assert!(!table.contains(1, input.len(), grammar.start()));
        let result = left_parse_from_table(&grammar, &input, &table, false);
        assert!(matches!(result, Err(GrammarError::ParseFailure)));
    }
}

#[test]
fn test_cnf_grammar_with_checks_on() {
    // A CNF grammar for {a^n b^n | n >= 1}.
    let grammar: ContextFreeGrammar = "\
S -> XY | XZ
Z -> TY
T -> XY | XZ
X -> a
Y -> b
"
    .parse()
    .unwrap();
    for word in ["ab", "aabb", "aaabbb"] {
        let input = terminal_string(word);
        let table = cyk_parse_table(&grammar, &input, true).unwrap();
        assert!(table.contains(1, input.len(), grammar.start()), "{}", word);
        let parse = left_parse_from_table(&grammar, &input, &table, true).unwrap();
        let tree = LeftParse::new(&grammar, parse).tree().unwrap();
        let leaves: Vec<String> = tree.leaves().map(|s| s.to_string()).collect();
        assert_eq!(leaves.join(""), word);
    }
    for word in ["a", "b", "ba", "abb", "aab"] {
        let input = terminal_string(word);
        let table = cyk_parse_table(&grammar, &input, true).unwrap();
        assert!(!table.contains(1, input.len(), grammar.start()), "{}", word);
    }
}

#[test]
fn test_table_display() {
    let grammar = example_grammar();
    let input = terminal_string("ab");
    let table = cyk_parse_table(&grammar, &input, false).unwrap();
    let rendered = table.to_string();
    // Two data rows and a footer of positions.
    assert_eq!(rendered.lines().count(), 3);
    assert!(rendered.contains('|'));
    assert!(rendered.contains('S'));
}
