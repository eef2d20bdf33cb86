//! Unit tests for the symbol module

use cfg_analyzer::symbol::*;
use std::collections::HashSet;

#[test]
fn test_symbol_identity() {
    assert_eq!(Symbol::nonterminal("X"), Symbol::nonterminal("X"));
    assert_ne!(Symbol::nonterminal("X"), Symbol::nonterminal("Y"));
    assert_eq!(
        Symbol::nonterminal("Noun phrase"),
        Symbol::nonterminal("Noun phrase")
    );
    assert_eq!(Symbol::terminal("the"), Symbol::terminal("the"));
    assert_ne!(Symbol::terminal("x"), Symbol::terminal("y"));
    assert_ne!(Symbol::nonterminal("A"), Symbol::terminal("A"));
    assert_ne!(Symbol::terminal("a"), Symbol::nonterminal("a"));
}

#[test]
fn test_symbols_deduplicate_in_sets() {
    let symbols: HashSet<Symbol> = "AABBC".chars().map(|c| Symbol::nonterminal(c.to_string())).collect();
    assert_eq!(symbols.len(), 3);

    let mut mixed: HashSet<Symbol> = HashSet::new();
    for c in "XXYYZ".chars() {
        mixed.insert(Symbol::nonterminal(c.to_string()));
        mixed.insert(Symbol::terminal(c.to_string()));
    }
    assert_eq!(mixed.len(), 6);
}

#[test]
fn test_refinements_are_distinct_symbols() {
    assert_ne!(Symbol::subscripted("S", 0), Symbol::nonterminal("S"));
    assert_ne!(Symbol::nonterminal("S"), Symbol::primed("S", 5));
    assert_eq!(Symbol::subscripted("A", 5), Symbol::subscripted("A", 5));
    assert_ne!(Symbol::subscripted("A", 1), Symbol::subscripted("A", 2));
    assert_ne!(Symbol::subscripted("A", 1), Symbol::subscripted("B", 1));
    assert_eq!(Symbol::primed("A", 3), Symbol::primed("A", 3));
    assert_ne!(Symbol::primed("A", 1), Symbol::primed("A", 2));
    assert_ne!(Symbol::primed("A", 2), Symbol::subscripted("A", 2));

    let all: HashSet<Symbol> = [
        Symbol::nonterminal("S"),
        Symbol::terminal("S"),
        Symbol::subscripted("S", 1),
        Symbol::primed("S", 1),
        Symbol::marker("S"),
    ]
    .into_iter()
    .collect();
    assert_eq!(all.len(), 5);
}

#[test]
fn test_marker_identity() {
    assert_eq!(Symbol::marker("$"), Symbol::marker("$"));
    assert_ne!(Symbol::marker("$"), Symbol::marker("#"));
    assert_ne!(Symbol::marker("$"), Symbol::terminal("$"));
    assert_ne!(Symbol::marker("$"), Symbol::nonterminal("$"));
    assert!(Symbol::marker("$").is_terminal());
}

#[test]
fn test_epsilon_is_a_terminal_with_empty_name() {
    assert!(Symbol::Epsilon.is_terminal());
    assert!(!Symbol::Epsilon.is_nonterminal());
    assert_eq!(Symbol::Epsilon.name(), "");
}

#[test]
fn test_predicates() {
    assert!(Symbol::nonterminal("A").is_nonterminal());
    assert!(!Symbol::nonterminal("A").is_terminal());
    assert!(Symbol::terminal("a").is_terminal());
    assert!(Symbol::marker("$").is_marker());
    assert!(!Symbol::terminal("$").is_marker());
}

#[test]
fn test_ordering_is_stable_and_total() {
    let mut symbols = vec![
        Symbol::marker("$"),
        Symbol::terminal("b"),
        Symbol::Epsilon,
        Symbol::nonterminal("B"),
        Symbol::nonterminal("A"),
        Symbol::terminal("a"),
    ];
    symbols.sort();
    assert_eq!(
        symbols,
        vec![
            Symbol::nonterminal("A"),
            Symbol::nonterminal("B"),
            Symbol::terminal("a"),
            Symbol::terminal("b"),
            Symbol::Epsilon,
            Symbol::marker("$"),
        ]
    );
}

#[test]
fn test_terminal_string() {
    let symbols = terminal_string("a+b");
    assert_eq!(
        symbols,
        vec![
            Symbol::terminal("a"),
            Symbol::terminal("+"),
            Symbol::terminal("b"),
        ]
    );
}

#[test]
fn test_next_unused_allocators() {
    let taken: HashSet<Symbol> = (0..10)
        .chain(20..30)
        .map(|i| Symbol::subscripted("A", i))
        .collect();
    assert_eq!(next_unused_subscript("A", &taken), Symbol::subscripted("A", 10));
    assert_eq!(next_unused_subscript("S", &taken), Symbol::subscripted("S", 1));
    assert_eq!(next_unused_prime("A", &taken), Symbol::primed("A", 1));
}
