//! Unit tests for the Earley engine

use cfg_analyzer::earley::{earley_parse, right_parse_from_lists, EarleyItem};
use cfg_analyzer::error::GrammarError;
use cfg_analyzer::grammar::ContextFreeGrammar;
use cfg_analyzer::parse::RightParse;
use cfg_analyzer::symbol::terminal_string;

/// Aho & Ullman example 4.10.
fn example_grammar() -> ContextFreeGrammar {
    "\
E -> T+E
E -> T
T -> F*T
T -> F
F -> (E)
F -> a
"
    .parse()
    .unwrap()
}

/// Renders a parse list as (1-based rule index, dot, origin) triples.
fn triples(grammar: &ContextFreeGrammar, list: &[EarleyItem]) -> Vec<(usize, usize, usize)> {
    list.iter()
        .map(|item| {
            let rule = grammar
                .productions()
                .iter()
                .position(|p| *p == item.production)
                .expect("item rule in grammar")
                + 1;
            (rule, item.dot, item.origin)
        })
        .collect()
}

#[test]
fn test_input_validation() {
    let grammar = example_grammar();
    let result = earley_parse(&grammar, &terminal_string("x"));
    assert!(matches!(result, Err(GrammarError::InputMismatch(_))));
}

#[test]
fn test_example_parse_lists() {
    let grammar = example_grammar();
    let input = terminal_string("(a+a)*a");
    let lists = earley_parse(&grammar, &input).unwrap();
    assert_eq!(lists.len(), 8);

    let expected: Vec<Vec<(usize, usize, usize)>> = vec![
        vec![(1, 0, 0), (2, 0, 0), (3, 0, 0), (4, 0, 0), (5, 0, 0), (6, 0, 0)],
        vec![
            (5, 1, 0),
            (1, 0, 1),
            (2, 0, 1),
            (3, 0, 1),
            (4, 0, 1),
            (5, 0, 1),
            (6, 0, 1),
        ],
        vec![(6, 1, 1), (3, 1, 1), (4, 1, 1), (1, 1, 1), (2, 1, 1), (5, 2, 0)],
        vec![
            (1, 2, 1),
            (1, 0, 3),
            (2, 0, 3),
            (3, 0, 3),
            (4, 0, 3),
            (5, 0, 3),
            (6, 0, 3),
        ],
        vec![
            (6, 1, 3),
            (3, 1, 3),
            (4, 1, 3),
            (1, 1, 3),
            (2, 1, 3),
            (1, 3, 1),
            (5, 2, 0),
        ],
        vec![(5, 3, 0), (3, 1, 0), (4, 1, 0), (1, 1, 0), (2, 1, 0)],
        vec![(3, 2, 0), (3, 0, 6), (4, 0, 6), (5, 0, 6), (6, 0, 6)],
        vec![(6, 1, 6), (3, 1, 6), (4, 1, 6), (3, 3, 0), (1, 1, 0), (2, 1, 0)],
    ];
    for (j, expected_list) in expected.iter().enumerate() {
        assert_eq!(
            &triples(&grammar, &lists[j]),
            expected_list,
            "parse list I{}",
            j
        );
    }
}

#[test]
fn test_example_right_parse() {
    let grammar = example_grammar();
    let input = terminal_string("(a+a)*a");
    let lists = earley_parse(&grammar, &input).unwrap();
    let parse = right_parse_from_lists(&grammar, &input, &lists).unwrap();
    assert_eq!(parse, vec![6, 4, 6, 4, 2, 1, 5, 6, 4, 3, 2]);

    let tree = RightParse::new(&grammar, parse).tree().unwrap();
    let leaves: Vec<String> = tree.leaves().map(|s| s.to_string()).collect();
    assert_eq!(leaves.join(""), "(a+a)*a");
}

#[test]
fn test_membership() {
    let grammar = example_grammar();
    for word in [
        "a", "a*a", "a+a*a", "a*a+a", "a+a+a", "(a)", "a*(a+a)", "a+(a*a)", "(((((a)))))",
    ] {
        let input = terminal_string(word);
        let lists = earley_parse(&grammar, &input).unwrap();
        let parse = right_parse_from_lists(&grammar, &input, &lists).unwrap();
        let tree = RightParse::new(&grammar, parse).tree().unwrap();
        let leaves: Vec<String> = tree.leaves().map(|s| s.to_string()).collect();
        assert_eq!(leaves.join(""), word, "sound parse for {:?}", word);
    }
    for word in ["", "+", "aa", "()", "(a))", "a+()", "(((((a))))", "(((((a))))))"] {
        let input = terminal_string(word);
        let lists = earley_parse(&grammar, &input).unwrap();
        let result = right_parse_from_lists(&grammar, &input, &lists);
        assert!(
            matches!(result, Err(GrammarError::ParseFailure)),
            "rejects {:?}",
            word
        );
    }
}

#[test]
fn test_nullable_grammar_recognition() {
    // Parse lists handle ε rules; the language here is a*.
    let grammar: ContextFreeGrammar = "S -> aS |".parse().unwrap();
    for word in ["", "a", "aaa"] {
        let input = terminal_string(word);
        let lists = earley_parse(&grammar, &input).unwrap();
        let accepted = lists[input.len()]
            .iter()
            .any(|item| item.production.lhs == *grammar.start() && item.complete() && item.origin == 0);
        assert!(accepted, "accepts {:?}", word);
    }
    let input = terminal_string("b");
    assert!(matches!(
        earley_parse(&grammar, &input),
        Err(GrammarError::InputMismatch(_))
    ));
}

#[test]
fn test_extraction_requires_acyclic_grammar() {
    let grammar: ContextFreeGrammar = "A -> B | a\nB -> A".parse().unwrap();
    let input = terminal_string("a");
    let lists = earley_parse(&grammar, &input).unwrap();
    let result = right_parse_from_lists(&grammar, &input, &lists);
    assert!(matches!(result, Err(GrammarError::Precondition(_))));
}

#[test]
fn test_item_display() {
    let grammar = example_grammar();
    let item = EarleyItem::new(grammar.productions()[0].clone(), 1, 0);
    assert_eq!(item.to_string(), "[E -> T.+E, 0]");
}
