//! Unit tests for the extended-syntax grammar reader

use cfg_analyzer::grammar::{ContextFreeGrammar, Production};
use cfg_analyzer::reader::{parse_cfg, parse_extended};
use cfg_analyzer::symbol::Symbol;

fn nt(name: &str) -> Symbol {
    Symbol::nonterminal(name)
}

fn t(name: &str) -> Symbol {
    Symbol::terminal(name)
}

const SENTENCE_GRAMMAR: &str = "\
<Sentence> -> <Noun phrase> <Verb phrase> | <Sentence> <Prep phrase>
<Sentence> -> <Sentence> \"and\" <Sentence>
<Noun phrase> -> \"noun\" | \"det\" \"noun\" | <Noun phrase> <Prep phrase> | <Noun phrase> \"and\" <Noun phrase>
<Verb phrase> -> \"verb\" <Noun phrase> | \"verb\" <Sentence>
<Prep phrase> -> \"prep\" <Noun phrase>
";

#[test]
fn test_extended_form() {
    let grammar = parse_extended(SENTENCE_GRAMMAR).unwrap();

    let s = nt("Sentence");
    let np = nt("Noun phrase");
    let vp = nt("Verb phrase");
    let pp = nt("Prep phrase");
    let and = t("and");
    let det = t("det");
    let noun = t("noun");
    let prep = t("prep");
    let verb = t("verb");

    let expected = vec![
        Production::new(s.clone(), vec![np.clone(), vp.clone()]),
        Production::new(s.clone(), vec![s.clone(), pp.clone()]),
        Production::new(s.clone(), vec![s.clone(), and.clone(), s.clone()]),
        Production::new(np.clone(), vec![noun.clone()]),
        Production::new(np.clone(), vec![det.clone(), noun.clone()]),
        Production::new(np.clone(), vec![np.clone(), pp.clone()]),
        Production::new(np.clone(), vec![np.clone(), and.clone(), np.clone()]),
        Production::new(vp.clone(), vec![verb.clone(), np.clone()]),
        Production::new(vp.clone(), vec![verb.clone(), s.clone()]),
        Production::new(pp.clone(), vec![prep.clone(), np.clone()]),
    ];
    assert_eq!(grammar.productions(), &expected[..]);
    assert_eq!(*grammar.start(), s);
}

#[test]
fn test_extended_form_epsilon() {
    let grammar = parse_extended("<Sentence> -> ").unwrap();
    assert_eq!(
        grammar.productions(),
        &[Production::new(nt("Sentence"), vec![])]
    );

    let grammar = parse_extended("<Sentence> -> <Noun phrase> |").unwrap();
    assert_eq!(
        grammar.productions(),
        &[
            Production::new(nt("Sentence"), vec![nt("Noun phrase")]),
            Production::new(nt("Sentence"), vec![]),
        ]
    );
}

#[test]
fn test_extended_form_blank_lines() {
    let grammar = parse_extended("\n\n<A> -> \"x\"\n\n<B> -> \"y\"\n\n").unwrap();
    assert_eq!(grammar.productions().len(), 2);
    assert_eq!(*grammar.start(), nt("A"));
}

#[test]
fn test_extended_form_errors() {
    assert!(parse_extended("").is_err());
    assert!(parse_extended("foobar").is_err());
    assert!(parse_extended("<sentence> := <noun phrase>").is_err());
    assert!(parse_extended("<sentence> <noun phrase> <verb phrase>").is_err());
    assert!(parse_extended("-> <noun phrase>").is_err());
    assert!(parse_extended("<sentence> <noun phrase> -> <verb phrase>").is_err());
    assert!(parse_extended("<sentence> -> <noun phrase> -> <verb phrase>").is_err());
    assert!(parse_extended("<sentence> | <noun phrase>").is_err());
    assert!(parse_extended("<unterminated").is_err());
    assert!(parse_extended("<a> -> \"unterminated").is_err());
}

#[test]
fn test_parse_cfg_dispatch() {
    // Extended syntax when brackets or quotes are present.
    let extended = parse_cfg(SENTENCE_GRAMMAR).unwrap();
    assert_eq!(extended.productions().len(), 10);

    // Short form otherwise.
    let short_text = "S -> S+S | S*S | x";
    let short = parse_cfg(short_text).unwrap();
    let direct: ContextFreeGrammar = short_text.parse().unwrap();
    assert_eq!(short.productions(), direct.productions());

    assert!(parse_cfg("foobar").is_err());
    assert!(parse_cfg("a -> b").is_err());
    assert!(parse_cfg("\"the\" -> <det>").is_err());
}
