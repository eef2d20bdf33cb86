//! The command-line driver.

use crate::cnf::chomsky_normal_form;
use crate::error::Result;
use crate::first_follow::{FirstSets, FollowSets};
use crate::grammar::ContextFreeGrammar;
use crate::reader::parse_cfg;
use crate::slr::{augmented, Automaton};
use crate::symbol::Symbol;
use crate::table::ParsingTable;
use std::fs;
use std::io::{self, Read, Write};
use std::process;

const USAGE: &str = "\
Usage: cfg_analyzer (-g|-n|-a|-f|-t|-r) [input] [-o <output>]

    A context-free grammar analyzer.

    input      The input file. If omitted, input is read from stdin. The
               grammar may be in either the short or the extended syntax.

    -o output  The output file. If omitted, output is written to stdout.

    Operations:
    -g         Display the grammar.
    -n         Convert the grammar to Chomsky normal form.
    -a         Compute the augmented grammar.
    -f         Compute the first and follow sets.
    -t         Compute the SLR(1) parse table.
    -r         Generate a report with the augmented grammar, first and
               follow sets, and parse table.

    --help     Display this help message.
";

#[derive(Clone, Copy, PartialEq)]
enum Operation {
    Grammar,
    Cnf,
    Augment,
    FirstFollow,
    Table,
    Report,
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", USAGE);
    eprintln!("Error: {}", message);
    process::exit(2);
}

/// Runs the analyzer with the process arguments.
pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut operation = None;
    let mut input_path = None;
    let mut output_path = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-g" | "-n" | "-a" | "-f" | "-t" | "-r" => {
                if operation.is_some() {
                    usage_error("conflicting operations");
                }
                operation = Some(match arg.as_str() {
                    "-g" => Operation::Grammar,
                    "-n" => Operation::Cnf,
                    "-a" => Operation::Augment,
                    "-f" => Operation::FirstFollow,
                    "-t" => Operation::Table,
                    _ => Operation::Report,
                });
            }
            "-o" => match args.next() {
                Some(path) => output_path = Some(path),
                None => usage_error("-o flag missing file name"),
            },
            other if other.starts_with('-') => {
                usage_error(&format!("flag {:?} not recognized", other));
            }
            other => {
                if input_path.is_some() {
                    usage_error(&format!("unrecognized argument {:?}", other));
                }
                input_path = Some(other.to_string());
            }
        }
    }
    let Some(operation) = operation else {
        usage_error("missing operation");
    };

    let text = match &input_path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let grammar = parse_cfg(&text)?;
    let output = execute(operation, &grammar)?;

    match &output_path {
        Some(path) => fs::write(path, output)?,
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn execute(operation: Operation, grammar: &ContextFreeGrammar) -> Result<String> {
    match operation {
        Operation::Grammar => Ok(grammar.to_string()),
        Operation::Cnf => Ok(chomsky_normal_form(grammar)?.to_string()),
        Operation::Augment => Ok(augmented(grammar)?.to_string()),
        Operation::FirstFollow => first_follow_report(grammar),
        Operation::Table => Ok(format!("{}\n", ParsingTable::new(grammar)?)),
        Operation::Report => {
            let table = ParsingTable::new(grammar)?;
            Ok(format!(
                "Augmented grammar:\n{}\n{}\nParse table:\n{}\n",
                table.augmented_grammar(),
                first_follow_report(grammar)?,
                table
            ))
        }
    }
}

fn first_follow_report(grammar: &ContextFreeGrammar) -> Result<String> {
    let automaton = Automaton::new(grammar)?;
    let grammar = automaton.augmented_grammar();
    let first = FirstSets::compute(grammar);
    let follow = FollowSets::compute(grammar, &first);

    let mut nonterminals: Vec<&Symbol> = grammar.nonterminals().iter().collect();
    nonterminals.sort();

    let render = |set: Option<&std::collections::HashSet<Symbol>>, nullable: bool| -> String {
        let mut names: Vec<String> = set
            .map(|s| s.iter().map(|t| t.to_string()).collect())
            .unwrap_or_default();
        names.sort();
        if nullable {
            names.push("ε".to_string());
        }
        format!("{{ {} }}", names.join(", "))
    };

    let mut out = String::from("First sets:\n");
    for &a in &nonterminals {
        out.push_str(&format!(
            "  FIRST({}) = {}\n",
            a,
            render(first.terminals(a), first.nullable(a))
        ));
    }
    out.push_str("Follow sets:\n");
    for &a in &nonterminals {
        out.push_str(&format!(
            "  FOLLOW({}) = {}\n",
            a,
            render(follow.terminals(a), false)
        ));
    }
    Ok(out)
}
