//! Demonstration binary: parses a file argument (or a built-in snippet) with
//! one of the two demo grammars under `demos/`, printing the result as JSON
//! on stdout and any parse failure as plain text on stderr — the same
//! file-or-default-snippet, JSON-on-stdout shape the lexer this crate grew
//! out of used.

#[path = "../demos/int_list.rs"]
mod int_list;
#[path = "../demos/sexpr.rs"]
mod sexpr;

use std::{env, fs, io};

use serde::Serialize;
use serde_json;

use mgc_parser::{Parser, ParserConfig};

#[derive(Serialize)]
#[serde(untagged)]
enum ParserOutput {
    IntList(Vec<i64>),
    Sexpr(sexpr::Expr),
}

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let source = if args.len() > 1 {
        fs::read_to_string(&args[1])?
    } else {
        eprintln!("No source file provided. Using default example input.");
        "(add 1 (mul 2 3))".to_string()
    };

    let looks_like_a_list = source.trim_start().starts_with('[');
    let output = if looks_like_a_list {
        Parser::from_string(&int_list::IntListGrammar, source.clone(), ParserConfig::default())
            .map(ParserOutput::IntList)
    } else {
        Parser::from_string(&sexpr::SexprGrammar, source.clone(), ParserConfig::default())
            .map(ParserOutput::Sexpr)
    };

    match output {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value).expect("demo output always serializes");
            println!("{json}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
