//! A reusable framework for writing recursive-descent parsers with
//! backtracking over a single input string.
//!
//! Grammars implement [`Grammar`] and drive a [`Parser`] through its token
//! readers (`expect`, `token_int`, `token_string`, ...) and combinators
//! (`maybe`, `any_of`, `list_of`, `scope_of`, `commit`), then hand it to one
//! of `Parser::from_string`/`from_file`/`from_handle`/`from_reader`.

pub mod parser;

pub use parser::{
    Binmode, FatalError, FileOptions, Grammar, Number, ParseFailure, ParseResult, Parser,
    ParserConfig, ParserError, PatternOverrides,
};
