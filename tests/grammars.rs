//! Integration tests driving whole grammars through the public
//! `Parser::from_string` entry point, covering the scenarios that need more
//! than one token reader or combinator in play.

use indoc::indoc;
use lazy_static::lazy_static;
use regex::Regex;
use rstest::rstest;

use mgc_parser::{Grammar, ParseResult, Parser, ParserConfig};

lazy_static! {
    static ref WORLD: Regex = Regex::new(r"\Aworld").unwrap();
}

struct HelloWorld;

impl Grammar for HelloWorld {
    type Output = (String, String);

    fn parse(&self, p: &mut Parser) -> ParseResult<Self::Output> {
        let hello = p.expect("hello")?;
        let (world, _) = p.expect_re(&WORLD)?;
        Ok((hello, world))
    }
}

#[rstest]
#[case("hello world")]
#[case("  hello world  ")]
fn expect_pair_tolerates_surrounding_whitespace(#[case] input: &str) {
    let (hello, world) = Parser::from_string(&HelloWorld, input, ParserConfig::default()).unwrap();
    assert_eq!(hello, "hello");
    assert_eq!(world, "world");
}

#[test]
fn expect_pair_reports_mismatch_at_the_unskipped_cursor() {
    let err = Parser::from_string(&HelloWorld, "goodbye world", ParserConfig::default()).unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.starts_with("Expected \"hello\" on line 1 at:\ngoodbye world\n^\n"));
}

struct Locations {
    before: (usize, usize, String),
    after_hello: (usize, usize, String),
    after_world: (usize, usize, String),
}

struct LocationGrammar;

impl Grammar for LocationGrammar {
    type Output = Locations;

    fn parse(&self, p: &mut Parser) -> ParseResult<Self::Output> {
        let before = p.location();
        p.expect("hello")?;
        let after_hello = p.location();
        p.expect_re(&WORLD)?;
        let after_world = p.location();
        Ok(Locations { before, after_hello, after_world })
    }
}

#[test]
fn where_reporting_tracks_line_and_column_through_a_grammar() {
    let locs = Parser::from_string(&LocationGrammar, "hello world", ParserConfig::default()).unwrap();
    assert_eq!(locs.before, (1, 0, "hello world".to_string()));
    assert_eq!(locs.after_hello, (1, 5, "hello world".to_string()));
    assert_eq!(locs.after_world, (1, 11, "hello world".to_string()));
}

#[test]
fn where_reporting_tracks_across_a_line_break() {
    let locs = Parser::from_string(&LocationGrammar, "hello\nworld", ParserConfig::default()).unwrap();
    assert_eq!(locs.before, (1, 0, "hello".to_string()));
    assert_eq!(locs.after_hello, (1, 5, "hello".to_string()));
    assert_eq!(locs.after_world, (2, 5, "world".to_string()));
}

struct CommittedCall;

impl Grammar for CommittedCall {
    type Output = i64;

    fn parse(&self, p: &mut Parser) -> ParseResult<Self::Output> {
        p.any_of(&mut [
            &mut |p: &mut Parser| p.token_int(),
            &mut |p: &mut Parser| {
                p.scope_of(Some("("), ")", |p| {
                    p.commit()?;
                    p.token_string().map(|_| 0)
                })
            },
        ])
    }
}

#[test]
fn scope_commit_scenario_end_to_end() {
    assert_eq!(Parser::from_string(&CommittedCall, "123", ParserConfig::default()).unwrap(), 123);
    assert_eq!(
        Parser::from_string(&CommittedCall, "(\"hi\")", ParserConfig::default()).unwrap(),
        0
    );
    let err = Parser::from_string(&CommittedCall, "(456)", ParserConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "Expected string delimiter on line 1 at:\n(456)\n ^\n");
}

struct MaybeThenRequire {
    positions: std::cell::RefCell<Vec<usize>>,
}

impl Grammar for MaybeThenRequire {
    type Output = ();

    fn parse(&self, p: &mut Parser) -> ParseResult<Self::Output> {
        self.positions.borrow_mut().push(p.pos());
        let speculative = p.maybe(|p| p.expect("nonexistent"))?;
        assert!(speculative.is_none());
        self.positions.borrow_mut().push(p.pos());
        p.expect("hello")?;
        Ok(())
    }
}

struct CommaSeparatedInts;

impl Grammar for CommaSeparatedInts {
    type Output = Vec<i64>;

    fn parse(&self, p: &mut Parser) -> ParseResult<Self::Output> {
        p.list_of(",", |p| p.token_int())
    }
}

#[test]
fn list_of_tolerates_a_multi_line_fixture() {
    let input = indoc! {"
        1,
        2,
        3
    "};
    let result = Parser::from_string(&CommaSeparatedInts, input, ParserConfig::default());
    assert_eq!(result.unwrap(), vec![1, 2, 3]);
}

#[test]
fn maybe_restores_the_cursor_on_an_uncommitted_mismatch() {
    let grammar = MaybeThenRequire { positions: std::cell::RefCell::new(Vec::new()) };
    Parser::from_string(&grammar, "hello", ParserConfig::default()).unwrap();
    let positions = grammar.positions.into_inner();
    assert_eq!(positions[0], positions[1]);
}
