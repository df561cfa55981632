//! A tiny s-expression grammar: `(add 1 (mul 2 3))`. Grounded on the
//! `any_of` + `scope_of` + `commit` scenario — once the opening paren is
//! seen, the call form commits, so a malformed call never falls back to the
//! bare-number alternative.

use serde::Serialize;

use mgc_parser::{Grammar, ParseResult, Parser};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expr {
    Number(i64),
    Call(String, Vec<Expr>),
}

pub struct SexprGrammar;

impl Grammar for SexprGrammar {
    type Output = Expr;

    fn parse(&self, p: &mut Parser) -> ParseResult<Self::Output> {
        expr(p)
    }
}

fn expr(p: &mut Parser) -> ParseResult<Expr> {
    p.any_of(&mut [
        &mut |p: &mut Parser| p.token_int().map(Expr::Number),
        &mut |p: &mut Parser| {
            p.scope_of(Some("("), ")", |p| {
                p.commit()?;
                let name = p.token_ident()?;
                let args = p.sequence_of(expr)?;
                Ok(Expr::Call(name, args))
            })
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgc_parser::ParserConfig;

    #[test]
    fn parses_a_bare_number() {
        let result = Parser::from_string(&SexprGrammar, "42", ParserConfig::default());
        assert_eq!(result.unwrap(), Expr::Number(42));
    }

    #[test]
    fn parses_a_nested_call() {
        let result = Parser::from_string(&SexprGrammar, "(add 1 (mul 2 3))", ParserConfig::default());
        assert_eq!(
            result.unwrap(),
            Expr::Call("add".to_string(), vec![
                Expr::Number(1),
                Expr::Call("mul".to_string(), vec![Expr::Number(2), Expr::Number(3)]),
            ])
        );
    }

    #[test]
    fn commit_blocks_fallback_past_the_open_paren() {
        let result = Parser::from_string(&SexprGrammar, "(add 1 \"oops\")", ParserConfig::default());
        assert!(result.is_err());
    }
}
