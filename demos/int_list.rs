//! `[ 1, 2, 3 ]`-style integer lists. Grounded on the `list_of` scenario: a
//! comma-separated run of integers inside a bracket scope.

use mgc_parser::{Grammar, Parser};

pub struct IntListGrammar;

impl Grammar for IntListGrammar {
    type Output = Vec<i64>;

    fn parse(&self, p: &mut Parser) -> mgc_parser::ParseResult<Self::Output> {
        p.scope_of(Some("["), "]", |p| p.list_of(",", |p| p.token_int()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgc_parser::ParserConfig;

    #[test]
    fn parses_a_bracketed_list() {
        let result = Parser::from_string(&IntListGrammar, "[ 1, 2, 3 ]", ParserConfig::default());
        assert_eq!(result.unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn parses_an_empty_list() {
        let result = Parser::from_string(&IntListGrammar, "[]", ParserConfig::default());
        assert_eq!(result.unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn rejects_trailing_garbage() {
        let result = Parser::from_string(&IntListGrammar, "[1, 2] oops", ParserConfig::default());
        assert!(result.is_err());
    }
}
