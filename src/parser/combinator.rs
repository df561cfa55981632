// --- Backtracking combinators ---
// Every combinator in this file follows the same push-frame / try-body /
// pop-frame discipline:
//   1. Snapshot the cursor (`self.pos()`) before invoking the body, so a
//      failed attempt can be rewound exactly to where it started.
//   2. Push a fresh `CommitStack` frame (initially uncommitted) so that if
//      the body calls `commit()`, *this* invocation is the one whose flag
//      gets set — not some enclosing frame further up the call tree.
//   3. Run the body.
//   4. Pop the frame unconditionally — on success, on a recoverable failure,
//      and on a fatal failure alike — so the stack never grows unbounded
//      across backtracking. This is what §5's "released on every exit path"
//      guarantee looks like without a `Drop`-based guard (see DESIGN.md for
//      why there's no guard type here).
//   5. Only then decide what to do with the result: a success is returned
//      as-is; a *recoverable* failure in an *uncommitted* frame triggers a
//      cursor restore and a backtrack; anything else (a committed
//      recoverable failure, or a fatal error) propagates unchanged.
// `ParserError::as_recoverable()` is the single place that decides "is this
// candidate for backtracking at all" — every combinator below defers to it
// rather than re-deriving the distinction itself.

use regex::Regex;

use super::{ParseResult, Parser, ParserError};

impl Parser {
    /// Tries `f` as a single speculative attempt. On success, returns its
    /// value wrapped in `Some`. On a recoverable failure with `f`'s own
    /// frame left uncommitted, restores the cursor to where `maybe` was
    /// called and returns `None` — the caller sees a clean "didn't match",
    /// not an error. A *committed* recoverable failure, or any fatal error,
    /// propagates out of `maybe` unchanged; commit's whole purpose is to
    /// make exactly this case stop being backtrackable.
    pub fn maybe<F, T>(&mut self, f: F) -> ParseResult<Option<T>>
    where
        F: FnOnce(&mut Parser) -> ParseResult<T>,
    {
        let snapshot = self.pos();
        self.commits.push_frame();
        let result = f(self);
        // Pop before inspecting `result`: the frame must come off the stack
        // on every exit path, including the one where `err` gets returned
        // as-is a few lines down.
        let committed = self.commits.pop_frame();
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.as_recoverable().is_some() && !committed => {
                self.set_pos(snapshot);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Tries each alternative in `alternatives`, in order, backtracking
    /// between them exactly like `maybe` does around a single attempt:
    /// snapshot, push a frame, run, pop, and on an uncommitted recoverable
    /// failure restore the cursor and move on to the next alternative
    /// instead of giving up. Returns the first alternative's value that
    /// succeeds. If every alternative is tried and none succeeds, fails with
    /// `"Found nothing parseable"` reported at `origin` — the cursor
    /// position this call started from, not wherever the last failed
    /// alternative left it (which would be `origin` again after the
    /// restore, but it's captured up front rather than relying on that).
    pub fn any_of<T>(
        &mut self,
        alternatives: &mut [&mut dyn FnMut(&mut Parser) -> ParseResult<T>],
    ) -> ParseResult<T> {
        let origin = self.pos();
        for alt in alternatives.iter_mut() {
            let snapshot = self.pos();
            self.commits.push_frame();
            let result = alt(self);
            let committed = self.commits.pop_frame();
            match result {
                Ok(value) => return Ok(value),
                Err(err) if err.as_recoverable().is_some() && !committed => {
                    self.set_pos(snapshot);
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
        self.fail_from(origin, "Found nothing parseable")
    }

    /// Repeats `body`, consuming a `sep` literal between successive items,
    /// until one of three things happens: `at_eos()` is true before an
    /// attempt even starts (end-of-text, or the innermost `scope_of`'s
    /// closer); a body attempt fails recoverably in an uncommitted frame
    /// (the cursor is restored to before that attempt and the loop stops,
    /// keeping everything accumulated so far); or a body attempt fails in a
    /// way that isn't backtrackable, which propagates immediately. The
    /// returned list may be empty — an empty input (or one that is
    /// immediately at end-of-scope) is a valid zero-item list, not a
    /// failure.
    pub fn list_of<F, T>(&mut self, sep: &str, mut body: F) -> ParseResult<Vec<T>>
    where
        F: FnMut(&mut Parser) -> ParseResult<T>,
    {
        let mut items = Vec::new();
        loop {
            if self.at_eos() {
                break;
            }
            let snapshot = self.pos();
            self.commits.push_frame();
            let result = body(self);
            let committed = self.commits.pop_frame();
            match result {
                Ok(value) => {
                    items.push(value);
                    self.skip_ws();
                    // `sep` is consumed with a plain literal match, the same
                    // way `expect` does it, rather than opening another
                    // backtrack frame: failing to find the separator isn't a
                    // parse error, it's simply "no more items" — the list
                    // ends here.
                    //
                    // An empty separator always matches at this point (zero
                    // width), which is exactly how `sequence_of` reuses this
                    // loop: with `sep == ""` the only way to stop is
                    // `at_eos` or a body failure, never a missing separator.
                    if !self.buffer.consume_literal(sep) {
                        break;
                    }
                }
                Err(err) if err.as_recoverable().is_some() && !committed => {
                    self.set_pos(snapshot);
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(items)
    }

    /// `list_of("", body)` — a bare run of `body` with no separator between
    /// items. Termination happens solely via `at_eos`/a body failure, as the
    /// comment on `list_of`'s separator check explains, since an empty
    /// separator can never fail to match.
    pub fn sequence_of<F, T>(&mut self, body: F) -> ParseResult<Vec<T>>
    where
        F: FnMut(&mut Parser) -> ParseResult<T>,
    {
        self.list_of("", body)
    }

    /// Delimits a scope: consumes `start` first if one is given (a `scope_of`
    /// with no opener models a construct whose start was already consumed by
    /// the caller, e.g. a top-level "rest of the file" scope), compiles
    /// `stop` into an anchored regex and pushes it onto the scope stack for
    /// the duration of `body`, then consumes `stop` itself once `body`
    /// returns successfully. While the scope is open, `at_eos()` becomes
    /// true the moment the cursor reaches `stop` — even though there may be
    /// plenty of input left after it — which is exactly what lets an inner
    /// `list_of`/`sequence_of` stop cleanly at a closing bracket instead of
    /// running past it into whatever comes next in the outer scope.
    ///
    /// The scope entry is popped on *every* return path out of `body` —
    /// success or a propagating failure alike — via the `result?` placed
    /// after the pop rather than before it; if the pop happened only on the
    /// success path, a failing `body` would leak a scope entry and corrupt
    /// `at_eos` for everything enclosing this call for the rest of the
    /// parse.
    pub fn scope_of<F, T>(&mut self, start: Option<&str>, stop: &str, body: F) -> ParseResult<T>
    where
        F: FnOnce(&mut Parser) -> ParseResult<T>,
    {
        if let Some(start) = start {
            self.expect(start)?;
        }
        let stop_re = Regex::new(&format!(r"\A{}", regex::escape(stop))).expect("scope closer must compile");
        self.scopes.push(stop_re);
        let result = body(self);
        self.scopes.pop();
        let value = result?;
        self.expect(stop)?;
        Ok(value)
    }

    /// Sets the innermost active commit frame's flag, turning any subsequent
    /// recoverable failure raised inside that frame into one that propagates
    /// past its enclosing `maybe`/`any_of`/`list_of` instead of triggering a
    /// backtrack there. This is how a grammar says "past this point, a
    /// failure means the input is malformed, not that I guessed the wrong
    /// alternative" — see the `(456)` scenario in the test module below,
    /// where committing right after the open paren is what stops `any_of`
    /// from silently falling back to the bare-integer alternative on a
    /// malformed call form. Fails fatally (never a recoverable failure
    /// itself) if there is no active frame to commit — calling `commit()`
    /// outside any backtrackable combinator is a grammar bug, not something
    /// a caller could sensibly backtrack out of.
    pub fn commit(&mut self) -> ParseResult<()> {
        match self.commits.commit_innermost() {
            Some(()) => Ok(()),
            None => Err(ParserError::Fatal(super::FatalError::CommitWithoutFrame)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParserConfig, PatternOverrides};

    fn parser(text: &str) -> Parser {
        Parser::seated(text.to_string(), ParserConfig::default(), PatternOverrides::default())
    }

    #[test]
    fn list_of_collects_separated_integers() {
        assert_eq!(parser("123").list_of(",", |p| p.token_int()).unwrap(), vec![123]);
        assert_eq!(parser("4,5,6").list_of(",", |p| p.token_int()).unwrap(), vec![4, 5, 6]);
        assert_eq!(parser("7, 8").list_of(",", |p| p.token_int()).unwrap(), vec![7, 8]);
        assert_eq!(parser("").list_of(",", |p| p.token_int()).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn sequence_of_matches_list_of_with_empty_separator() {
        let a = parser("1 2 3").sequence_of(|p| p.token_int()).unwrap();
        let b = parser("1 2 3").list_of("", |p| p.token_int()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn maybe_restores_cursor_on_failure() {
        let mut p = parser("hello");
        let before = p.pos();
        let result = p.maybe(|p| p.token_int()).unwrap();
        assert!(result.is_none());
        assert_eq!(p.pos(), before);
    }

    #[test]
    fn commit_prevents_fallback_in_any_of() {
        let mut p = parser("(456)");
        let result: ParseResult<i64> = p.any_of(&mut [
            &mut |p: &mut Parser| p.token_int(),
            &mut |p: &mut Parser| {
                p.scope_of(Some("("), ")", |p| {
                    p.commit()?;
                    p.token_string().map(|_| 0)
                })
            },
        ]);
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected string delimiter on line 1 at:\n(456)\n ^\n"
        );
    }

    #[test]
    fn scope_of_closes_and_restores_level() {
        let mut p = parser("(\"hi\")");
        assert_eq!(p.scope_level(), 0);
        let value = p
            .scope_of(Some("("), ")", |p| p.token_string())
            .unwrap();
        assert_eq!(value, "hi");
        assert_eq!(p.scope_level(), 0);
        assert!(p.at_eos());
    }
}
