// --- Token readers ---
// This module holds every *atomic* token reader: the primitives a grammar
// composes to recognise one lexical unit at the cursor. Every reader here
// follows the same three-step shape the rest of the file repeats over and
// over, so it's worth spelling out once:
//   1. Call `skip_ws()` to eat any whitespace/comments sitting before the
//      token. This is also the only place the streaming reader can pull in
//      more input (see `Parser::skip_ws` in `mod.rs`).
//   2. Call `at_eos()`. If it's true, the cursor is at end-of-text or at the
//      closer of the innermost open `scope_of` — either way there is no
//      token here, so fail immediately with a reader-specific message rather
//      than letting the regex attempt run (and potentially match across a
//      scope boundary it shouldn't see past).
//   3. Try the reader's regex (or, for a plain literal, a `starts_with`
//      check) anchored at the cursor. A match advances the cursor past it
//      and returns the semantic value; a non-match fails, leaving the cursor
//      untouched — this is the atomicity invariant every combinator in
//      `combinator.rs` relies on.

use regex::Regex;

use super::{ParseResult, Parser};

/// The value `token_number` returns. `token_number` tries `token_float`
/// first and only falls back to `token_int` on a float mismatch, so `Float`
/// wins whenever the matched text has a decimal point or an exponent; a bare
/// run of digits comes back as `Int`. See `token_number` below for the
/// precedence logic itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Decodes one backslash escape from `chars`, which must be positioned
/// immediately *after* the leading `\` (the caller already consumed it so it
/// can account for the `\` itself in the cursor advance separately).
/// Recognised forms: `\a \b \e \f \n \r \t` (single-letter C-style escapes),
/// `\0`/`\NNN` octal (1-3 octal digits, handled by `decode_octal_escape`),
/// and `\xNN`/`\x{N...}` hex (handled by `decode_hex_escape`). `\v` and
/// `\c...` are deliberately not special-cased. Anything else — including a
/// digit outside `0..=7` like `\8` or `\9`, which looks numeric but isn't a
/// valid octal digit — falls through to the catch-all `Some(other) => other`
/// arm and decodes to that literal character, per the "any other `\X` yields
/// the literal `X`" rule `token_string` documents below.
fn decode_escape(chars: &mut std::iter::Peekable<std::str::Chars>) -> char {
    match chars.next() {
        Some('a') => '\x07',
        Some('b') => '\x08',
        Some('e') => '\x1b',
        Some('f') => '\x0c',
        Some('n') => '\n',
        Some('r') => '\r',
        Some('t') => '\t',
        Some('x') => decode_hex_escape(chars),
        // Only 0-7 are octal digits. `is_ascii_digit()` would also accept 8
        // and 9, which would then fail `from_str_radix(_, 8)` below and mask
        // the literal-passthrough behaviour `\8`/`\9` are supposed to get.
        Some(c) if ('0'..='7').contains(&c) => decode_octal_escape(c, chars),
        Some(other) => other,
        None => '\0',
    }
}

/// Decodes a `\xNN` (exactly two hex digits) or `\x{N...}` (braced, any
/// number of hex digits up to the closing `}`) escape. `chars` is positioned
/// just after the `x`. An empty or malformed digit run decodes to the
/// Unicode replacement character rather than failing the whole token — a
/// grammar that cares about malformed escapes can always re-derive the
/// string and check it itself; the reader's job is just to decode.
fn decode_hex_escape(chars: &mut std::iter::Peekable<std::str::Chars>) -> char {
    let mut digits = String::new();
    if chars.peek() == Some(&'{') {
        // Braced form: consume the `{`, then every character up to (and
        // including) the matching `}`, whatever its length.
        chars.next();
        while let Some(&c) = chars.peek() {
            if c == '}' {
                chars.next();
                break;
            }
            digits.push(c);
            chars.next();
        }
    } else {
        // Unbraced form: at most two hex digits, stopping early if a
        // non-hex-digit character is seen.
        for _ in 0..2 {
            match chars.peek() {
                Some(&c) if c.is_ascii_hexdigit() => {
                    digits.push(c);
                    chars.next();
                }
                _ => break,
            }
        }
    }
    u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32).unwrap_or('\u{FFFD}')
}

/// Decodes a `\NNN` octal escape (1-3 octal digits total, `first` being the
/// one `decode_escape` already consumed to decide this was an octal escape
/// rather than something else).
fn decode_octal_escape(first: char, chars: &mut std::iter::Peekable<std::str::Chars>) -> char {
    let mut digits = String::new();
    digits.push(first);
    for _ in 0..2 {
        match chars.peek() {
            Some(&c) if ('0'..='7').contains(&c) => {
                digits.push(c);
                chars.next();
            }
            _ => break,
        }
    }
    u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32).unwrap_or('\u{FFFD}')
}

impl Parser {
    // --- expect / expect_re: the two base "match this exact thing" readers ---

    /// Matches `literal` exactly at the cursor (after skipping whitespace),
    /// consuming it and returning it.
    ///
    /// This could be written as "regex-escape `literal` and run it through
    /// `expect_re`" — and that's the contract it has to honour — but it's
    /// implemented as a direct `str::starts_with` check instead. Grammars
    /// call `expect` for every keyword and punctuation mark in the source,
    /// so this is the hottest path in the whole framework; skipping the
    /// regex compile-and-match machinery for a literal that doesn't need it
    /// is worth the special case.
    pub fn expect(&mut self, literal: &str) -> ParseResult<String> {
        self.skip_ws();
        // `at_eos` already called `skip_ws` once above as part of its own
        // contract; that's fine, the second call is a no-op (see the
        // Skipper-idempotence note on `Parser::skip_ws`).
        if self.at_eos() {
            return self.fail(format!("Expected {literal:?}"));
        }
        if self.buffer.consume_literal(literal) {
            Ok(literal.to_string())
        } else {
            // Mismatch: `consume_literal` didn't touch the cursor, so this
            // reader is still atomic on the failure path.
            self.fail(format!("Expected {literal:?}"))
        }
    }

    /// Matches an arbitrary `\A`-anchored regex at the cursor, returning the
    /// full matched text plus any parenthesised capture groups in input
    /// order (capture group 0, the whole match, is not included separately —
    /// it's already the first return value).
    pub fn expect_re(&mut self, re: &Regex) -> ParseResult<(String, Vec<Option<String>>)> {
        self.skip_ws();
        if self.at_eos() {
            return self.fail(format!("Expected {re}"));
        }
        match self.buffer.match_at(re) {
            Some(hit) => Ok(hit),
            None => self.fail(format!("Expected {re}")),
        }
    }

    // --- maybe_expect / maybe_expect_re: non-backtracking variants ---

    /// `expect(literal)`, but never a recoverable failure: returns `None`
    /// and restores the cursor on non-match instead of raising. In value and
    /// in cursor effect this is equivalent to `p.maybe(|p| p.expect(literal))`
    /// for every `literal` — but it does its own snapshot/restore here
    /// rather than opening a `CommitStack` frame through `maybe`, because a
    /// plain literal mismatch is never something a grammar could sensibly
    /// `commit()` against; there's no frame worth paying for.
    pub fn maybe_expect(&mut self, literal: &str) -> Option<String> {
        let origin = self.pos();
        match self.expect(literal) {
            Ok(v) => Some(v),
            Err(_) => {
                self.set_pos(origin);
                None
            }
        }
    }

    /// `expect_re`, but never a recoverable failure — see `maybe_expect`.
    pub fn maybe_expect_re(&mut self, re: &Regex) -> Option<(String, Vec<Option<String>>)> {
        let origin = self.pos();
        match self.expect_re(re) {
            Ok(v) => Some(v),
            Err(_) => {
                self.set_pos(origin);
                None
            }
        }
    }

    /// Does not skip whitespace — this reader is for consuming raw source
    /// text verbatim (e.g. the body of a heredoc), where leading whitespace
    /// is meaningful content, not filler to discard. Consumes and returns
    /// the maximal prefix up to (not including) whichever comes first: the
    /// next occurrence of `pattern`, the current scope's closer, or
    /// end-of-text. An empty result is not a failure — "nothing before the
    /// boundary" is a perfectly good answer.
    pub fn substring_before(&mut self, pattern: &Regex) -> ParseResult<String> {
        let text = self.buffer.remaining();
        let mut end = text.len();
        if let Some(m) = pattern.find(text) {
            end = end.min(m.start());
        }
        // The scope closer is a second, independent boundary candidate: even
        // if `pattern` never matches, stop at the enclosing `scope_of`'s
        // closer rather than reading straight through it.
        if let Some(stop) = self.scopes.current() {
            if let Some(m) = stop.find(text) {
                end = end.min(m.start());
            }
        }
        let taken = text[..end].to_string();
        self.buffer.advance_bytes(end);
        Ok(taken)
    }

    // --- the numeric and string/identifier token readers ---

    /// A signed integer literal: `0x…`/`0X…` hex, a leading-zero literal
    /// longer than one digit read as octal (`0o…`/`0O…` too, if
    /// `accept_0o_oct` was set on construction), decimal otherwise. The sign
    /// and base-prefix parsing itself lives in `parse_int_literal` below;
    /// this method is just skip-fail-match-convert, like every other reader
    /// here.
    pub fn token_int(&mut self) -> ParseResult<i64> {
        self.skip_ws();
        if self.at_eos() {
            return self.fail("Expected integer");
        }
        // `origin` is captured before the match so an out-of-range literal
        // (one that matched the regex but overflows `i64`) can still report
        // the position where the *token* started, not wherever the cursor
        // ends up — `fail_from` needs an explicit, pre-match position for
        // exactly this case.
        let origin = self.pos();
        let int_re = self.patterns.int.clone();
        let (matched, _) = match self.buffer.match_at(&int_re) {
            Some(hit) => hit,
            None => return self.fail("Expected integer"),
        };
        match parse_int_literal(&matched) {
            Some(value) => Ok(value),
            None => self.fail_from(origin, format!("Integer literal {matched:?} out of range")),
        }
    }

    /// A float literal: `-?(\d*\.\d+|\d+\.)(e-?\d+)?` or `-?\d+e-?\d+`,
    /// case-insensitive (so `1E5` and `1e5` both match). The regex already
    /// guarantees a parseable shape, so the only way `"...".parse::<f64>()`
    /// can fail here is a pathological pattern override; that's reported as
    /// a recoverable failure rather than a panic so a misbehaving override
    /// doesn't crash grammars that never hit it.
    pub fn token_float(&mut self) -> ParseResult<f64> {
        self.skip_ws();
        if self.at_eos() {
            return self.fail("Expected float");
        }
        let float_re = self.patterns.float.clone();
        let (matched, _) = match self.buffer.match_at(&float_re) {
            Some(hit) => hit,
            None => return self.fail("Expected float"),
        };
        matched
            .parse::<f64>()
            .map_err(|_| self.make_failure(format!("Malformed float literal {matched:?}")).into())
    }

    /// Tries `token_float` first, falling back to `token_int` on a float
    /// mismatch — this ordering, not the reverse, is what gives float
    /// precedence whenever the input has a decimal point or an exponent:
    /// `token_int`'s pattern would otherwise happily match just the leading
    /// digits of `"3.14"` and leave `.14` dangling for whatever reads next.
    /// The `maybe` wrapper is what makes the float attempt backtrackable —
    /// a plain `?` here would let a float mismatch propagate as a hard
    /// failure instead of falling through to the int attempt.
    pub fn token_number(&mut self) -> ParseResult<Number> {
        if let Some(value) = self.maybe(|p| p.token_float())? {
            return Ok(Number::Float(value));
        }
        self.token_int().map(Number::Int)
    }

    /// A quoted string, opened and closed by whichever `string_delim`
    /// character matched (so `'single'` and `"double"` both work against the
    /// default pattern, and either may contain the other unescaped, as in
    /// `"foo 'bar'"`). `\`-style escapes inside the body are decoded as they
    /// are read, character by character, rather than matched with one big
    /// regex and decoded afterward — the body can contain an arbitrary run
    /// of ordinary characters and escapes in any mixture, and a single
    /// non-greedy regex for "everything up to the closing delimiter,
    /// tolerating escaped delimiters" is markedly harder to get right than a
    /// small hand-rolled scan.
    pub fn token_string(&mut self) -> ParseResult<String> {
        self.skip_ws();
        if self.at_eos() {
            return self.fail("Expected string delimiter");
        }
        let delim_re = self.patterns.string_delim.clone();
        let origin = self.pos();
        let (opening, _) = match self.buffer.match_at(&delim_re) {
            Some(hit) => hit,
            None => return self.fail("Expected string delimiter"),
        };
        // Whichever single character the delimiter pattern matched (`'` or
        // `"` by default) is also what must close the string — the pattern
        // is allowed to match either, but once one is chosen the other loses
        // its special meaning inside the body.
        let delimiter = opening.chars().next().expect("string_delim must match at least one character");

        let mut raw = String::new();
        let mut closed = false;
        loop {
            let rest = self.buffer.remaining();
            let mut chars = rest.chars();
            match chars.next() {
                // Ran off the end of the input without seeing the closing
                // delimiter: `closed` stays false and the loop below reports
                // it as an unterminated string.
                None => break,
                Some(c) if c == delimiter => {
                    self.buffer.advance_bytes(c.len_utf8());
                    closed = true;
                    break;
                }
                Some('\\') => {
                    // Re-slice past the backslash into a fresh `Peekable` so
                    // `decode_escape` can look ahead (for `\x{...}`'s
                    // variable-length digit run) without this loop's own
                    // `chars` iterator getting out of sync with it.
                    let consumed_backslash = '\\'.len_utf8();
                    let mut rest_chars = rest[consumed_backslash..].chars().peekable();
                    let before = rest_chars.as_str().len();
                    let decoded = decode_escape(&mut rest_chars);
                    let after = rest_chars.as_str().len();
                    let escape_body_len = before - after;
                    raw.push(decoded);
                    self.buffer.advance_bytes(consumed_backslash + escape_body_len);
                }
                Some(c) => {
                    raw.push(c);
                    self.buffer.advance_bytes(c.len_utf8());
                }
            }
        }
        if !closed {
            // Reported at `origin` (the opening delimiter), not at
            // end-of-text, so the caret points at the string that never
            // closed rather than the end of the file.
            return self.fail_from(origin, "Unterminated string literal");
        }
        Ok(raw)
    }

    /// An identifier matching the `ident` pattern (by default, a letter or
    /// underscore followed by any run of word characters).
    pub fn token_ident(&mut self) -> ParseResult<String> {
        self.skip_ws();
        if self.at_eos() {
            return self.fail("Expected identifier");
        }
        let ident_re = self.patterns.ident.clone();
        match self.buffer.match_at(&ident_re) {
            Some((matched, _)) => Ok(matched),
            None => self.fail("Expected identifier"),
        }
    }

    /// An identifier that must be one of `keywords`. On a successful
    /// `token_ident` that turns out *not* to be a listed keyword, the cursor
    /// is rolled back to before the identifier — so a caller composing
    /// `token_kw` inside `any_of` doesn't have to worry about a rejected
    /// keyword having silently consumed input another alternative needed.
    pub fn token_kw(&mut self, keywords: &[&str]) -> ParseResult<String> {
        let origin = self.pos();
        let ident = self.token_ident()?;
        if keywords.contains(&ident.as_str()) {
            Ok(ident)
        } else {
            self.set_pos(origin);
            self.fail_from(origin, format!("Expected one of {keywords:?}"))
        }
    }

    /// A fully custom token reader for whatever the six named patterns don't
    /// cover: matches `re` anchored at the cursor and applies `convert` to
    /// the matched text to produce the semantic value; `name` is folded into
    /// the failure message the same way every built-in reader's token kind
    /// is ("Expected integer", "Expected identifier", and so on).
    pub fn generic_token<T>(
        &mut self,
        name: &str,
        re: &Regex,
        convert: impl FnOnce(&str) -> T,
    ) -> ParseResult<T> {
        self.skip_ws();
        if self.at_eos() {
            return self.fail(format!("Expected {name}"));
        }
        match self.buffer.match_at(re) {
            Some((matched, _)) => Ok(convert(&matched)),
            None => self.fail(format!("Expected {name}")),
        }
    }
}

/// Interprets a matched `int` literal (already stripped of any sign by the
/// caller — `token_int`'s regex puts the optional `-` outside the group this
/// function sees) according to the prefix-driven base `token_int` documents:
/// `0x…`/`0X…` hex, a leading-zero literal longer than one digit as octal
/// (`0o…`/`0O…` too, if the grammar's `accept_0o_oct` flag folded that
/// alternative into the pattern), decimal otherwise. A single `"0"` is
/// decimal zero, not octal — the `body.len() > 1` guard exists specifically
/// so that case doesn't fall into the octal branch and get parsed (harmlessly,
/// but needlessly) as base 8.
fn parse_int_literal(matched: &str) -> Option<i64> {
    let (negative, body) = match matched.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, matched),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(oct) = body.strip_prefix("0o").or_else(|| body.strip_prefix("0O")) {
        i64::from_str_radix(oct, 8).ok()?
    } else if body.len() > 1 && body.starts_with('0') {
        i64::from_str_radix(body, 8).ok()?
    } else {
        body.parse::<i64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParserConfig, PatternOverrides};

    fn parser(text: &str) -> Parser {
        Parser::seated(text.to_string(), ParserConfig::default(), PatternOverrides::default())
    }

    #[test]
    fn token_int_reads_decimal_hex_and_octal() {
        assert_eq!(parser("123").token_int().unwrap(), 123);
        assert_eq!(parser("0").token_int().unwrap(), 0);
        assert_eq!(parser("0x20").token_int().unwrap(), 32);
        assert_eq!(parser("010").token_int().unwrap(), 8);
        assert_eq!(parser("-4").token_int().unwrap(), -4);
    }

    #[test]
    fn token_int_fails_on_non_digit() {
        let err = parser("hello").token_int().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected integer on line 1 at:\nhello\n^\n"
        );
    }

    #[test]
    fn token_string_decodes_either_delimiter() {
        assert_eq!(parser("'single'").token_string().unwrap(), "single");
        assert_eq!(parser("\"double\"").token_string().unwrap(), "double");
        assert_eq!(parser("\"foo 'bar'\"").token_string().unwrap(), "foo 'bar'");
    }

    #[test]
    fn token_string_respects_restricted_delimiter() {
        let mut overrides = PatternOverrides::default();
        overrides.string_delim = Some(Regex::new(r#"\A""#).unwrap());
        let mut p = Parser::seated("'single'".to_string(), ParserConfig::default(), overrides);
        assert!(p.token_string().is_err());
    }

    #[test]
    fn token_string_decodes_escapes() {
        assert_eq!(parser(r#""a\tb\nc""#).token_string().unwrap(), "a\tb\nc");
        assert_eq!(parser(r#""\x41""#).token_string().unwrap(), "A");
        assert_eq!(parser(r#""\101""#).token_string().unwrap(), "A");
    }

    #[test]
    fn token_string_passes_through_non_octal_digit_escapes_literally() {
        assert_eq!(parser(r#""\8\9""#).token_string().unwrap(), "89");
    }

    #[test]
    fn token_float_reads_leading_trailing_and_exponent_forms() {
        assert_eq!(parser("3.14").token_float().unwrap(), 3.14);
        assert_eq!(parser("3.").token_float().unwrap(), 3.0);
        assert_eq!(parser(".5").token_float().unwrap(), 0.5);
        assert_eq!(parser("1e10").token_float().unwrap(), 1e10);
        assert_eq!(parser("-2.5E-3").token_float().unwrap(), -2.5e-3);
    }

    #[test]
    fn token_number_prefers_float_when_a_point_or_exponent_is_present() {
        assert_eq!(parser("3.14").token_number().unwrap(), Number::Float(3.14));
        assert_eq!(parser("1e3").token_number().unwrap(), Number::Float(1e3));
        assert_eq!(parser("42").token_number().unwrap(), Number::Int(42));
    }

    #[test]
    fn token_kw_accepts_listed_keywords_and_restores_on_mismatch() {
        assert_eq!(parser("let").token_kw(&["let", "fn"]).unwrap(), "let");
        let mut p = parser("other");
        let before = p.pos();
        assert!(p.token_kw(&["let", "fn"]).is_err());
        assert_eq!(p.pos(), before);
    }

    #[test]
    fn generic_token_applies_the_conversion_and_names_the_failure() {
        let re = Regex::new(r"\A[01]+").unwrap();
        let mut p = parser("1010");
        let value = p.generic_token("binary literal", &re, |s| u32::from_str_radix(s, 2).unwrap());
        assert_eq!(value.unwrap(), 10);

        let err = parser("xyz").generic_token("binary literal", &re, |s| s.to_string()).unwrap_err();
        assert!(err.to_string().starts_with("Expected binary literal"));
    }

    #[test]
    fn maybe_expect_matches_maybe_of_expect_on_both_hit_and_miss() {
        let mut hit_a = parser("hello world");
        let mut hit_b = parser("hello world");
        assert_eq!(hit_a.maybe_expect("hello"), hit_b.maybe(|p| p.expect("hello")).unwrap());
        assert_eq!(hit_a.pos(), hit_b.pos());

        let mut miss_a = parser("goodbye");
        let mut miss_b = parser("goodbye");
        let before = miss_a.pos();
        assert_eq!(miss_a.maybe_expect("hello"), miss_b.maybe(|p| p.expect("hello")).unwrap());
        assert_eq!(miss_a.pos(), before);
        assert_eq!(miss_a.pos(), miss_b.pos());
    }
}
