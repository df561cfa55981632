// Owns the input text and the cursor. The cursor is a byte offset that is
// always kept on a UTF-8 char boundary (the teacher's `Lexer` does the same:
// `position: usize` indexed straight into `&str`). Only combinators ever
// restore a previously-observed `position()`.

use regex::Regex;

pub struct InputBuffer {
    text: String,
    position: usize,
}

impl InputBuffer {
    pub fn new(text: String) -> Self {
        InputBuffer { text, position: 0 }
    }

    /// The unconsumed suffix of the input, from the cursor onward. Every
    /// matcher below matches against this slice rather than the whole
    /// `text`, so a pattern only ever needs to anchor at its own start
    /// (`\A`), never at an arbitrary offset into the full input.
    pub fn remaining(&self) -> &str {
        &self.text[self.position..]
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Restores the cursor to a value previously returned by `position()`.
    /// Only a combinator's snapshot/restore calls this — token readers only
    /// ever move the cursor forward via `match_at`/`consume_literal`/
    /// `advance_bytes`. The `debug_assert!` exists because a `pos` that
    /// isn't a char boundary would make every subsequent `&self.text[pos..]`
    /// slice panic; in release builds the caller's own contract (never pass
    /// anything but an earlier `position()`) is trusted instead of paying
    /// for the check.
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(self.text.is_char_boundary(pos), "restored position must land on a char boundary");
        self.position = pos;
    }

    pub fn at_end_of_text(&self) -> bool {
        self.position >= self.text.len()
    }

    /// Appends more text without touching the cursor. Only the Skipper calls
    /// this, and only once it has confirmed the cursor is at end-of-text —
    /// appending mid-token would let a regex match span the old and new text
    /// as if there had never been a pause, which is exactly the hazard §2
    /// rules out by restricting streaming reads to whitespace boundaries.
    pub fn append(&mut self, more: &str) {
        self.text.push_str(more);
    }

    /// Attempts `re` anchored (via `\A`) at the cursor. On success, advances
    /// the cursor past the match and returns the full matched text plus any
    /// parenthesised capture groups, in input order. On a non-match, returns
    /// `None` and leaves the cursor untouched — callers rely on this for
    /// atomicity without having to snapshot/restore around every single
    /// `match_at` themselves.
    pub fn match_at(&mut self, re: &Regex) -> Option<(String, Vec<Option<String>>)> {
        let caps = re.captures(self.remaining())?;
        let whole = caps.get(0).expect("capture group 0 always present on a match");
        // Every pattern this buffer is ever handed is `\A`-anchored (the
        // default patterns in `patterns.rs`, and user overrides are expected
        // to follow suit); a match that starts anywhere but position 0 of
        // `remaining()` would mean a caller passed in an unanchored pattern,
        // which is a grammar bug worth catching in debug builds rather than
        // silently skipping ahead.
        debug_assert_eq!(whole.start(), 0, "pattern given to match_at must be \\A-anchored");
        let matched = whole.as_str().to_string();
        let groups = (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
            .collect();
        self.position += whole.end();
        Some((matched, groups))
    }

    /// Same test as `match_at` but never advances the cursor — used by
    /// `at_eos` to check the current scope's closer without consuming it.
    pub fn peek_at(&self, re: &Regex) -> bool {
        re.find(self.remaining()).is_some_and(|m| m.start() == 0)
    }

    /// Consumes exactly `literal` at the cursor without building a regex;
    /// returns whether it matched. This is `expect`'s fast path — a literal
    /// token reader calls this instead of compiling a throwaway
    /// `regex::escape`d pattern for every keyword and punctuation mark a
    /// grammar reads.
    pub fn consume_literal(&mut self, literal: &str) -> bool {
        if self.remaining().starts_with(literal) {
            self.position += literal.len();
            true
        } else {
            false
        }
    }

    /// Same test as `consume_literal` but never advances the cursor.
    pub fn peek_literal(&self, literal: &str) -> bool {
        self.remaining().starts_with(literal)
    }

    /// 1-based line, 0-based column, and the full text of the current line
    /// (bounded by the nearest newlines on either side), all computed fresh
    /// from the cursor — there is no incremental line tracking to keep in
    /// sync with backtracking.
    pub fn where_(&self) -> (usize, usize, String) {
        self.where_at(self.position)
    }

    /// Same as `where_`, but for an arbitrary (already-observed) position
    /// rather than the live cursor. Used by `fail_from`, whose reported
    /// position is the explicit origin of the failure, not wherever the
    /// cursor ends up after unwinding.
    pub fn where_at(&self, pos: usize) -> (usize, usize, String) {
        // Line number: one more than the count of newlines strictly before
        // `pos`. Column: character count (not byte count — a multi-byte
        // UTF-8 character still moves the caret one column) from the start
        // of that line up to `pos`. Line text: from just after the previous
        // newline (or the start of the input) to just before the next one
        // (or the end of the input).
        let upto = &self.text[..pos];
        let line = upto.chars().filter(|&c| c == '\n').count() + 1;
        let line_start = upto.rfind('\n').map_or(0, |i| i + 1);
        let column = self.text[line_start..pos].chars().count();
        let line_end = self.text[pos..].find('\n').map_or(self.text.len(), |i| pos + i);
        let line_text = self.text[line_start..line_end].to_string();
        (line, column, line_text)
    }

    /// Moves the cursor forward by `n` bytes without any matching — used by
    /// readers that walk the input character-by-character themselves
    /// (`token_string`'s escape-decoding loop, `substring_before`'s
    /// boundary scan) instead of going through a single regex match.
    pub fn advance_bytes(&mut self, n: usize) {
        self.position += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_reports_line_and_column() {
        let mut buf = InputBuffer::new("hello world".to_string());
        assert_eq!(buf.where_(), (1, 0, "hello world".to_string()));
        buf.advance_bytes(5);
        assert_eq!(buf.where_(), (1, 5, "hello world".to_string()));
        buf.advance_bytes(6);
        assert_eq!(buf.where_(), (1, 11, "hello world".to_string()));
    }

    #[test]
    fn where_reports_across_lines() {
        let mut buf = InputBuffer::new("hello\nworld".to_string());
        assert_eq!(buf.where_(), (1, 0, "hello".to_string()));
        buf.advance_bytes(5);
        assert_eq!(buf.where_(), (1, 5, "hello".to_string()));
        buf.advance_bytes(1); // past the '\n'
        assert_eq!(buf.where_(), (2, 0, "world".to_string()));
    }

    #[test]
    fn append_does_not_move_cursor() {
        let mut buf = InputBuffer::new("abc".to_string());
        buf.advance_bytes(3);
        assert!(buf.at_end_of_text());
        buf.append("def");
        assert!(!buf.at_end_of_text());
        assert_eq!(buf.remaining(), "def");
    }
}
