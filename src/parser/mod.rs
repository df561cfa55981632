//! A reusable framework for writing recursive-descent parsers with
//! backtracking over a single input string.
//!
//! The hard part is the *parser kernel*: a monotonic cursor, atomic
//! primitives, backtracking combinators that snapshot and restore the
//! cursor, a commit mechanism that disables backtracking within an
//! alternation, a scope stack that lets inner token readers see a delimited
//! construct's closer as an implicit end-of-input, and a streaming input
//! adapter that may only append text while skipping whitespace.

mod buffer;
mod combinator;
mod commit;
mod driver;
mod failure;
mod patterns;
mod scope;
mod token;

use buffer::InputBuffer;
use commit::CommitStack;
use scope::ScopeStack;

pub use driver::{Binmode, FileOptions, Grammar};
pub use failure::{FatalError, ParseFailure, ParseResult, ParserError};
pub use patterns::{ParserConfig, PatternOverrides};
pub use token::Number;

use log::trace;

/// The parser kernel: owns the input buffer, the resolved pattern set, the
/// scope and commit stacks, and (for `from_reader`) the streaming input
/// callback. Grammars receive it as `&mut Parser` and drive it through the
/// token readers and combinators re-exported from this module.
pub struct Parser {
    buffer: InputBuffer,
    patterns: patterns::PatternSet,
    scopes: ScopeStack,
    commits: CommitStack,
    reader: Option<Box<dyn FnMut() -> Option<String>>>,
    config: ParserConfig,
}

impl Parser {
    pub(crate) fn seated(text: String, config: ParserConfig, grammar_patterns: PatternOverrides) -> Self {
        let patterns = patterns::PatternSet::resolve(&config.patterns, &grammar_patterns, config.accept_0o_oct);
        Parser {
            buffer: InputBuffer::new(text),
            patterns,
            scopes: ScopeStack::default(),
            commits: CommitStack::default(),
            reader: None,
            config,
        }
    }

    /// Current cursor position, in bytes from the start of the input.
    /// Combinators pass this to `set_position` to restore a snapshot; no
    /// other caller should treat the value as anything but an opaque token.
    pub fn pos(&self) -> usize {
        self.buffer.position()
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.buffer.set_position(pos);
    }

    /// 1-based line, 0-based column, and the full text of the current line.
    pub fn location(&self) -> (usize, usize, String) {
        self.buffer.where_()
    }

    /// Number of active nested scopes introduced by `scope_of`.
    pub fn scope_level(&self) -> usize {
        self.scopes.level()
    }

    /// Raises a recoverable failure at the current cursor.
    pub fn fail<T>(&self, message: impl Into<String>) -> ParseResult<T> {
        Err(self.make_failure(message).into())
    }

    /// Raises a recoverable failure at an explicit, previously-observed
    /// position rather than the current cursor.
    pub fn fail_from<T>(&self, pos: usize, message: impl Into<String>) -> ParseResult<T> {
        let (line, column, line_text) = self.buffer.where_at(pos);
        Err(ParseFailure::new(message, line, column, line_text).into())
    }

    pub(crate) fn make_failure(&self, message: impl Into<String>) -> ParseFailure {
        let (line, column, line_text) = self.buffer.where_();
        ParseFailure::new(message, line, column, line_text)
    }

    /// Whitespace/comment skipping, pulling more text from the streaming
    /// reader (if installed) only once the cursor is otherwise stuck at
    /// end-of-text. Idempotent: a second call with no intervening mutation
    /// is a no-op and does not re-probe a reader that already returned
    /// `None`.
    pub(crate) fn skip_ws(&mut self) {
        loop {
            loop {
                let skipped_ws = self.buffer.match_at(&self.patterns.ws).is_some();
                let skipped_comment = match &self.patterns.comment {
                    Some(re) => self.buffer.match_at(re).is_some(),
                    None => false,
                };
                if !skipped_ws && !skipped_comment {
                    break;
                }
            }
            if !self.buffer.at_end_of_text() {
                return;
            }
            match self.reader.take() {
                None => return,
                Some(mut reader) => match reader() {
                    Some(more) if !more.is_empty() => {
                        trace!(target: "mgc_parser::skip", "streaming reader appended {} bytes", more.len());
                        self.buffer.append(&more);
                        self.reader = Some(reader);
                    }
                    _ => {
                        trace!(target: "mgc_parser::skip", "streaming reader detached");
                        return;
                    }
                },
            }
        }
    }

    /// True if, after skipping whitespace/comments, the cursor is at
    /// end-of-text or at the innermost active scope's closer.
    pub fn at_eos(&mut self) -> bool {
        self.skip_ws();
        if self.buffer.at_end_of_text() {
            return true;
        }
        match self.scopes.current() {
            Some(stop) => self.buffer.peek_at(stop),
            None => false,
        }
    }

    /// Seats `text`, invokes `grammar`'s toplevel rule, then requires
    /// end-of-input.
    pub fn from_string<G: Grammar>(
        grammar: &G,
        text: impl Into<String>,
        config: ParserConfig,
    ) -> ParseResult<G::Output> {
        driver::from_string(grammar, text, config)
    }

    /// Reads `path` in full and delegates to `from_string`.
    pub fn from_file<G: Grammar>(
        grammar: &G,
        path: impl AsRef<std::path::Path>,
        opts: driver::FileOptions,
        config: ParserConfig,
    ) -> ParseResult<G::Output> {
        driver::from_file(grammar, path, opts, config)
    }

    /// Reads an already-opened handle in full and delegates to
    /// `from_string`.
    pub fn from_handle<G: Grammar>(
        grammar: &G,
        handle: impl std::io::Read,
        opts: driver::FileOptions,
        config: ParserConfig,
    ) -> ParseResult<G::Output> {
        driver::from_handle(grammar, handle, opts, config)
    }

    /// Installs `read_fn` as the streaming reader, seats empty text, invokes
    /// `grammar`'s toplevel rule, then requires end-of-input.
    pub fn from_reader<G: Grammar>(
        grammar: &G,
        read_fn: impl FnMut() -> Option<String> + 'static,
        config: ParserConfig,
    ) -> ParseResult<G::Output> {
        driver::from_reader(grammar, read_fn, config)
    }
}
