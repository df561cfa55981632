// Failure model: a recoverable `ParseFailure` that backtracking combinators may
// catch, and a `FatalError` that never backtracks. `ParserError` is the tagged
// union the framework threads through every `?`.

/// A recoverable parse failure, pinned to the line/column/source-text it was
/// raised at. Combinators catch these (unless the enclosing frame is
/// committed); everything else propagates as a `FatalError`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{rendered}")]
pub struct ParseFailure {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub line_text: String,
    rendered: String,
}

impl ParseFailure {
    pub(crate) fn new(message: impl Into<String>, line: usize, column: usize, line_text: String) -> Self {
        let message = message.into();
        let body = render_caret(column, &line_text);
        let rendered = format!("{message} on line {line} at:\n{body}");
        ParseFailure { message, line, column, line_text, rendered }
    }
}

/// Builds the `<line text>\n<indent>^\n` half of the rendering: the indent
/// blanks every non-whitespace character up to `column` to a space, preserving
/// tabs, so the caret lines up under a monospaced terminal.
fn render_caret(column: usize, line_text: &str) -> String {
    let indent: String = line_text
        .chars()
        .take(column)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    format!("{line_text}\n{indent}^\n")
}

/// Anything that must never be caught by a backtracking combinator: a
/// programmer error (`commit` with no active frame), an I/O or decoding
/// failure reading a file, or the top-level end-of-input assertion failing
/// after the toplevel rule returns (there is no enclosing frame left to
/// backtrack into, so it is reported as fatal rather than recoverable).
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("commit called with no active backtrack frame")]
    CommitWithoutFrame,

    #[error("{0}")]
    ExpectedEndOfInput(ParseFailure),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid {encoding}: {source}")]
    Decode {
        encoding: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// The tagged union threaded through every combinator. Only `Recoverable`
/// variants are candidates for backtracking; `Fatal` always propagates.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error(transparent)]
    Recoverable(#[from] ParseFailure),
    #[error(transparent)]
    Fatal(#[from] FatalError),
}

impl ParserError {
    /// `Some` iff this is a `Recoverable` failure, i.e. a candidate for
    /// backtracking in the enclosing frame (subject to that frame's commit
    /// flag).
    pub(crate) fn as_recoverable(&self) -> Option<&ParseFailure> {
        match self {
            ParserError::Recoverable(f) => Some(f),
            ParserError::Fatal(_) => None,
        }
    }
}

pub type ParseResult<T> = Result<T, ParserError>;
