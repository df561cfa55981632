// The driver: seats text (or a streaming reader) in a fresh `Parser`,
// invokes the grammar's toplevel rule, and asserts end-of-input afterward.
// That final assertion failing is classified `Fatal` rather than
// `Recoverable` — there is no enclosing backtrack frame left at the top
// level for anything to catch it against.

use std::fs;
use std::io::Read;
use std::path::Path;

use log::debug;

use super::patterns::PatternOverrides;
use super::{FatalError, ParseResult, Parser, ParserConfig, ParserError};

/// A grammar: the toplevel rule plus optional pattern overrides. Roughly the
/// Rust rendering of a "subclass that overrides `parse` and `pattern_*`" —
/// since Rust has no dynamic method-name dispatch, the grammar is an
/// explicit value implementing this trait instead of a subclass.
pub trait Grammar {
    type Output;

    /// The toplevel rule: a composition of token readers and combinators
    /// called on the supplied parser.
    fn parse(&self, p: &mut Parser) -> ParseResult<Self::Output>;

    /// Grammar-level pattern overrides, analogous to the source framework's
    /// `pattern_<name>` methods. Beaten by the instance overrides in
    /// `ParserConfig`, but beats the framework defaults.
    fn pattern_overrides(&self) -> PatternOverrides {
        PatternOverrides::default()
    }
}

/// Decoding hint for `from_file`/`from_handle`. Only `Utf8` (the default)
/// and `Latin1` are recognised, matching the pair of encodings the
/// teacher's own `fs::read_to_string`-based I/O could plausibly need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Binmode {
    #[default]
    Utf8,
    Latin1,
}

#[derive(Debug, Clone, Default)]
pub struct FileOptions {
    pub binmode: Option<Binmode>,
}

fn decode(bytes: &[u8], binmode: Option<Binmode>) -> Result<String, FatalError> {
    match binmode.unwrap_or_default() {
        Binmode::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|source| FatalError::Decode { encoding: "utf8", source }),
        Binmode::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Seats `text`, invokes the grammar's toplevel rule, then requires
/// end-of-input.
pub(crate) fn from_string<G: Grammar>(
    grammar: &G,
    text: impl Into<String>,
    config: ParserConfig,
) -> ParseResult<G::Output> {
    let text = text.into();
    debug!(
        target: "mgc_parser::driver",
        "from_string: parsing {} bytes (toplevel '{}')",
        text.len(),
        config.toplevel
    );
    let mut parser = Parser::seated(text, config, grammar.pattern_overrides());
    let value = grammar.parse(&mut parser)?;
    require_end_of_input(&mut parser)?;
    debug!(target: "mgc_parser::driver", "from_string: parse succeeded");
    Ok(value)
}

/// Reads `path` in full (applying `opts.binmode` if given) and delegates to
/// `from_string`.
pub(crate) fn from_file<G: Grammar>(
    grammar: &G,
    path: impl AsRef<Path>,
    opts: FileOptions,
    config: ParserConfig,
) -> ParseResult<G::Output> {
    let bytes = fs::read(path.as_ref()).map_err(FatalError::from)?;
    let text = decode(&bytes, opts.binmode).map_err(ParserError::from)?;
    from_string(grammar, text, config)
}

/// Reads all of `handle` (applying `opts.binmode` if given) and delegates to
/// `from_string`. For an already-opened text handle rather than a path.
pub(crate) fn from_handle<G: Grammar>(
    grammar: &G,
    mut handle: impl Read,
    opts: FileOptions,
    config: ParserConfig,
) -> ParseResult<G::Output> {
    let mut bytes = Vec::new();
    handle.read_to_end(&mut bytes).map_err(FatalError::from)?;
    let text = decode(&bytes, opts.binmode).map_err(ParserError::from)?;
    from_string(grammar, text, config)
}

/// Installs `read_fn` as the streaming reader, seats empty text, invokes the
/// toplevel rule, then requires end-of-input. The Skipper pulls from
/// `read_fn` only once it is otherwise stuck at end-of-text; a `None`
/// result detaches it permanently.
pub(crate) fn from_reader<G: Grammar>(
    grammar: &G,
    read_fn: impl FnMut() -> Option<String> + 'static,
    config: ParserConfig,
) -> ParseResult<G::Output> {
    debug!(target: "mgc_parser::driver", "from_reader: streaming input (toplevel '{}')", config.toplevel);
    let mut parser = Parser::seated(String::new(), config, grammar.pattern_overrides());
    parser.reader = Some(Box::new(read_fn));
    let value = grammar.parse(&mut parser)?;
    require_end_of_input(&mut parser)?;
    debug!(target: "mgc_parser::driver", "from_reader: parse succeeded");
    Ok(value)
}

fn require_end_of_input(parser: &mut Parser) -> ParseResult<()> {
    if parser.at_eos() {
        Ok(())
    } else {
        let failure = parser.make_failure("Expected end of input");
        Err(ParserError::Fatal(FatalError::ExpectedEndOfInput(failure)))
    }
}
