// The configurable regexes resolved once at parser construction. Defaults are
// compiled the same way the teacher compiles its fixed token regexes —
// `\A`-anchored, matched against the cursor's suffix slice — which resolves
// the open question of anchoring left implicit in the original grammar.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DEFAULT_WS: Regex = Regex::new(r"\A\s+").unwrap();
    static ref DEFAULT_IDENT: Regex = Regex::new(r"\A[A-Za-z_]\w*").unwrap();
    static ref DEFAULT_STRING_DELIM: Regex = Regex::new(r#"\A['"]"#).unwrap();
    static ref DEFAULT_FLOAT: Regex =
        Regex::new(r"(?i)\A-?(?:(?:\d*\.\d+|\d+\.)(?:e-?\d+)?|\d+e-?\d+)").unwrap();
}

/// The digit grammar alone (no sign, no anchor): `0x…` hex, a leading-zero
/// octal literal, or a plain decimal literal. `token_int` wraps this with an
/// optional leading `-` and an anchor at the point of use.
const DEFAULT_INT_SOURCE: &str = r"0[xX][0-9a-fA-F]+|0[0-7]*|[1-9][0-9]*";

/// User- or grammar-supplied overrides for any of the six named patterns.
/// Instance overrides (passed to `ParserConfig`) beat a grammar's own
/// `Grammar::pattern_overrides()`, which beats the framework defaults above.
#[derive(Default, Clone)]
pub struct PatternOverrides {
    pub ws: Option<Regex>,
    pub comment: Option<Regex>,
    pub int: Option<Regex>,
    pub float: Option<Regex>,
    pub ident: Option<Regex>,
    pub string_delim: Option<Regex>,
}

fn pick(instance: &Option<Regex>, grammar: &Option<Regex>, default: &Regex) -> Regex {
    instance.clone().or_else(|| grammar.clone()).unwrap_or_else(|| default.clone())
}

fn pick_source(instance: &Option<Regex>, grammar: &Option<Regex>, default: &str) -> String {
    instance
        .as_ref()
        .or(grammar.as_ref())
        .map(|re| re.as_str().to_string())
        .unwrap_or_else(|| default.to_string())
}

/// The resolved, compiled pattern set a single parse run uses.
pub struct PatternSet {
    pub ws: Regex,
    pub comment: Option<Regex>,
    /// Anchored, sign-optional: `\A-?(?:<int source>)`.
    pub int: Regex,
    pub float: Regex,
    pub ident: Regex,
    pub string_delim: Regex,
}

impl PatternSet {
    pub fn resolve(instance: &PatternOverrides, grammar: &PatternOverrides, accept_0o_oct: bool) -> Self {
        let ws = pick(&instance.ws, &grammar.ws, &DEFAULT_WS);
        let comment = instance.comment.clone().or_else(|| grammar.comment.clone());
        let float = pick(&instance.float, &grammar.float, &DEFAULT_FLOAT);
        let ident = pick(&instance.ident, &grammar.ident, &DEFAULT_IDENT);
        let string_delim = pick(&instance.string_delim, &grammar.string_delim, &DEFAULT_STRING_DELIM);

        let mut int_source = pick_source(&instance.int, &grammar.int, DEFAULT_INT_SOURCE);
        if accept_0o_oct {
            int_source = format!("0[oO][0-7]+|{int_source}");
        }
        let int = Regex::new(&format!(r"\A-?(?:{int_source})")).expect("int pattern must compile");

        PatternSet { ws, comment, int, float, ident, string_delim }
    }
}

/// Construction-time knobs: pattern overrides and the `accept_0o_oct` flag.
/// The `toplevel` field is carried for parity with the source framework's
/// configurable rule-dispatch name; in Rust the toplevel rule is always
/// `Grammar::parse` (there is no dynamic method lookup to name), so this
/// field is descriptive only — it shows up in the driver's log lines.
#[derive(Clone)]
pub struct ParserConfig {
    pub toplevel: &'static str,
    pub patterns: PatternOverrides,
    pub accept_0o_oct: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig { toplevel: "parse", patterns: PatternOverrides::default(), accept_0o_oct: false }
    }
}
