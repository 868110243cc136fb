//! Lexical analysis
//!
//! Turns raw query text into typed tokens with line numbers. Lexical classes
//! are tried in a fixed order and the first class that matches at the
//! current position wins (not the longest match).

use once_cell::sync::Lazy;
use regex::Regex;

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Aggregate,
    Star,
    Identifier,
    Number,
    String,
    Operator,
    Symbol,
}

/// A single token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,

    /// Upper-cased text, except string literals which keep their casing
    pub text: String,

    /// Line the token starts on (1-indexed)
    pub line: usize,
}

impl Token {
    /// Check if this token's text equals `text`
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}

/// No lexical class matched at the scan position
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid character near '{character}' at line {line}")]
pub struct LexError {
    pub character: char,
    pub line: usize,
}

/// A lexical class; `None` kind means the match is skipped (whitespace)
struct LexClass {
    kind: Option<TokenKind>,
    pattern: Regex,
}

const KEYWORDS: &str = "SELECT|FROM|WHERE|INSERT|INTO|VALUE|VALUES|UPDATE|SET|DELETE|CREATE|DROP|ALTER|TABLE|IN|LIMIT|JOIN|INNER|LEFT|RIGHT|FULL|OUTER|CROSS|ON|AND|OR|NOT|DISTINCT|AS|GROUP|BY|HAVING|ORDER|ASC|DESC|OFFSET|UNION|INTERSECT|EXCEPT|CASE|WHEN|THEN|ELSE|END|BETWEEN|LIKE|EXISTS|WITH|RECURSIVE|ALL|ANY|SOME|CAST|INTERVAL|EXTRACT|OVER|PARTITION|ROW|ROWS|PRECEDING|FOLLOWING|CURRENT|UNBOUNDED|RANGE|EXCLUDE|NULLS|FIRST|LAST|PRIMARY|FOREIGN|KEY|REFERENCES|CONSTRAINT|INDEX|UNIQUE|CHECK|DEFAULT|AUTO_INCREMENT|COLLATE|COMMENT|ENGINE|CHARACTER|CHARSET|UNSIGNED|SIGNED|ZEROFILL|BINARY|PRECISION|SCALE|DATE|TIME|TIMESTAMP|DATETIME|YEAR|MONTH|DAY|HOUR|MINUTE|SECOND|MICROSECOND|WEEK|QUARTER|CENTURY|DECADE|AGE|EPOCH|TIMEZONE|AT|ZONE";

const AGGREGATES: &str = "COUNT|SUM|AVG|MIN|MAX|STRING_AGG|ARRAY_AGG|STDDEV|VARIANCE|MEDIAN|MODE|PERCENTILE|LISTAGG";

static LEX_CLASSES: Lazy<Vec<LexClass>> = Lazy::new(|| {
    let keyword = format!(r"^(?i)\b(?:{})\b", KEYWORDS);
    let aggregate = format!(r"^(?i)\b(?:{})\b", AGGREGATES);

    [
        (Some(TokenKind::Keyword), keyword.as_str()),
        (Some(TokenKind::Aggregate), aggregate.as_str()),
        (Some(TokenKind::Star), r"^\*"),
        (Some(TokenKind::Identifier), r"^[a-zA-Z_][a-zA-Z0-9_]*"),
        (Some(TokenKind::Number), r"^\b[0-9]+(?:\.[0-9]+)?\b"),
        (Some(TokenKind::String), r"^'(?:[^'\\]|\\.)*'"),
        (Some(TokenKind::Operator), r"^(?:=|<>|!=|<|>|<=|>=|\|\||&&|\+|-|\*|/|%)"),
        (Some(TokenKind::Symbol), r"^[(),;.]"),
        (None, r"^\s+"),
    ]
    .into_iter()
    .map(|(kind, pattern)| LexClass {
        kind,
        // The patterns are fixed at compile time
        pattern: Regex::new(pattern).expect("lexical class pattern is valid"),
    })
    .collect()
});

/// Tokenize a query
///
/// Whitespace advances the cursor and line counter but produces no token.
/// Fails on the first position no lexical class matches.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut line = 1;

    while pos < text.len() {
        let rest = &text[pos..];

        let matched = LEX_CLASSES
            .iter()
            .find_map(|class| class.pattern.find(rest).map(|m| (class.kind, m.as_str())));

        let Some((kind, value)) = matched else {
            return Err(LexError {
                character: rest.chars().next().unwrap_or_default(),
                line,
            });
        };

        if let Some(kind) = kind {
            let text = if kind == TokenKind::String {
                value.to_string()
            } else {
                value.to_uppercase()
            };
            tokens.push(Token { kind, text, line });
        }

        line += value.matches('\n').count();
        pos += value.len();
    }

    Ok(tokens)
}
