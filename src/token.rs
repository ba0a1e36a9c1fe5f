// Tokens exchanged between the analysis stages
// and their one-token-per-line text format: <code, "value"> ... terminated by `$`

use crate::symbols::SymbolTable;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Line that terminates a token file
pub const END_MARKER: &str = "$";

static TOKEN_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(TOKEN_LINE_PATTERN).expect("invalid token line regex"));

/// <code, "value"> where the value runs to the last `">` on the line
const TOKEN_LINE_PATTERN: &str = r#"^<\s*(\d+)\s*,\s*"(.*)"\s*>$"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenCategory {
    Type,
    Count,
    TotalScore,
    Difficulty,
    Score,
    Content,
    Option,
    /// Sentinel closing every token sequence
    End,
}

impl TokenCategory {
    /// Categories that carry a code in the symbol table
    pub const CODED: [TokenCategory; 7] = [
        TokenCategory::Type,
        TokenCategory::Count,
        TokenCategory::TotalScore,
        TokenCategory::Difficulty,
        TokenCategory::Score,
        TokenCategory::Content,
        TokenCategory::Option,
    ];

    /// Key used for this category in the symbol table configuration
    pub fn key(&self) -> &'static str {
        match self {
            Self::Type => "TYPE",
            Self::Count => "COUNT",
            Self::TotalScore => "TOTAL SCORE",
            Self::Difficulty => "DIFFICULTY",
            Self::Score => "SCORE",
            Self::Content => "CONTENT",
            Self::Option => "OPTION",
            Self::End => END_MARKER,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::CODED.into_iter().find(|category| category.key() == key)
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A classified lexical unit. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub category: TokenCategory,
    pub value: String,
    /// 1-based line in the document (or token file) the token came from
    pub source_line: usize,
}

impl Token {
    pub fn new(category: TokenCategory, value: impl Into<String>, source_line: usize) -> Self {
        Self {
            category,
            value: value.into(),
            source_line,
        }
    }

    pub fn end(source_line: usize) -> Self {
        Self {
            category: TokenCategory::End,
            value: String::new(),
            source_line,
        }
    }

    pub fn is_end(&self) -> bool {
        self.category == TokenCategory::End
    }

    /// Text form of this token, `$` for the sentinel
    pub fn encode(&self, symbols: &SymbolTable) -> String {
        match symbols.code(self.category) {
            Some(code) => format!("<{}, \"{}\">", code, self.value),
            None => END_MARKER.to_string(),
        }
    }

    /// Form used in diagnostics: `SCORE "2"`, or `end of input` for the sentinel
    pub fn describe(&self, symbols: &SymbolTable) -> String {
        if self.is_end() {
            return "end of input".to_string();
        }
        format!("{} \"{}\"", symbols.name(self.category), self.value)
    }
}

#[derive(Debug, Error)]
pub enum TokenFileError {
    #[error("line {line}: malformed token line: {text}")]
    Malformed { line: usize, text: String },

    #[error("line {line}: unknown category code {code}")]
    UnknownCode { line: usize, code: u32 },

    #[error("line {line}: content after end marker")]
    TrailingContent { line: usize },

    #[error("missing end marker `$`")]
    MissingEnd,
}

/// Serialize a token sequence, one token per line. The sentinel becomes the final `$` line.
pub fn write_tokens(tokens: &[Token], symbols: &SymbolTable) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&token.encode(symbols));
        out.push('\n');
    }
    if !tokens.last().is_some_and(Token::is_end) {
        out.push_str(END_MARKER);
        out.push('\n');
    }
    out
}

/// Read a token file back into a sequence ending in exactly one END token.
/// Each token's `source_line` is its 1-based line in the token file; blank lines are skipped.
pub fn read_tokens(text: &str, symbols: &SymbolTable) -> Result<Vec<Token>, TokenFileError> {
    let mut tokens = Vec::new();
    let mut ended = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if ended {
            return Err(TokenFileError::TrailingContent { line });
        }
        if trimmed == END_MARKER {
            tokens.push(Token::end(line));
            ended = true;
            continue;
        }

        let captures =
            TOKEN_LINE_REGEX
                .captures(trimmed)
                .ok_or_else(|| TokenFileError::Malformed {
                    line,
                    text: trimmed.to_string(),
                })?;
        let code: u32 = captures[1].parse().map_err(|_| TokenFileError::Malformed {
            line,
            text: trimmed.to_string(),
        })?;
        let category = symbols
            .category(code)
            .ok_or(TokenFileError::UnknownCode { line, code })?;
        tokens.push(Token::new(category, &captures[2], line));
    }

    if !ended {
        return Err(TokenFileError::MissingEnd);
    }
    Ok(tokens)
}
