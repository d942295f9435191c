//! Decoder error types.
//!
//! Both error kinds carry the byte offset of the offending input and a short
//! snippet of the text found there. Decoding stops at the first error.

use std::fmt;

/// Maximum number of characters kept in an error context snippet.
const CONTEXT_CHARS: usize = 24;

/// Character-level failure reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A quoted string reached end of input without its closing quote.
    UnterminatedString,
    /// A character that cannot start a token (not whitespace, comment, quote or brace).
    UnexpectedChar(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnterminatedString => write!(f, "unterminated string"),
            LexErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
        }
    }
}

/// Malformed character-level input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}{}", near(.context))]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Byte offset into the decoded text.
    ///
    /// An unterminated string is reported at its opening quote with
    /// `end_of_input` set, so the offset is not `text.len()` even though the
    /// input ran out. Parse errors at end of input use `text.len()`.
    pub offset: usize,
    /// True when the input ended before the token was complete.
    pub end_of_input: bool,
    /// Text found at `offset`, truncated to a single short line.
    pub context: String,
}

impl LexError {
    pub(crate) fn new(kind: LexErrorKind, offset: usize, text: &str) -> Self {
        Self {
            kind,
            offset,
            end_of_input: false,
            context: snippet(text, offset),
        }
    }

    pub(crate) fn at_end(kind: LexErrorKind, offset: usize, text: &str) -> Self {
        Self {
            end_of_input: true,
            ..Self::new(kind, offset, text)
        }
    }
}

/// Structural failure reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `}` with no open block to close.
    UnmatchedClose,
    /// Input ended while the block under `key` was still open.
    UnterminatedBlock { key: String },
    /// A key followed by `}` or end of input instead of a value.
    MissingValue { key: String },
    /// A `{` where a key was expected.
    ExpectedKey,
    /// A repeated key under `DuplicateKeys::Reject`.
    DuplicateKey { key: String },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnmatchedClose => write!(f, "unmatched closing brace"),
            ParseErrorKind::UnterminatedBlock { key } => {
                write!(f, "unterminated block for key {key:?}")
            }
            ParseErrorKind::MissingValue { key } => write!(f, "missing value for key {key:?}"),
            ParseErrorKind::ExpectedKey => write!(f, "expected a key, found opening brace"),
            ParseErrorKind::DuplicateKey { key } => write!(f, "duplicate key {key:?}"),
        }
    }
}

/// Malformed document structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}{}", near(.context))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset of the offending token, or of the end of input.
    pub offset: usize,
    /// True when the error was detected at end of input.
    pub end_of_input: bool,
    /// Text found at `offset`; empty until the source text is attached.
    pub context: String,
}

impl ParseError {
    pub(crate) fn at(kind: ParseErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            end_of_input: false,
            context: String::new(),
        }
    }

    pub(crate) fn at_end(kind: ParseErrorKind, offset: usize) -> Self {
        Self {
            end_of_input: true,
            ..Self::at(kind, offset)
        }
    }
}

/// Any failure while decoding a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Byte offset the error refers to.
    ///
    /// Check [`Error::is_end_of_input`] rather than comparing this with the
    /// input length: an unterminated string points at its opening quote.
    pub fn offset(&self) -> usize {
        match self {
            Error::Lex(e) => e.offset,
            Error::Parse(e) => e.offset,
        }
    }

    /// True when the input ended too early.
    pub fn is_end_of_input(&self) -> bool {
        match self {
            Error::Lex(e) => e.end_of_input,
            Error::Parse(e) => e.end_of_input,
        }
    }

    /// 1-based line and column of the error within `text`.
    pub fn line_col(&self, text: &str) -> (usize, usize) {
        line_col(text, self.offset())
    }

    /// Attaches the source text: end-of-input offsets move to `text.len()`
    /// and the context snippet is filled in.
    pub(crate) fn with_source(self, text: &str) -> Self {
        match self {
            Error::Lex(e) => Error::Lex(e),
            Error::Parse(mut e) => {
                if e.end_of_input {
                    e.offset = text.len();
                }
                e.context = snippet(text, e.offset);
                Error::Parse(e)
            }
        }
    }
}

/// Maps a byte offset to a 1-based (line, column) pair. Columns count characters.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &text[..offset];
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

fn snippet(text: &str, offset: usize) -> String {
    text.get(offset..)
        .unwrap_or_default()
        .chars()
        .take_while(|&c| c != '\n' && c != '\r')
        .take(CONTEXT_CHARS)
        .collect()
}

fn near(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" near {context:?}")
    }
}
