//! Single-pass tokenizer for KeyValues text.
//!
//! Produces `{`, `}` and quoted-string tokens, skipping whitespace and `//`
//! line comments between them.
//!
//! Inside quotes `\"`, `\\`, `\n` and `\t` are resolved and any other
//! backslash sequence is kept as written. Steam itself writes Windows paths
//! with doubled backslashes, so a hand-edited `"C:\temp"` decodes with a tab
//! where `"C:\Games"` keeps its backslash.

use std::borrow::Cow;
use std::iter::FusedIterator;

use crate::error::{LexError, LexErrorKind};

const BOM: &str = "\u{feff}";

/// A lexical unit of the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `{`
    OpenBlock,
    /// `}`
    CloseBlock,
    /// A quoted string with escapes resolved. Borrows from the input when no
    /// escape sequence had to be rewritten.
    Str(Cow<'a, str>),
}

/// A token together with the byte range it occupies in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub offset: usize,
    pub end: usize,
}

/// Returns a lazy token stream over `text`.
///
/// `\n` and `\t` inside a string become a newline and a tab. Input that
/// relies on single backslashes (`"C:\temp"`) decodes differently from what
/// a path-minded reader expects; see the module docs.
pub fn tokenize(text: &str) -> Tokenizer<'_> {
    Tokenizer::new(text)
}

/// Iterator over the tokens of a KeyValues document.
///
/// Yields at most one error; the stream ends after it.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    text: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        let pos = if text.starts_with(BOM) { BOM.len() } else { 0 };
        Self {
            text,
            pos,
            failed: false,
        }
    }

    /// Current byte offset into the input.
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn skip_trivia(&mut self) {
        let bytes = self.text.as_bytes();
        while let Some(&b) = bytes.get(self.pos) {
            match b {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                b'/' if bytes.get(self.pos + 1) == Some(&b'/') => {
                    self.pos = match self.text[self.pos..].find('\n') {
                        Some(i) => self.pos + i + 1,
                        None => bytes.len(),
                    };
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Spanned<'a>>, LexError> {
        self.skip_trivia();

        let offset = self.pos;
        let Some(&b) = self.text.as_bytes().get(offset) else {
            return Ok(None);
        };

        let token = match b {
            b'{' => Token::OpenBlock,
            b'}' => Token::CloseBlock,
            b'"' => return self.read_string().map(Some),
            _ => {
                let c = self.text[offset..].chars().next().unwrap_or('\0');
                return Err(LexError::new(
                    LexErrorKind::UnexpectedChar(c),
                    offset,
                    self.text,
                ));
            }
        };

        self.pos += 1;
        Ok(Some(Spanned {
            token,
            offset,
            end: self.pos,
        }))
    }

    /// Reads a quoted string starting at the opening quote under `self.pos`.
    fn read_string(&mut self) -> Result<Spanned<'a>, LexError> {
        let start = self.pos;
        let body = start + 1;
        let bytes = self.text.as_bytes();

        // Only allocated once an escape sequence is seen.
        let mut owned: Option<String> = None;
        let mut run_start = body;
        let mut i = body;

        while let Some(&b) = bytes.get(i) {
            match b {
                b'"' => {
                    let text = match owned {
                        Some(mut s) => {
                            s.push_str(&self.text[run_start..i]);
                            Cow::Owned(s)
                        }
                        None => Cow::Borrowed(&self.text[body..i]),
                    };
                    self.pos = i + 1;
                    return Ok(Spanned {
                        token: Token::Str(text),
                        offset: start,
                        end: self.pos,
                    });
                }
                b'\\' => {
                    let s = owned.get_or_insert_with(String::new);
                    s.push_str(&self.text[run_start..i]);
                    let unescaped = match bytes.get(i + 1) {
                        Some(b'"') => '"',
                        Some(b'\\') => '\\',
                        Some(b'n') => '\n',
                        Some(b't') => '\t',
                        Some(_) => {
                            // Unknown escape: keep the backslash, let the next
                            // character start the following run.
                            s.push('\\');
                            i += 1;
                            run_start = i;
                            continue;
                        }
                        None => break,
                    };
                    s.push(unescaped);
                    i += 2;
                    run_start = i;
                }
                _ => i += 1,
            }
        }

        Err(LexError::at_end(
            LexErrorKind::UnterminatedString,
            start,
            self.text,
        ))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Spanned<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Tokenizer<'_> {}
