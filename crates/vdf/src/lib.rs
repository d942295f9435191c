//! Valve KeyValues (VDF/ACF) text decoder.
//!
//! Steam stores app manifests (`appmanifest_<id>.acf`), library folders and
//! login data in a small recursive text format: quoted keys followed by
//! either a quoted value or a `{ ... }` block. This crate turns that text into
//! a [`Block`] tree and writes trees back out.
//!
//! ```
//! let root = gami_vdf::decode("\"AppState\" { \"appid\" \"570\" }").unwrap();
//! assert_eq!(
//!     root.get_path(&["AppState", "appid"]).and_then(|n| n.as_str()),
//!     Some("570")
//! );
//! ```
//!
//! Decoding is all-or-nothing: the first [`LexError`] or [`ParseError`] is
//! returned and no partial tree is produced. The crate does no I/O.

pub mod error;
pub mod node;
pub mod options;
pub mod parser;
pub mod serializer;
pub mod token;

pub use error::{Error, LexError, LexErrorKind, ParseError, ParseErrorKind, line_col};
pub use node::{Block, Node};
pub use options::{DecodeOptions, DuplicateKeys, KeyMatch};
pub use parser::{parse, parse_with};
pub use serializer::{Serializer, serialize};
pub use token::{Spanned, Token, Tokenizer, tokenize};

/// Decodes `text` with the default options.
pub fn decode(text: &str) -> Result<Block, Error> {
    decode_with(text, &DecodeOptions::default())
}

/// Decodes `text` into its root block.
pub fn decode_with(text: &str, options: &DecodeOptions) -> Result<Block, Error> {
    parse_with(tokenize(text), options).map_err(|e| e.with_source(text))
}

/// Encodes `block` with Steam's default layout.
pub fn encode(block: &Block) -> String {
    serialize(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appstate_document() {
        let root = decode("\"AppState\"\n{\n\t\"appid\"\t\"570\"\n\t\"name\"\t\"Dota 2\"\n}").unwrap();
        assert_eq!(root.len(), 1);
        let state = root.get_block("AppState").unwrap();
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["appid", "name"]);
        assert_eq!(state.get("appid"), Some(&Node::Leaf("570".into())));
        assert_eq!(state.get("name"), Some(&Node::Leaf("Dota 2".into())));
    }

    #[test]
    fn unterminated_block_at_end_of_input() {
        let text = "\"a\" \"1\" \"b\" {";
        match decode(text) {
            Err(Error::Parse(e)) => {
                assert!(matches!(e.kind, ParseErrorKind::UnterminatedBlock { .. }));
                assert!(e.end_of_input);
                assert_eq!(e.offset, text.len());
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn trailing_whitespace_moves_end_offset() {
        let text = "\"a\" {\n\n";
        let err = decode(text).unwrap_err();
        assert_eq!(err.offset(), text.len());
        assert_eq!(err.line_col(text), (3, 1));
    }

    #[test]
    fn unterminated_string() {
        let text = "\"a\" \"unterminated";
        let err = decode(text).unwrap_err();
        assert!(err.is_end_of_input());
        assert_eq!(err.offset(), 4);
        assert_ne!(err.offset(), text.len());
        match err {
            Error::Lex(e) => {
                assert_eq!(e.kind, LexErrorKind::UnterminatedString);
                assert_eq!(e.context, "\"unterminated");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unmatched_close_reports_the_brace() {
        let err = decode("\"x\" \"1\" } ").unwrap_err();
        match err {
            Error::Parse(e) => {
                assert_eq!(e.kind, ParseErrorKind::UnmatchedClose);
                assert!(!e.end_of_input);
                assert_eq!(e.offset, 8);
                assert_eq!(e.context, "} ");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn line_comment_is_transparent() {
        let with = decode("\"k\" \"v\" // trailing note\n\"k2\" \"v2\"").unwrap();
        let without = decode("\"k\" \"v\"\n\"k2\" \"v2\"").unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn error_display() {
        let err = decode("\"k\" }").unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: missing value for key \"k\" at offset 4 near \"}\""
        );
    }

    #[test]
    fn encode_then_decode() {
        let text = "\"root\"\n{\n\t\"a\"\t\t\"1\"\n}\n";
        let root = decode(text).unwrap();
        assert_eq!(encode(&root), text);
    }
}
