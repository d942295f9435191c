//! Token stream to document tree.
//!
//! The root is an implicit block with no surrounding braces. Each block frame
//! alternates between expecting a key (or its end) and expecting the value for
//! that key. Open blocks are kept on an explicit stack, so nesting depth is
//! bounded by memory rather than by the call stack.

use std::mem;

use crate::error::{Error, LexError, ParseError, ParseErrorKind};
use crate::node::{Block, Node};
use crate::options::{DecodeOptions, DuplicateKeys};
use crate::token::{Spanned, Token};

enum State {
    ExpectingKeyOrEnd,
    ExpectingValueOrBlock { key: String, offset: usize },
}

/// A suspended parent block waiting for the child opened under `key`.
struct Frame {
    parent: Block,
    key: String,
    key_offset: usize,
}

/// Parses a token stream with the default `DecodeOptions`.
pub fn parse<'a, I>(tokens: I) -> Result<Block, Error>
where
    I: IntoIterator<Item = Result<Spanned<'a>, LexError>>,
{
    parse_with(tokens, &DecodeOptions::default())
}

/// Parses a token stream into the root block.
///
/// End-of-input errors are reported at the end of the last token; `decode`
/// moves them to the end of the text.
pub fn parse_with<'a, I>(tokens: I, options: &DecodeOptions) -> Result<Block, Error>
where
    I: IntoIterator<Item = Result<Spanned<'a>, LexError>>,
{
    let mut stack: Vec<Frame> = Vec::new();
    let mut current = Block::with_key_match(options.key_match);
    let mut state = State::ExpectingKeyOrEnd;
    let mut last_end = 0;

    for item in tokens {
        let Spanned { token, offset, end } = item?;
        last_end = end;

        state = match (state, token) {
            (State::ExpectingKeyOrEnd, Token::Str(key)) => State::ExpectingValueOrBlock {
                key: key.into_owned(),
                offset,
            },
            (State::ExpectingKeyOrEnd, Token::CloseBlock) => {
                let Some(frame) = stack.pop() else {
                    return Err(ParseError::at(ParseErrorKind::UnmatchedClose, offset).into());
                };
                let child = mem::replace(&mut current, frame.parent);
                insert_entry(
                    &mut current,
                    frame.key,
                    Node::Block(child),
                    frame.key_offset,
                    options,
                )?;
                State::ExpectingKeyOrEnd
            }
            (State::ExpectingKeyOrEnd, Token::OpenBlock) => {
                return Err(ParseError::at(ParseErrorKind::ExpectedKey, offset).into());
            }
            (State::ExpectingValueOrBlock { key, offset: key_offset }, Token::Str(value)) => {
                insert_entry(
                    &mut current,
                    key,
                    Node::Leaf(value.into_owned()),
                    key_offset,
                    options,
                )?;
                State::ExpectingKeyOrEnd
            }
            (State::ExpectingValueOrBlock { key, offset: key_offset }, Token::OpenBlock) => {
                let parent = mem::replace(&mut current, Block::with_key_match(options.key_match));
                stack.push(Frame {
                    parent,
                    key,
                    key_offset,
                });
                State::ExpectingKeyOrEnd
            }
            (State::ExpectingValueOrBlock { key, .. }, Token::CloseBlock) => {
                return Err(ParseError::at(ParseErrorKind::MissingValue { key }, offset).into());
            }
        };
    }

    if let State::ExpectingValueOrBlock { key, .. } = state {
        return Err(ParseError::at_end(ParseErrorKind::MissingValue { key }, last_end).into());
    }
    if let Some(frame) = stack.pop() {
        return Err(ParseError::at_end(
            ParseErrorKind::UnterminatedBlock { key: frame.key },
            last_end,
        )
        .into());
    }
    Ok(current)
}

fn insert_entry(
    block: &mut Block,
    key: String,
    node: Node,
    key_offset: usize,
    options: &DecodeOptions,
) -> Result<(), ParseError> {
    let Some(index) = block.position(&key) else {
        block.push(key, node);
        return Ok(());
    };
    match options.duplicate_keys {
        DuplicateKeys::LastWins => {
            block.replace_at(index, node);
        }
        DuplicateKeys::FirstWins => {}
        DuplicateKeys::Reject => {
            return Err(ParseError::at(
                ParseErrorKind::DuplicateKey { key },
                key_offset,
            ));
        }
    }
    Ok(())
}
