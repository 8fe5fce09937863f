//! # Tokenizer
//!
//! Splits a raw wire string into an ordered, position-tracked sequence of
//! tokens given a separator character. Tokens are produced lazily; nothing is
//! allocated for the scan itself, and token text borrows from the input.
//!
//! Splitting follows `str::split` semantics exactly: two adjacent separators
//! produce an empty token between them, a trailing separator produces a
//! trailing empty token, and an empty input produces a single empty token.
//! The doubled-space artifact of the wire format (an empty string field
//! followed by another field) relies on this.
//!
//! `sub_tokenize` re-splits a previously returned token on a different
//! separator, producing a nested tokenizer. List elements and nested-record
//! fields are consumed this way, so separator levels nest without ambiguity.

use crate::error::{ProtocolError, Result};

/// One token of a wire string.
///
/// `position` is the token's ordinal within the tokenizer that produced it,
/// starting at zero. Sub-tokenizers restart the count for their own stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub position: usize,
}

impl<'a> Token<'a> {
    /// Whether this token is the null sentinel (`-`, exactly).
    pub fn is_sentinel(&self) -> bool {
        self.text == super::NULL_TOKEN
    }

    /// Whether this token is the empty string (present but empty).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A lazy, position-tracked splitter over one wire string.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    separator: char,
    cursor: usize,
    next_position: usize,
    exhausted: bool,
}

impl<'a> Tokenizer<'a> {
    /// Construct a tokenizer over `input`, splitting on `separator`.
    pub fn new(input: &'a str, separator: char) -> Self {
        Self {
            input,
            separator,
            cursor: 0,
            next_position: 0,
            exhausted: false,
        }
    }

    /// A tokenizer that is already exhausted, for wire strings that end at
    /// the header keyword. Distinct from `new("", sep)`, which still yields
    /// one empty token.
    pub fn drained(separator: char) -> Tokenizer<'static> {
        Tokenizer {
            input: "",
            separator,
            cursor: 0,
            next_position: 0,
            exhausted: true,
        }
    }

    /// The separator this tokenizer splits on.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Return the next token and advance.
    ///
    /// # Errors
    /// Returns [`ProtocolError::NoMoreTokens`] once the stream is exhausted;
    /// the error carries the ordinal of the token that was asked for.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        self.advance().ok_or(ProtocolError::NoMoreTokens {
            position: self.next_position,
        })
    }

    /// Re-split a previously returned token on a different separator,
    /// producing a nested tokenizer over that token's text.
    pub fn sub_tokenize(&self, token: Token<'a>, separator: char) -> Tokenizer<'a> {
        Tokenizer::new(token.text, separator)
    }

    /// Whether a further `next_token` call would fail.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The slice of the input not yet consumed.
    pub fn remainder(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        if self.exhausted {
            return None;
        }
        let rest = &self.input[self.cursor..];
        let token_text = match rest.find(self.separator) {
            Some(at) => {
                self.cursor += at + self.separator.len_utf8();
                &rest[..at]
            }
            None => {
                // Final token: everything left, including the empty string.
                self.exhausted = true;
                rest
            }
        };
        let token = Token {
            text: token_text,
            position: self.next_position,
        };
        self.next_position += 1;
        Some(token)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}
