//! Output token assembly.
//!
//! Serialization fragments append finished tokens here; the packet codec
//! joins the buffer with the packet separator once every field has run.

use crate::error::{constants, ProtocolError, Result};

/// An in-progress output buffer of finished wire tokens.
///
/// Each entry is one top-level token. Nested structure (list elements,
/// sub-record fields) is joined by the owning fragment before it is pushed,
/// so the buffer itself never needs to know about separator levels.
#[derive(Debug, Default)]
pub struct TokenBuffer {
    tokens: Vec<String>,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(fields: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(fields),
        }
    }

    /// Append one finished token.
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Append the null sentinel token.
    pub fn push_sentinel(&mut self) {
        self.tokens.push(super::NULL_TOKEN.to_string());
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Join every token with `separator`.
    pub fn join(&self, separator: char) -> String {
        let mut sep = [0u8; 4];
        self.tokens.join(separator.encode_utf8(&mut sep))
    }

    /// Join with a leading header keyword, the final outbound form.
    pub fn join_with_header(&self, header: &str, separator: char) -> String {
        let mut out = String::with_capacity(
            header.len() + self.tokens.iter().map(|t| t.len() + 1).sum::<usize>(),
        );
        out.push_str(header);
        for token in &self.tokens {
            out.push(separator);
            out.push_str(token);
        }
        out
    }

    /// Consume the buffer expecting exactly one token; used when a fragment
    /// renders a single list element or nested record into its own buffer.
    pub fn into_single(mut self) -> Result<String> {
        if self.tokens.len() == 1 {
            Ok(self.tokens.remove(0))
        } else {
            Err(ProtocolError::Definition(format!(
                "{}: expected one token, fragment produced {}",
                constants::ERR_SHAPE_MISMATCH,
                self.tokens.len()
            )))
        }
    }
}
