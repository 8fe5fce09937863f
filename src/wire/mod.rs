//! # Wire Layer
//!
//! The lexical layer of the protocol: splitting received wire strings into
//! tokens and assembling outgoing tokens back into wire strings. Nothing in
//! this module interprets token contents; interpretation belongs to the
//! converter and schema layers.

pub mod tokenizer;
pub mod writer;

pub use tokenizer::{Token, Tokenizer};
pub use writer::TokenBuffer;

/// Default top-level field separator for packet definitions.
pub const DEFAULT_SEPARATOR: char = ' ';

/// The reserved token denoting an explicit null/absent value for any
/// nullable field. The check is against the whole token: `-1` is a number,
/// `-` alone is the sentinel. An empty token is distinct from the sentinel
/// and denotes an empty-but-present string.
pub const NULL_TOKEN: &str = "-";
