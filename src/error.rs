//! # Error Types
//!
//! Comprehensive error handling for the text-wire codec.
//!
//! This module defines every error variant the codec can produce, from
//! tokenizer exhaustion to registry misses. Errors are explicit result
//! values; no partial packet is ever returned and nothing in the crate
//! panics on malformed wire data.
//!
//! ## Error Categories
//! - **Wire Errors**: the wire string ran out of tokens mid-packet
//! - **Conversion Errors**: a token's text does not parse as the declared shape
//! - **Registry Errors**: missing converters, unknown or duplicated packets
//! - **Definition Errors**: a packet definition disagrees with its value glue
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use text_protocol::error::{ProtocolError, Result};
//!
//! fn parse_slot(token: &str) -> Result<u8> {
//!     token.parse::<u8>().map_err(|_| ProtocolError::CouldNotConvert {
//!         token: token.to_string(),
//!         converter: "u8".to_string(),
//!     })
//! }
//!
//! assert!(parse_slot("3").is_ok());
//! assert!(parse_slot("many").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::Direction;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common error cases.
pub mod constants {
    /// Tokenizer errors
    pub const ERR_NO_MORE_TOKENS: &str = "no more tokens in wire string";

    /// Converter repository errors
    pub const ERR_NOT_REGISTERED: &str = "no converter registered for type";

    /// Packet registry errors
    pub const ERR_UNKNOWN_PACKET: &str = "unknown packet header";
    pub const ERR_DUPLICATE_PACKET: &str = "packet header already registered";

    /// Definition validation errors
    pub const ERR_INDEX_ORDER: &str = "field indices must be unique and strictly ascending";
    pub const ERR_FIXED_LIST_ARITY: &str = "fixed-length list has wrong element count";
    pub const ERR_SHAPE_MISMATCH: &str = "field value does not match declared shape";
    pub const ERR_LIST_SEPARATOR: &str =
        "variable-length list separator collides with the packet separator";
}

/// ProtocolError is the primary error type for all codec operations.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProtocolError {
    /// The wire string had fewer tokens than the packet definition requires.
    /// `position` is the ordinal of the token that was asked for.
    #[error("{}: exhausted at token {position}", constants::ERR_NO_MORE_TOKENS)]
    NoMoreTokens { position: usize },

    /// A token's text does not parse as the expected scalar shape. Carries
    /// the offending token and the converter's identity for diagnostics.
    #[error("could not convert token `{token}` using converter `{converter}`")]
    CouldNotConvert { token: String, converter: String },

    /// The fallback path found no converter for a type descriptor.
    #[error("{}: `{type_name}`", constants::ERR_NOT_REGISTERED)]
    NotRegistered { type_name: String },

    /// The header keyword/direction pair is not in the packet registry.
    #[error("{}: `{header}` ({direction})", constants::ERR_UNKNOWN_PACKET)]
    UnknownPacket { header: String, direction: Direction },

    /// A second registration for the same header/direction pair.
    #[error("{}: `{header}` ({direction})", constants::ERR_DUPLICATE_PACKET)]
    DuplicatePacket { header: String, direction: Direction },

    /// A codec failure tagged with the field it occurred on.
    #[error("packet `{packet}`, field `{field}` (index {index}): {source}")]
    Field {
        packet: String,
        field: String,
        index: u16,
        #[source]
        source: Box<ProtocolError>,
    },

    /// A packet definition and its value glue disagree. Always a bug in a
    /// definition, never a property of wire data; the codec builder surfaces
    /// these before any traffic is processed where possible.
    #[error("definition error: {0}")]
    Definition(String),
}

impl ProtocolError {
    /// Wrap an error with the packet/field it occurred on.
    pub(crate) fn in_field(self, packet: &str, field: &str, index: u16) -> Self {
        ProtocolError::Field {
            packet: packet.to_string(),
            field: field.to_string(),
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, unwrapping any field tagging.
    pub fn root_cause(&self) -> &ProtocolError {
        match self {
            ProtocolError::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
