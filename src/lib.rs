//! # text-protocol
//!
//! A text-wire game-protocol codec: converts between a space/token-delimited
//! wire string format and strongly-typed packet structs, and back.
//!
//! The crate is built around three ideas:
//! - a **declarative metadata model**: every packet type is described once
//!   as an ordered field list ([`schema::PacketDefinition`]), emitted by the
//!   [`wire_packet!`]/[`wire_record!`]/[`wire_enum!`] macros;
//! - a **layered converter strategy**: known primitive shapes get
//!   specialized parse/format fragments at build time, while enums and
//!   consumer-defined types resolve through a runtime-extensible repository
//!   ([`convert::ConverterRegistry`]);
//! - a **multi-level tokenizer** ([`wire::Tokenizer`]): list elements and
//!   nested sub-records re-split tokens on their own separators, so nesting
//!   stays unambiguous.
//!
//! ## Wire Format
//! ```text
//! <header> <field-1> <field-2> ... <field-N>
//! ```
//! Nullable fields use the `-` sentinel; booleans are `1`/`0`; list elements
//! join on a per-field list separator and record sub-fields on an inner
//! separator.
//!
//! ## Startup
//! All registration happens on a [`codec::CodecBuilder`] before traffic;
//! `build` runs a converter-coverage self-check and freezes the registries
//! into a [`ProtocolCodec`] that is safe to share across worker threads.
//! Serialize/deserialize calls are pure and lock-free; every failure is an
//! explicit [`ProtocolError`], never a panic, and no partial packet is ever
//! returned.
//!
//! ## Example
//! ```rust
//! use text_protocol::packets::server::St;
//! use text_protocol::packets::types::EntityKind;
//! use text_protocol::ProtocolCodec;
//!
//! let codec = ProtocolCodec::with_defaults()?;
//! let st = codec.deserialize_as::<St>("st 3 143 10 85 - 12.53.103")?;
//! assert_eq!(st.kind, EntityKind::Monster);
//! assert_eq!(st.mp_percent, None);
//! assert_eq!(st.buffs, vec![12, 53, 103]);
//! # Ok::<(), text_protocol::ProtocolError>(())
//! ```

pub mod codec;
pub mod convert;
pub mod error;
pub mod packet;
pub mod packets;
pub mod schema;
pub mod wire;

pub use codec::{CodecBuilder, ProtocolCodec};
pub use error::{ProtocolError, Result};
pub use packet::{AnyPacket, WirePacket};
pub use schema::{Direction, WireRecord};

// Re-exported for the definition tables the packet macros emit.
#[doc(hidden)]
pub use once_cell;
