//! # Protocol Facade
//!
//! [`CodecBuilder`] is the explicit startup initialization step: it owns the
//! converter registry, the packet registry, and the recognizer chain while
//! they are still mutable, then `build` runs the converter-coverage
//! self-check and freezes both registries into a [`ProtocolCodec`].
//!
//! The split makes post-startup registration unrepresentable: `build`
//! consumes the builder, and the codec only hands out shared read access.
//! Publication through `Arc` provides the happens-before edge between the
//! registration phase and the first concurrent read; serialize/deserialize
//! are pure, reentrant, and lock-free.
//!
//! ## Example
//! ```rust
//! use text_protocol::packets::client::Walk;
//! use text_protocol::{Direction, ProtocolCodec};
//!
//! let codec = ProtocolCodec::with_defaults()?;
//!
//! let wire = codec.serialize(&Walk { x: 12, y: 49, checksum: 1234, speed: 2 })?;
//! assert_eq!(wire, "walk 12 49 1234 2");
//!
//! let packet = codec.deserialize(&wire, Direction::Client)?;
//! assert_eq!(packet.as_any().downcast_ref::<Walk>().map(|w| w.y), Some(49));
//! # Ok::<(), text_protocol::ProtocolError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::convert::{Converter, ConverterRegistry};
use crate::error::{ProtocolError, Result};
use crate::packet::{AnyPacket, PacketRegistry, WirePacket};
use crate::schema::{CodecCx, Direction, FieldSpec, RecognizerChain, ValueShape};
use crate::wire::Tokenizer;

/// Builder for a [`ProtocolCodec`]; the single-threaded startup phase.
pub struct CodecBuilder {
    converters: ConverterRegistry,
    packets: PacketRegistry,
    chain: RecognizerChain,
}

impl Default for CodecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecBuilder {
    /// A builder with the primitive converters pre-registered and no
    /// packets.
    pub fn new() -> Self {
        Self {
            converters: ConverterRegistry::with_defaults(),
            packets: PacketRegistry::new(),
            chain: RecognizerChain::standard(),
        }
    }

    /// Bulk-register the built-in packet set and its enum converters.
    pub fn register_defaults(self) -> Result<Self> {
        crate::packets::register_builtins(self)
    }

    /// Register one packet type, compiling its codec immediately.
    pub fn register_packet<P: WirePacket>(mut self) -> Result<Self> {
        self.packets.register::<P>(&self.chain)?;
        Ok(self)
    }

    /// Register a converter for `T`; its `Option<T>` lift comes along.
    pub fn register_converter<T, C>(mut self, converter: C) -> Self
    where
        T: Send + Sync + 'static,
        C: Converter<T>,
    {
        self.converters.register::<T, C>(converter);
        self
    }

    /// Run the converter-coverage self-check and freeze the registries.
    ///
    /// Every `Registered` descriptor reachable from a registered packet
    /// definition (including nested records and list elements) is resolved
    /// here once, so a missing converter fails startup rather than traffic.
    pub fn build(self) -> Result<ProtocolCodec> {
        for entry in self.packets.entries() {
            check_converter_coverage(
                entry.definition.header,
                &entry.definition.fields,
                &self.converters,
            )?;
        }
        info!(
            packets = self.packets.len(),
            converters = self.converters.len(),
            "protocol codec initialized"
        );
        Ok(ProtocolCodec {
            converters: Arc::new(self.converters),
            packets: Arc::new(self.packets),
        })
    }
}

impl fmt::Debug for CodecBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecBuilder")
            .field("converters", &self.converters.len())
            .field("packets", &self.packets.len())
            .finish()
    }
}

fn check_converter_coverage(
    packet: &str,
    fields: &[FieldSpec],
    converters: &ConverterRegistry,
) -> Result<()> {
    for field in fields {
        check_shape(packet, field, &field.shape, converters)?;
    }
    Ok(())
}

fn check_shape(
    packet: &str,
    field: &FieldSpec,
    shape: &ValueShape,
    converters: &ConverterRegistry,
) -> Result<()> {
    match shape {
        ValueShape::Registered(descriptor) => converters
            .resolve_dyn(descriptor)
            .map(|_| ())
            .map_err(|e| e.in_field(packet, field.name, field.index)),
        ValueShape::List { element, .. } => check_shape(packet, field, element, converters),
        ValueShape::Record(def) => check_converter_coverage(def.name, &def.fields, converters),
        _ => Ok(()),
    }
}

/// The frozen codec: read-only registries behind `Arc`, shareable across
/// worker threads by cloning.
#[derive(Debug, Clone)]
pub struct ProtocolCodec {
    converters: Arc<ConverterRegistry>,
    packets: Arc<PacketRegistry>,
}

impl ProtocolCodec {
    pub fn builder() -> CodecBuilder {
        CodecBuilder::new()
    }

    /// A codec carrying the built-in packet set.
    pub fn with_defaults() -> Result<Self> {
        CodecBuilder::new().register_defaults()?.build()
    }

    /// Serialize a typed packet into its wire string.
    #[instrument(level = "debug", skip_all, fields(header = packet.header()))]
    pub fn serialize(&self, packet: &dyn AnyPacket) -> Result<String> {
        let entry = self.packets.resolve(packet.header(), packet.direction())?;
        let cx = CodecCx {
            converters: self.converters.as_ref(),
        };
        entry.codec.serialize(&packet.values(), &cx)
    }

    /// Deserialize a wire string received from `direction` into the typed
    /// packet its header resolves to.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownPacket`] for an unregistered header;
    /// otherwise any codec failure, tagged with the failing field. No
    /// partial packet is ever returned.
    #[instrument(level = "debug", skip_all, fields(direction = %direction))]
    pub fn deserialize(&self, wire: &str, direction: Direction) -> Result<Box<dyn AnyPacket>> {
        let (entry, rest) = match self.packets.resolve_wire(wire, direction) {
            Ok(resolved) => resolved,
            Err(err) => {
                if let ProtocolError::UnknownPacket { header, .. } = &err {
                    warn!(header = %header, direction = %direction, "unknown packet header");
                }
                return Err(err);
            }
        };
        let mut tokens = match rest {
            Some(rest) => Tokenizer::new(rest, entry.definition.separator),
            None => Tokenizer::drained(entry.definition.separator),
        };
        let cx = CodecCx {
            converters: self.converters.as_ref(),
        };
        let values = entry.codec.deserialize(&mut tokens, &cx)?;
        (entry.construct)(values)
    }

    /// Deserialize a wire string expected to be a `P`; the direction comes
    /// from `P`'s definition.
    pub fn deserialize_as<P: WirePacket>(&self, wire: &str) -> Result<P> {
        let packet = self.deserialize(wire, P::definition().direction)?;
        packet.into_any().downcast::<P>().map(|boxed| *boxed).map_err(|_| {
            ProtocolError::Definition(format!(
                "wire string resolved to a different packet than `{}`",
                std::any::type_name::<P>()
            ))
        })
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn packets(&self) -> &PacketRegistry {
        &self.packets
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::convert::TypeDescriptor;
    use crate::wire_packet;

    #[derive(Debug, Clone, PartialEq)]
    struct Medal(u8);

    wire_packet! {
        #[derive(Debug, Clone, PartialEq)]
        struct Award {
            header = "award",
            direction = Server,
            separator = ' ';
            0 => id: i64 [scalar],
            1 => medal: Medal [registered],
        }
    }

    #[test]
    fn build_fails_fast_on_missing_converters() {
        let err = CodecBuilder::new()
            .register_packet::<Award>()
            .unwrap()
            .build()
            .unwrap_err();
        match err.root_cause() {
            ProtocolError::NotRegistered { type_name } => {
                assert!(type_name.contains("Medal"));
            }
            other => panic!("expected NotRegistered, got {other:?}"),
        }
        match err {
            ProtocolError::Field { packet, field, .. } => {
                assert_eq!(packet, "award");
                assert_eq!(field, "medal");
            }
            other => panic!("expected Field tagging, got {other:?}"),
        }
    }

    #[test]
    fn registered_descriptor_matches_the_definition() {
        let def = Award::definition();
        match &def.fields[1].shape {
            ValueShape::Registered(descriptor) => {
                assert_eq!(descriptor, &TypeDescriptor::of::<Medal>());
            }
            other => panic!("expected registered shape, got {other:?}"),
        }
    }

    #[test]
    fn builder_and_dynamic_packets_are_debuggable() {
        let repr = format!("{:?}", CodecBuilder::new());
        assert!(repr.contains("CodecBuilder"));

        let codec = ProtocolCodec::with_defaults().unwrap();
        let packet = codec.deserialize("walk 1 2 3 4", Direction::Client).unwrap();
        assert!(format!("{packet:?}").contains("Walk"));
    }

    #[test]
    fn defaults_build_cleanly() {
        let codec = ProtocolCodec::with_defaults().unwrap();
        assert!(!codec.packets().is_empty());
        assert!(codec.converters().len() > 20);
    }
}
