//! # Packet Registry
//!
//! Maps a (header keyword, direction) pair to a packet type's generated
//! codec. Lookup is case- and direction-sensitive: the same keyword may
//! denote different shapes for client- and server-originated traffic.
//!
//! Populated during the builder phase; [`crate::codec::ProtocolCodec`] holds
//! it behind `Arc` afterward, so reads are unsynchronized.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::schema::{Direction, FieldValue, GeneratedCodec, PacketDefinition, RecognizerChain};

use super::{AnyPacket, WirePacket};

/// One registered packet type: its definition, its compiled codec, and the
/// constructor that turns deserialized field values back into the typed
/// instance.
pub struct RegisteredPacket {
    pub definition: &'static PacketDefinition,
    pub codec: GeneratedCodec,
    pub(crate) construct: fn(Vec<FieldValue>) -> Result<Box<dyn AnyPacket>>,
}

fn construct_boxed<P: WirePacket>(values: Vec<FieldValue>) -> Result<Box<dyn AnyPacket>> {
    P::from_values(values).map(|packet| Box::new(packet) as Box<dyn AnyPacket>)
}

/// Registry of generated codecs, keyed by (header, direction) and by the
/// packet's concrete type.
#[derive(Default)]
pub struct PacketRegistry {
    client: HashMap<&'static str, Arc<RegisteredPacket>>,
    server: HashMap<&'static str, Arc<RegisteredPacket>>,
    by_type: HashMap<TypeId, Arc<RegisteredPacket>>,
}

impl PacketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, direction: Direction) -> &HashMap<&'static str, Arc<RegisteredPacket>> {
        match direction {
            Direction::Client => &self.client,
            Direction::Server => &self.server,
        }
    }

    /// Validate `P`'s definition, compile its codec through `chain`, and
    /// install it.
    ///
    /// # Errors
    /// [`ProtocolError::DuplicatePacket`] when the (header, direction) pair
    /// is already taken; [`ProtocolError::Definition`] when the definition
    /// fails validation or generation.
    pub fn register<P: WirePacket>(&mut self, chain: &RecognizerChain) -> Result<()> {
        let definition = P::definition();
        if self.map(definition.direction).contains_key(definition.header) {
            return Err(ProtocolError::DuplicatePacket {
                header: definition.header.to_string(),
                direction: definition.direction,
            });
        }
        let codec = chain.generate(definition)?;
        let entry = Arc::new(RegisteredPacket {
            definition,
            codec,
            construct: construct_boxed::<P>,
        });
        debug!(
            header = definition.header,
            direction = %definition.direction,
            packet = std::any::type_name::<P>(),
            "registered packet codec"
        );
        let map = match definition.direction {
            Direction::Client => &mut self.client,
            Direction::Server => &mut self.server,
        };
        map.insert(definition.header, entry.clone());
        self.by_type.insert(TypeId::of::<P>(), entry);
        Ok(())
    }

    /// Resolve a codec by exact header keyword and direction.
    pub fn resolve(&self, header: &str, direction: Direction) -> Result<&Arc<RegisteredPacket>> {
        self.map(direction)
            .get(header)
            .ok_or_else(|| ProtocolError::UnknownPacket {
                header: header.to_string(),
                direction,
            })
    }

    /// Resolve a codec from a full wire string: locate the header keyword
    /// and return the entry plus the remainder after the header (or `None`
    /// when the wire string ends at the header).
    ///
    /// The common case splits the header on a space; definitions with a
    /// different separator are matched on the slower prefix path.
    pub fn resolve_wire<'w>(
        &self,
        wire: &'w str,
        direction: Direction,
    ) -> Result<(&Arc<RegisteredPacket>, Option<&'w str>)> {
        let map = self.map(direction);
        let candidate = wire.split(' ').next().unwrap_or(wire);
        let entry = map
            .get(candidate)
            .filter(|entry| {
                // The space split only proves a space follows the keyword;
                // the definition may declare a different separator.
                entry.definition.separator == ' '
                    || wire.len() == entry.definition.header.len()
            })
            .or_else(|| {
                map.values().find(|entry| {
                    let header = entry.definition.header;
                    wire.starts_with(header)
                        && wire[header.len()..]
                            .chars()
                            .next()
                            .is_some_and(|c| c == entry.definition.separator)
                })
            });
        let entry = entry.ok_or_else(|| ProtocolError::UnknownPacket {
            header: candidate.to_string(),
            direction,
        })?;
        let header_len = entry.definition.header.len();
        let rest = if wire.len() > header_len {
            Some(&wire[header_len + entry.definition.separator.len_utf8()..])
        } else {
            None
        };
        Ok((entry, rest))
    }

    pub fn resolve_type(&self, id: TypeId) -> Option<&Arc<RegisteredPacket>> {
        self.by_type.get(&id)
    }

    /// Every registered entry, in arbitrary order.
    pub fn entries(&self) -> impl Iterator<Item = &Arc<RegisteredPacket>> {
        self.by_type.values()
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl fmt::Debug for PacketRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketRegistry")
            .field("client", &self.client.len())
            .field("server", &self.server.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::wire_packet;

    wire_packet! {
        #[derive(Debug, Clone, PartialEq)]
        struct Step {
            header = "step",
            direction = Client,
            separator = ' ';
            0 => x: u16 [scalar],
            1 => y: u16 [scalar],
        }
    }

    wire_packet! {
        #[derive(Debug, Clone, PartialEq)]
        struct ServerStep {
            header = "step",
            direction = Server,
            separator = ' ';
            0 => id: i64 [scalar],
        }
    }

    wire_packet! {
        #[derive(Debug, Clone, PartialEq)]
        struct Trade {
            header = "trade",
            direction = Client,
            separator = '^';
            0 => id: i64 [scalar],
        }
    }

    #[test]
    fn same_header_may_register_per_direction() {
        let chain = RecognizerChain::standard();
        let mut registry = PacketRegistry::new();
        registry.register::<Step>(&chain).unwrap();
        registry.register::<ServerStep>(&chain).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.resolve("step", Direction::Client).unwrap().definition.fields.len(),
            2
        );
        assert_eq!(
            registry.resolve("step", Direction::Server).unwrap().definition.fields.len(),
            1
        );
    }

    #[test]
    fn duplicate_registration_is_an_error() {
        let chain = RecognizerChain::standard();
        let mut registry = PacketRegistry::new();
        registry.register::<Step>(&chain).unwrap();
        match registry.register::<Step>(&chain) {
            Err(ProtocolError::DuplicatePacket { header, direction }) => {
                assert_eq!(header, "step");
                assert_eq!(direction, Direction::Client);
            }
            other => panic!("expected DuplicatePacket, got {other:?}"),
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let chain = RecognizerChain::standard();
        let mut registry = PacketRegistry::new();
        registry.register::<Step>(&chain).unwrap();
        assert!(registry.resolve("Step", Direction::Client).is_err());
    }

    #[test]
    fn resolve_wire_returns_the_remainder() {
        let chain = RecognizerChain::standard();
        let mut registry = PacketRegistry::new();
        registry.register::<Step>(&chain).unwrap();

        let (entry, rest) = registry.resolve_wire("step 12 49", Direction::Client).unwrap();
        assert_eq!(entry.definition.header, "step");
        assert_eq!(rest, Some("12 49"));

        let (_, rest) = registry.resolve_wire("step", Direction::Client).unwrap();
        assert_eq!(rest, None);

        assert!(registry.resolve_wire("walk 1 2", Direction::Client).is_err());
    }

    #[test]
    fn resolve_wire_honors_the_declared_separator() {
        let chain = RecognizerChain::standard();
        let mut registry = PacketRegistry::new();
        registry.register::<Trade>(&chain).unwrap();

        let (entry, rest) = registry.resolve_wire("trade^77", Direction::Client).unwrap();
        assert_eq!(entry.definition.header, "trade");
        assert_eq!(rest, Some("77"));

        let (_, rest) = registry.resolve_wire("trade", Direction::Client).unwrap();
        assert_eq!(rest, None);

        // A space after the keyword is not this packet's separator.
        assert!(matches!(
            registry.resolve_wire("trade 77", Direction::Client),
            Err(ProtocolError::UnknownPacket { .. })
        ));
    }
}
