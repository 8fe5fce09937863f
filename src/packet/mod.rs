//! # Typed Packets
//!
//! The trait surface packet types implement and the registry that maps
//! (header keyword, direction) pairs to their generated codecs.
//!
//! [`WirePacket`] is implemented by the [`wire_packet!`](crate::wire_packet)
//! macro; [`AnyPacket`] is its object-safe face, blanket-implemented for
//! every `WirePacket`, and is what deserialization hands back to callers who
//! only know the direction a wire string arrived from.

pub mod registry;

pub use registry::{PacketRegistry, RegisteredPacket};

use std::any::Any;
use std::fmt;

use crate::error::Result;
use crate::schema::{Direction, FieldValue, PacketDefinition};

/// A packet type with a static definition and value glue.
///
/// Implemented by [`wire_packet!`](crate::wire_packet); hand implementations
/// must keep `to_values`/`from_values` aligned with the definition's field
/// order, which the generated codec consumes positionally.
pub trait WirePacket: Sized + Send + Sync + fmt::Debug + 'static {
    fn definition() -> &'static PacketDefinition;

    /// Field values in index order.
    fn to_values(&self) -> Vec<FieldValue>;

    /// Rebuild from field values in index order; all-or-nothing.
    fn from_values(values: Vec<FieldValue>) -> Result<Self>;
}

/// Object-safe face of [`WirePacket`].
///
/// Deserialization returns `Box<dyn AnyPacket>`; callers inspect the header
/// and downcast through [`AnyPacket::as_any`] once they know the type.
pub trait AnyPacket: Send + Sync + fmt::Debug + 'static {
    fn header(&self) -> &'static str;

    fn direction(&self) -> Direction;

    /// Field values in index order, for the generated serializer.
    fn values(&self) -> Vec<FieldValue>;

    fn as_any(&self) -> &(dyn Any + Send + Sync);

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<P: WirePacket> AnyPacket for P {
    fn header(&self) -> &'static str {
        P::definition().header
    }

    fn direction(&self) -> Direction {
        P::definition().direction
    }

    fn values(&self) -> Vec<FieldValue> {
        self.to_values()
    }

    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}
