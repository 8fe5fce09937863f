//! # Built-in Packet Set
//!
//! The packet vocabulary `register_defaults` installs: character-screen and
//! map-traffic packets in both directions, their nested records, and the
//! protocol enums. Everything here is declared with
//! [`wire_packet!`](crate::wire_packet), [`wire_record!`](crate::wire_record)
//! and [`wire_enum!`](crate::wire_enum); there is no hand-written codec code
//! in this module.
//!
//! The enums go through the converter repository's fallback tier, so the
//! extensible path is exercised by production traffic, not just by
//! consumer-defined types.

pub mod client;
pub mod server;
pub mod types;

pub use client::{CharDel, CharNew, Ncif, Pulse, Select, Walk};
pub use server::{At, CharacterList, Cond, EquipmentSlots, ItemSlot, Ivn, Mv, PetSlot, St};
pub use types::{CharacterClass, EntityKind, Gender, HairStyle};

use crate::codec::CodecBuilder;
use crate::convert::EnumConverter;
use crate::error::Result;

/// Install the built-in enum converters and packet codecs.
pub(crate) fn register_builtins(builder: CodecBuilder) -> Result<CodecBuilder> {
    builder
        .register_converter::<Gender, _>(EnumConverter::new())
        .register_converter::<HairStyle, _>(EnumConverter::new())
        .register_converter::<CharacterClass, _>(EnumConverter::new())
        .register_converter::<EntityKind, _>(EnumConverter::new())
        .register_packet::<Pulse>()?
        .register_packet::<Walk>()?
        .register_packet::<Select>()?
        .register_packet::<CharNew>()?
        .register_packet::<CharDel>()?
        .register_packet::<Ncif>()?
        .register_packet::<CharacterList>()?
        .register_packet::<At>()?
        .register_packet::<Mv>()?
        .register_packet::<Cond>()?
        .register_packet::<St>()?
        .register_packet::<Ivn>()
}
