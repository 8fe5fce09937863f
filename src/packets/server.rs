//! Server-originated built-in packets.

use serde::{Deserialize, Serialize};

use crate::{wire_packet, wire_record};

use super::types::{CharacterClass, EntityKind, Gender, HairStyle};

wire_record! {
    /// The eight visible equipment slots. Empty slots carry `-1` as a plain
    /// value; the codec does not interpret it.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct EquipmentSlots {
        0 => hat: i32 [scalar],
        1 => armor: i32 [scalar],
        2 => main_weapon: i32 [scalar],
        3 => secondary_weapon: i32 [scalar],
        4 => mask: i32 [scalar],
        5 => fashion: i32 [scalar],
        6 => costume_suit: i32 [scalar],
        7 => costume_hat: i32 [scalar],
    }
}

impl EquipmentSlots {
    /// All slots empty.
    pub fn empty() -> Self {
        Self {
            hat: -1,
            armor: -1,
            main_weapon: -1,
            secondary_weapon: -1,
            mask: -1,
            fashion: -1,
            costume_suit: -1,
            costume_hat: -1,
        }
    }
}

wire_record! {
    /// One pet roster slot; both fields are null for an empty slot.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PetSlot {
        0 => vnum: Option<i32> [nullable(i32)],
        1 => skin: Option<i32> [nullable(i32)],
    }
}

impl PetSlot {
    pub fn empty() -> Self {
        Self { vnum: None, skin: None }
    }
}

wire_record! {
    /// One inventory item stack.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ItemSlot {
        0 => slot: u8 [scalar],
        1 => vnum: i64 [scalar],
        2 => amount: u16 [scalar],
        3 => rare: i8 [scalar],
        4 => upgrade: u8 [scalar],
    }
}

/// Pet roster length of [`CharacterList`].
pub const PET_SLOTS: usize = 17;

wire_packet! {
    /// One character-screen roster entry: 19 ordered fields, a nested
    /// equipment record, and a fixed 17-slot pet list whose elements occupy
    /// their own top-level tokens. The `title` field may be empty, which
    /// legitimately produces two adjacent spaces on the wire.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct CharacterList {
        header = "clist",
        direction = Server,
        separator = ' ';
        0 => slot: u8 [scalar],
        1 => name: String [scalar],
        2 => gender: Gender [registered],
        3 => hair_style: HairStyle [registered],
        4 => hair_color: u8 [scalar],
        5 => reputation: u16 [scalar],
        6 => class: CharacterClass [registered],
        7 => level: u8 [scalar],
        8 => job_level: u8 [scalar],
        9 => hero_level: u8 [scalar],
        10 => equipment: EquipmentSlots [record, inner = '.'],
        11 => act_points: u16 [scalar],
        12 => title: String [scalar],
        13 => equipment_visible: bool [scalar],
        14 => arena_winner: bool [scalar],
        15 => pets: Vec<PetSlot> [list(record PetSlot, fixed = 17, sep = ' ', inner = '.')],
        16 => design: u8 [scalar],
        17 => locked: bool [scalar],
        18 => rename_pending: bool [scalar],
    }
}

wire_packet! {
    /// Camera/position sync after a map change.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct At {
        header = "at",
        direction = Server,
        separator = ' ';
        0 => id: i64 [scalar],
        1 => map: u16 [scalar],
        2 => x: u16 [scalar],
        3 => y: u16 [scalar],
        4 => facing: u8 [scalar],
        5 => music: u16 [scalar],
    }
}

wire_packet! {
    /// An entity moved.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Mv {
        header = "mv",
        direction = Server,
        separator = ' ';
        0 => kind: EntityKind [registered],
        1 => id: i64 [scalar],
        2 => x: u16 [scalar],
        3 => y: u16 [scalar],
        4 => speed: u8 [scalar],
    }
}

wire_packet! {
    /// Action constraints on an entity.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Cond {
        header = "cond",
        direction = Server,
        separator = ' ';
        0 => kind: EntityKind [registered],
        1 => id: i64 [scalar],
        2 => no_attack: bool [scalar],
        3 => no_move: bool [scalar],
        4 => speed: u8 [scalar],
    }
}

wire_packet! {
    /// Entity status: nullable vitals plus a variable-length buff-id list.
    /// Unknown vitals serialize as the sentinel; an empty buff list is an
    /// empty trailing token.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct St {
        header = "st",
        direction = Server,
        separator = ' ';
        0 => kind: EntityKind [registered],
        1 => id: i64 [scalar],
        2 => level: u8 [scalar],
        3 => hp_percent: Option<u8> [nullable(u8)],
        4 => mp_percent: Option<u8> [nullable(u8)],
        5 => buffs: Vec<u16> [list(scalar u16, delimited, sep = '.')],
    }
}

wire_packet! {
    /// One inventory slot update with its nested item record.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Ivn {
        header = "ivn",
        direction = Server,
        separator = ' ';
        0 => bag: u8 [scalar],
        1 => item: ItemSlot [record, inner = '.'],
    }
}
