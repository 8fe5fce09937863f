//! Client-originated built-in packets.

use serde::{Deserialize, Serialize};

use crate::wire_packet;

use super::types::{EntityKind, Gender, HairStyle};

wire_packet! {
    /// Keep-alive tick; the client emits one per interval and the server
    /// checks the counter for drift.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Pulse {
        header = "pulse",
        direction = Client,
        separator = ' ';
        0 => tick: u32 [scalar],
    }
}

wire_packet! {
    /// One movement step.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Walk {
        header = "walk",
        direction = Client,
        separator = ' ';
        0 => x: u16 [scalar],
        1 => y: u16 [scalar],
        2 => checksum: u32 [scalar],
        3 => speed: u8 [scalar],
    }
}

wire_packet! {
    /// Select a character slot at the character screen.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Select {
        header = "select",
        direction = Client,
        separator = ' ';
        0 => slot: u8 [scalar],
    }
}

wire_packet! {
    /// Create a character.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct CharNew {
        header = "Char_NEW",
        direction = Client,
        separator = ' ';
        0 => name: String [scalar],
        1 => slot: u8 [scalar],
        2 => gender: Gender [registered],
        3 => hair_style: HairStyle [registered],
        4 => hair_color: u8 [scalar],
    }
}

wire_packet! {
    /// Delete a character; the account password confirms intent.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct CharDel {
        header = "Char_DEL",
        direction = Client,
        separator = ' ';
        0 => slot: u8 [scalar],
        1 => password: String [scalar],
    }
}

wire_packet! {
    /// Request detail about a map entity.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Ncif {
        header = "ncif",
        direction = Client,
        separator = ' ';
        0 => kind: EntityKind [registered],
        1 => id: i64 [scalar],
    }
}
