//! Protocol enumerations shared by the built-in packet set.
//!
//! All of these travel as their ordinal and are resolved through the
//! converter repository's fallback tier, so they exercise the same path
//! consumer-defined types use.

use serde::{Deserialize, Serialize};

use crate::wire_enum;

wire_enum! {
    /// Character gender.
    #[derive(Serialize, Deserialize)]
    pub enum Gender {
        Male = 0,
        Female = 1,
    }
}

wire_enum! {
    /// Character hair style.
    #[derive(Serialize, Deserialize)]
    pub enum HairStyle {
        StyleA = 0,
        StyleB = 1,
        StyleC = 2,
        StyleD = 3,
    }
}

wire_enum! {
    /// Character class.
    #[derive(Serialize, Deserialize)]
    pub enum CharacterClass {
        Adventurer = 0,
        Swordsman = 1,
        Archer = 2,
        Mage = 3,
    }
}

wire_enum! {
    /// What kind of map entity a packet refers to.
    #[derive(Serialize, Deserialize)]
    pub enum EntityKind {
        Character = 1,
        Npc = 2,
        Monster = 3,
        Object = 9,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::convert::{Converter, EnumConverter, WireEnum};

    #[test]
    fn ordinals_are_stable() {
        assert_eq!(Gender::Female.to_ordinal(), 1);
        assert_eq!(EntityKind::Object.to_ordinal(), 9);
        assert_eq!(EntityKind::from_ordinal(3), Some(EntityKind::Monster));
        assert_eq!(EntityKind::from_ordinal(4), None);
    }

    #[test]
    fn converters_carry_the_enum_name() {
        let conv = EnumConverter::<CharacterClass>::new();
        assert_eq!(conv.name(), "CharacterClass");
        assert_eq!(conv.serialize(&CharacterClass::Mage).unwrap(), "3");
    }
}
