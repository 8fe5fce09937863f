#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Round-trip and wire-layout tests for the built-in packet set, including
//! the canonical `clist` character-roster literal.

use std::sync::OnceLock;

use text_protocol::packets::client::{CharNew, Pulse, Walk};
use text_protocol::packets::server::{
    At, CharacterList, EquipmentSlots, ItemSlot, Ivn, PetSlot, St, PET_SLOTS,
};
use text_protocol::packets::types::{CharacterClass, EntityKind, Gender, HairStyle};
use text_protocol::{Direction, ProtocolCodec, ProtocolError};

fn codec() -> &'static ProtocolCodec {
    static CODEC: OnceLock<ProtocolCodec> = OnceLock::new();
    CODEC.get_or_init(|| ProtocolCodec::with_defaults().expect("default codec builds"))
}

/// The worked roster example: two occupied pet slots, fifteen empty ones,
/// an empty title (the doubled space), and a part-empty equipment record.
fn sample_clist() -> CharacterList {
    let mut pets = vec![
        PetSlot { vnum: Some(0), skin: Some(2105) },
        PetSlot { vnum: Some(0), skin: Some(319) },
    ];
    pets.resize(PET_SLOTS, PetSlot::empty());
    CharacterList {
        slot: 1,
        name: "derfy".to_string(),
        gender: Gender::Male,
        hair_style: HairStyle::StyleB,
        hair_color: 0,
        reputation: 106,
        class: CharacterClass::Adventurer,
        level: 2,
        job_level: 99,
        hero_level: 80,
        equipment: EquipmentSlots {
            hat: -1,
            armor: -1,
            main_weapon: 4452,
            secondary_weapon: 4468,
            mask: 4840,
            fashion: 4131,
            costume_suit: -1,
            costume_hat: -1,
        },
        act_points: 99,
        title: String::new(),
        equipment_visible: true,
        arena_winner: true,
        pets,
        design: 0,
        locked: false,
        rename_pending: false,
    }
}

const CLIST_WIRE: &str = "clist 1 derfy 0 1 0 106 0 2 99 80 \
    -1.-1.4452.4468.4840.4131.-1.-1 99  1 1 0.2105 0.319 \
    -.- -.- -.- -.- -.- -.- -.- -.- -.- -.- -.- -.- -.- -.- -.- 0 0 0";

// ============================================================================
// ROUND TRIP
// ============================================================================

#[test]
fn walk_round_trips() {
    let walk = Walk { x: 12, y: 49, checksum: 1234, speed: 2 };
    let wire = codec().serialize(&walk).unwrap();
    assert_eq!(wire, "walk 12 49 1234 2");
    assert_eq!(codec().deserialize_as::<Walk>(&wire).unwrap(), walk);
}

#[test]
fn char_new_round_trips_through_enum_converters() {
    let packet = CharNew {
        name: "derfy".to_string(),
        slot: 2,
        gender: Gender::Female,
        hair_style: HairStyle::StyleD,
        hair_color: 7,
    };
    let wire = codec().serialize(&packet).unwrap();
    assert_eq!(wire, "Char_NEW derfy 2 1 3 7");
    assert_eq!(codec().deserialize_as::<CharNew>(&wire).unwrap(), packet);
}

#[test]
fn st_round_trips_with_nullables_and_list() {
    let st = St {
        kind: EntityKind::Monster,
        id: 143,
        level: 10,
        hp_percent: Some(85),
        mp_percent: None,
        buffs: vec![12, 53, 103],
    };
    let wire = codec().serialize(&st).unwrap();
    assert_eq!(wire, "st 3 143 10 85 - 12.53.103");
    assert_eq!(codec().deserialize_as::<St>(&wire).unwrap(), st);
}

#[test]
fn ivn_round_trips_through_the_nested_record() {
    let ivn = Ivn {
        bag: 0,
        item: ItemSlot { slot: 5, vnum: 1012, amount: 3, rare: 0, upgrade: 5 },
    };
    let wire = codec().serialize(&ivn).unwrap();
    assert_eq!(wire, "ivn 0 5.1012.3.0.5");
    assert_eq!(codec().deserialize_as::<Ivn>(&wire).unwrap(), ivn);
}

#[test]
fn header_only_packet_round_trips() {
    let pulse = Pulse { tick: 60 };
    let wire = codec().serialize(&pulse).unwrap();
    assert_eq!(wire, "pulse 60");
    assert_eq!(codec().deserialize_as::<Pulse>(&wire).unwrap(), pulse);
}

#[test]
fn dynamic_deserialize_returns_the_typed_instance() {
    let packet = codec().deserialize("at 9001 1 80 116 2 0", Direction::Server).unwrap();
    assert_eq!(packet.header(), "at");
    let at = packet.as_any().downcast_ref::<At>().unwrap();
    assert_eq!(at.map, 1);
    assert_eq!(at.x, 80);
}

// ============================================================================
// CANONICAL CLIST LITERAL
// ============================================================================

#[test]
fn clist_serializes_to_the_canonical_literal() {
    let wire = codec().serialize(&sample_clist()).unwrap();
    assert_eq!(wire, CLIST_WIRE);
    // The empty title between act points and the visibility flag yields two
    // adjacent spaces.
    assert!(wire.contains("99  1"));
}

#[test]
fn clist_deserializes_from_the_canonical_literal() {
    let roster = codec().deserialize_as::<CharacterList>(CLIST_WIRE).unwrap();
    assert_eq!(roster, sample_clist());
    assert_eq!(roster.title, "");
    assert_eq!(roster.pets.len(), PET_SLOTS);
    assert_eq!(roster.pets[1].skin, Some(319));
    assert_eq!(roster.pets[2], PetSlot::empty());
    assert_eq!(roster.equipment.main_weapon, 4452);
}

// ============================================================================
// SENTINEL SYMMETRY
// ============================================================================

#[test]
fn null_vitals_always_render_the_sentinel() {
    let st = St {
        kind: EntityKind::Character,
        id: 1,
        level: 99,
        hp_percent: None,
        mp_percent: None,
        buffs: vec![],
    };
    let wire = codec().serialize(&st).unwrap();
    assert_eq!(wire, "st 1 1 99 - - ");

    let back = codec().deserialize_as::<St>(&wire).unwrap();
    assert_eq!(back.hp_percent, None);
    assert_eq!(back.mp_percent, None);
    assert!(back.buffs.is_empty());
}

#[test]
fn empty_string_is_not_null() {
    let mut roster = sample_clist();
    roster.title = String::new();
    let wire = codec().serialize(&roster).unwrap();
    let back = codec().deserialize_as::<CharacterList>(&wire).unwrap();
    // Present-but-empty, never collapsed into a sentinel.
    assert_eq!(back.title, "");
    assert!(!wire.contains(" - 1 1 "));
}

// ============================================================================
// LIST ELEMENT COUNT PRESERVATION
// ============================================================================

#[test]
fn buff_list_preserves_count_and_order() {
    for count in [0usize, 1, 5, 16] {
        let st = St {
            kind: EntityKind::Npc,
            id: 7,
            level: 1,
            hp_percent: Some(100),
            mp_percent: Some(100),
            buffs: (0..count as u16).collect(),
        };
        let wire = codec().serialize(&st).unwrap();
        let back = codec().deserialize_as::<St>(&wire).unwrap();
        assert_eq!(back.buffs, st.buffs, "count {count}");
    }
}

#[test]
fn pet_roster_preserves_null_valued_elements() {
    let roster = sample_clist();
    let wire = codec().serialize(&roster).unwrap();
    let back = codec().deserialize_as::<CharacterList>(&wire).unwrap();
    assert_eq!(back.pets.len(), roster.pets.len());
    assert_eq!(back.pets, roster.pets);
}

#[test]
fn wrong_fixed_list_arity_fails_serialization() {
    let mut roster = sample_clist();
    roster.pets.pop();
    let err = codec().serialize(&roster).unwrap_err();
    assert!(matches!(err.root_cause(), ProtocolError::Definition(_)));
}

// ============================================================================
// UNKNOWN HEADER REJECTION
// ============================================================================

#[test]
fn unknown_header_is_rejected() {
    match codec().deserialize("frob 1 2 3", Direction::Client) {
        Err(ProtocolError::UnknownPacket { header, direction }) => {
            assert_eq!(header, "frob");
            assert_eq!(direction, Direction::Client);
        }
        other => panic!("expected UnknownPacket, got {other:?}"),
    }
}

#[test]
fn header_lookup_is_direction_sensitive() {
    // `clist` is server-originated; the client direction must not resolve it.
    assert!(matches!(
        codec().deserialize(CLIST_WIRE, Direction::Client),
        Err(ProtocolError::UnknownPacket { .. })
    ));
    assert!(matches!(
        codec().deserialize("walk 12 49 1234 2", Direction::Server),
        Err(ProtocolError::UnknownPacket { .. })
    ));
}

#[test]
fn header_matching_is_case_sensitive() {
    assert!(matches!(
        codec().deserialize("WALK 12 49 1234 2", Direction::Client),
        Err(ProtocolError::UnknownPacket { .. })
    ));
}

// ============================================================================
// INSUFFICIENT TOKENS
// ============================================================================

#[test]
fn truncated_wire_string_reports_exhaustion() {
    let err = codec().deserialize("walk 12 49", Direction::Client).unwrap_err();
    match err {
        ProtocolError::Field { ref field, index, ref source, .. } => {
            assert_eq!(field, "checksum");
            assert_eq!(index, 2);
            assert!(matches!(**source, ProtocolError::NoMoreTokens { .. }));
        }
        other => panic!("expected Field-tagged exhaustion, got {other:?}"),
    }
}

#[test]
fn header_alone_reports_exhaustion_not_defaults() {
    let err = codec().deserialize("walk", Direction::Client).unwrap_err();
    assert!(matches!(err.root_cause(), ProtocolError::NoMoreTokens { .. }));
}

#[test]
fn malformed_token_reports_the_converter() {
    let err = codec().deserialize("walk twelve 49 1234 2", Direction::Client).unwrap_err();
    match err.root_cause() {
        ProtocolError::CouldNotConvert { token, converter } => {
            assert_eq!(token, "twelve");
            assert_eq!(converter, "u16");
        }
        other => panic!("expected CouldNotConvert, got {other:?}"),
    }
}

// ============================================================================
// SERDE SURFACE
// ============================================================================

#[test]
fn packets_are_serde_serializable_for_host_logging() {
    let json = serde_json::to_string(&sample_clist()).unwrap();
    assert!(json.contains("\"name\":\"derfy\""));
    let back: CharacterList = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sample_clist());
}
