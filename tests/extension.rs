#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Extension-path tests: consumer-defined packets, records, enums, and
//! converters registered from outside the crate, resolved through the
//! fallback tier.

use text_protocol::convert::{Converter, EnumConverter};
use text_protocol::error::{ProtocolError, Result};
use text_protocol::packets::client::Walk;
use text_protocol::{wire_enum, wire_packet, wire_record, CodecBuilder, Direction, ProtocolCodec};

// ============================================================================
// CONSUMER-DEFINED TYPES
// ============================================================================

/// An RGB color with a comma-joined wire form, deliberately unlike any
/// built-in converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Color {
    r: u8,
    g: u8,
    b: u8,
}

struct ColorConverter;

impl Converter<Color> for ColorConverter {
    fn name(&self) -> &str {
        "Color"
    }

    fn serialize(&self, value: &Color) -> Result<String> {
        Ok(format!("{},{},{}", value.r, value.g, value.b))
    }

    fn deserialize(&self, text: &str) -> Result<Color> {
        let fail = || ProtocolError::CouldNotConvert {
            token: text.to_string(),
            converter: "Color".to_string(),
        };
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != 3 {
            return Err(fail());
        }
        let channel = |part: &str| part.parse::<u8>().map_err(|_| fail());
        Ok(Color {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
        })
    }
}

wire_enum! {
    enum AuraShape {
        Ring = 0,
        Wings = 1,
        Flame = 2,
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct AuraLayer {
        0 => intensity: u8 [scalar],
        1 => color: Color [registered],
    }
}

wire_packet! {
    #[derive(Debug, Clone, PartialEq)]
    struct SetAura {
        header = "aura",
        direction = Client,
        separator = ' ';
        0 => id: i64 [scalar],
        1 => shape: AuraShape [registered],
        2 => color: Color [registered],
        3 => fade: Option<Color> [registered],
        4 => layers: Vec<AuraLayer> [list(record AuraLayer, delimited, sep = '^', inner = '.')],
    }
}

fn extended_codec() -> ProtocolCodec {
    CodecBuilder::new()
        .register_defaults()
        .unwrap()
        .register_converter::<Color, _>(ColorConverter)
        .register_converter::<AuraShape, _>(EnumConverter::new())
        .register_packet::<SetAura>()
        .unwrap()
        .build()
        .unwrap()
}

fn sample_aura() -> SetAura {
    SetAura {
        id: 9001,
        shape: AuraShape::Wings,
        color: Color { r: 255, g: 64, b: 0 },
        fade: None,
        layers: vec![
            AuraLayer { intensity: 3, color: Color { r: 10, g: 20, b: 30 } },
            AuraLayer { intensity: 1, color: Color { r: 0, g: 0, b: 0 } },
        ],
    }
}

// ============================================================================
// EXTENSION ROUND TRIP
// ============================================================================

#[test]
fn consumer_packet_round_trips_through_the_fallback_tier() {
    let codec = extended_codec();
    let aura = sample_aura();
    let wire = codec.serialize(&aura).unwrap();
    assert_eq!(wire, "aura 9001 1 255,64,0 - 3.10,20,30^1.0,0,0");
    assert_eq!(codec.deserialize_as::<SetAura>(&wire).unwrap(), aura);
}

#[test]
fn nullable_consumer_type_needs_no_separate_registration() {
    let codec = extended_codec();
    let mut aura = sample_aura();
    aura.fade = Some(Color { r: 1, g: 2, b: 3 });
    let wire = codec.serialize(&aura).unwrap();
    assert!(wire.contains(" 1,2,3 "));
    let back = codec.deserialize_as::<SetAura>(&wire).unwrap();
    assert_eq!(back.fade, Some(Color { r: 1, g: 2, b: 3 }));
}

#[test]
fn builtin_packets_survive_extension() {
    let codec = extended_codec();
    let walk = Walk { x: 1, y: 2, checksum: 3, speed: 4 };
    let wire = codec.serialize(&walk).unwrap();
    assert_eq!(codec.deserialize_as::<Walk>(&wire).unwrap(), walk);
}

#[test]
fn malformed_consumer_token_reports_the_consumer_converter() {
    let codec = extended_codec();
    let err = codec
        .deserialize("aura 1 0 255,64 - ", Direction::Client)
        .unwrap_err();
    match err.root_cause() {
        ProtocolError::CouldNotConvert { token, converter } => {
            assert_eq!(token, "255,64");
            assert_eq!(converter, "Color");
        }
        other => panic!("expected CouldNotConvert, got {other:?}"),
    }
}

// ============================================================================
// STARTUP SELF-CHECK
// ============================================================================

#[test]
fn missing_consumer_converter_fails_at_build_not_traffic() {
    let err = CodecBuilder::new()
        .register_packet::<SetAura>()
        .unwrap()
        .build()
        .unwrap_err();
    match err.root_cause() {
        ProtocolError::NotRegistered { type_name } => {
            assert!(type_name.contains("Color") || type_name.contains("AuraShape"));
        }
        other => panic!("expected NotRegistered, got {other:?}"),
    }
}

#[test]
fn duplicate_header_registration_is_rejected() {
    let err = CodecBuilder::new()
        .register_defaults()
        .unwrap()
        .register_packet::<Walk>()
        .unwrap_err();
    match err {
        ProtocolError::DuplicatePacket { header, direction } => {
            assert_eq!(header, "walk");
            assert_eq!(direction, Direction::Client);
        }
        other => panic!("expected DuplicatePacket, got {other:?}"),
    }
}
