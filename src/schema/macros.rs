//! Declarative packet and record macros.
//!
//! [`wire_packet!`](crate::wire_packet) and
//! [`wire_record!`](crate::wire_record) emit, from a single declaration, the
//! plain struct, its static definition table (behind
//! `once_cell::sync::Lazy`), and the value glue that crosses between the
//! struct and the generated codec's [`FieldValue`](super::FieldValue)
//! envelopes. Field shapes are written in brackets after the field type:
//!
//! ```rust
//! use text_protocol::{wire_packet, wire_record};
//!
//! wire_record! {
//!     #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
//!     pub struct MateSlot {
//!         0 => vnum: Option<i32> [nullable(i32)],
//!         1 => level: Option<i32> [nullable(i32)],
//!     }
//! }
//!
//! wire_packet! {
//!     #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
//!     pub struct MateList {
//!         header = "sclist",
//!         direction = Server,
//!         separator = ' ';
//!         0 => owner: i64 [scalar],
//!         1 => mates: Vec<MateSlot> [list(record MateSlot, delimited, sep = '^', inner = '.')],
//!     }
//! }
//! ```
//!
//! Shape forms: `[scalar]`, `[nullable(T)]`, `[registered]`,
//! `[record, inner = '.']`, `[list(record E, fixed = N, sep = ' ', inner = '.')]`,
//! `[list(record E, delimited, sep = '^', inner = '.')]`,
//! `[list(scalar E, fixed = N, sep = ' ')]`, `[list(scalar E, delimited, sep = '.')]`.

/// Declares a packet type: the struct, its [`PacketDefinition`](super::PacketDefinition),
/// and its [`WirePacket`](crate::packet::WirePacket) glue.
#[macro_export]
macro_rules! wire_packet {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            header = $header:literal,
            direction = $direction:ident,
            separator = $separator:literal;
            $( $index:literal => $field:ident : $fty:ty [ $($shape:tt)+ ] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( pub $field: $fty, )+
        }

        impl $crate::packet::WirePacket for $name {
            fn definition() -> &'static $crate::schema::PacketDefinition {
                static DEFINITION: $crate::once_cell::sync::Lazy<$crate::schema::PacketDefinition> =
                    $crate::once_cell::sync::Lazy::new(|| $crate::schema::PacketDefinition {
                        header: $header,
                        direction: $crate::schema::Direction::$direction,
                        separator: $separator,
                        fields: vec![
                            $( $crate::__wire_field!($index, stringify!($field), $fty, [ $($shape)+ ]) ),+
                        ],
                    });
                &DEFINITION
            }

            fn to_values(&self) -> Vec<$crate::schema::FieldValue> {
                vec![ $( $crate::__wire_to_value!(&self.$field, [ $($shape)+ ]) ),+ ]
            }

            fn from_values(values: Vec<$crate::schema::FieldValue>) -> $crate::error::Result<Self> {
                let mut values = values.into_iter();
                Ok(Self {
                    $(
                        $field: $crate::__wire_from_value!(
                            $crate::__wire_next_value!(values, $field),
                            stringify!($field),
                            $fty,
                            [ $($shape)+ ]
                        )?,
                    )+
                })
            }
        }
    };
}

/// Declares a nested sub-record type: the struct, its
/// [`RecordDef`](super::RecordDef), and its [`WireRecord`](super::WireRecord)
/// glue.
#[macro_export]
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $index:literal => $field:ident : $fty:ty [ $($shape:tt)+ ] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( pub $field: $fty, )+
        }

        impl $crate::schema::WireRecord for $name {
            fn record_def() -> &'static $crate::schema::RecordDef {
                static DEFINITION: $crate::once_cell::sync::Lazy<$crate::schema::RecordDef> =
                    $crate::once_cell::sync::Lazy::new(|| $crate::schema::RecordDef {
                        name: stringify!($name),
                        fields: vec![
                            $( $crate::__wire_field!($index, stringify!($field), $fty, [ $($shape)+ ]) ),+
                        ],
                    });
                &DEFINITION
            }

            fn to_values(&self) -> Vec<$crate::schema::FieldValue> {
                vec![ $( $crate::__wire_to_value!(&self.$field, [ $($shape)+ ]) ),+ ]
            }

            fn from_values(values: Vec<$crate::schema::FieldValue>) -> $crate::error::Result<Self> {
                let mut values = values.into_iter();
                Ok(Self {
                    $(
                        $field: $crate::__wire_from_value!(
                            $crate::__wire_next_value!(values, $field),
                            stringify!($field),
                            $fty,
                            [ $($shape)+ ]
                        )?,
                    )+
                })
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_next_value {
    ($values:ident, $field:ident) => {
        $values.next().ok_or_else(|| {
            $crate::error::ProtocolError::Definition(
                concat!("missing value for field `", stringify!($field), "`").to_string(),
            )
        })?
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_field {
    ($index:expr, $name:expr, $fty:ty, [scalar]) => {
        $crate::schema::FieldSpec::scalar($index, $name, <$fty as $crate::convert::WireScalar>::KIND)
    };
    ($index:expr, $name:expr, $fty:ty, [nullable($inner:ty)]) => {
        $crate::schema::FieldSpec::nullable($index, $name, <$inner as $crate::convert::WireScalar>::KIND)
    };
    ($index:expr, $name:expr, $fty:ty, [registered]) => {
        $crate::schema::FieldSpec::registered($index, $name, $crate::convert::TypeDescriptor::of::<$fty>())
    };
    ($index:expr, $name:expr, $fty:ty, [record, inner = $is:literal]) => {
        $crate::schema::FieldSpec::record(
            $index,
            $name,
            <$fty as $crate::schema::WireRecord>::record_def(),
            $is,
        )
    };
    ($index:expr, $name:expr, $fty:ty, [list(record $elem:ty, fixed = $len:literal, sep = $ls:literal, inner = $is:literal)]) => {
        $crate::schema::FieldSpec::list(
            $index,
            $name,
            $crate::schema::ValueShape::Record(<$elem as $crate::schema::WireRecord>::record_def()),
            $crate::schema::ListLen::Fixed($len),
            $ls,
            $is,
        )
    };
    ($index:expr, $name:expr, $fty:ty, [list(record $elem:ty, delimited, sep = $ls:literal, inner = $is:literal)]) => {
        $crate::schema::FieldSpec::list(
            $index,
            $name,
            $crate::schema::ValueShape::Record(<$elem as $crate::schema::WireRecord>::record_def()),
            $crate::schema::ListLen::Delimited,
            $ls,
            $is,
        )
    };
    ($index:expr, $name:expr, $fty:ty, [list(scalar $elem:ty, fixed = $len:literal, sep = $ls:literal)]) => {
        $crate::schema::FieldSpec::list(
            $index,
            $name,
            $crate::schema::ValueShape::Scalar(<$elem as $crate::convert::WireScalar>::KIND),
            $crate::schema::ListLen::Fixed($len),
            $ls,
            '.',
        )
    };
    ($index:expr, $name:expr, $fty:ty, [list(scalar $elem:ty, delimited, sep = $ls:literal)]) => {
        $crate::schema::FieldSpec::list(
            $index,
            $name,
            $crate::schema::ValueShape::Scalar(<$elem as $crate::convert::WireScalar>::KIND),
            $crate::schema::ListLen::Delimited,
            $ls,
            '.',
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_to_value {
    ($value:expr, [scalar]) => {
        $crate::schema::value::scalar_value($value)
    };
    ($value:expr, [nullable($inner:ty)]) => {
        $crate::schema::value::nullable_value::<$inner>($value)
    };
    ($value:expr, [registered]) => {
        $crate::schema::value::registered_value($value)
    };
    ($value:expr, [record, inner = $is:literal]) => {
        $crate::schema::value::record_value($value)
    };
    ($value:expr, [list(record $elem:ty, $($rest:tt)+)]) => {
        $crate::schema::FieldValue::List(
            $value.iter().map($crate::schema::value::record_value).collect(),
        )
    };
    ($value:expr, [list(scalar $elem:ty, $($rest:tt)+)]) => {
        $crate::schema::FieldValue::List(
            $value.iter().map($crate::schema::value::scalar_value).collect(),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_from_value {
    ($value:expr, $name:expr, $fty:ty, [scalar]) => {
        $crate::schema::value::take_scalar::<$fty>($value, $name)
    };
    ($value:expr, $name:expr, $fty:ty, [nullable($inner:ty)]) => {
        $crate::schema::value::take_nullable::<$inner>($value, $name)
    };
    ($value:expr, $name:expr, $fty:ty, [registered]) => {
        $crate::schema::value::take_registered::<$fty>($value, $name)
    };
    ($value:expr, $name:expr, $fty:ty, [record, inner = $is:literal]) => {
        $crate::schema::value::take_record($value, $name)
    };
    ($value:expr, $name:expr, $fty:ty, [list(record $elem:ty, $($rest:tt)+)]) => {
        $crate::schema::value::take_list($value, $name, |item| {
            $crate::schema::value::take_record::<$elem>(item, $name)
        })
    };
    ($value:expr, $name:expr, $fty:ty, [list(scalar $elem:ty, $($rest:tt)+)]) => {
        $crate::schema::value::take_list($value, $name, |item| {
            $crate::schema::value::take_scalar::<$elem>(item, $name)
        })
    };
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::packet::WirePacket;
    use crate::schema::value::FieldValue;
    use crate::schema::{Direction, ListLen, ValueShape, WireRecord};

    wire_record! {
        #[derive(Debug, Clone, PartialEq)]
        struct Pair {
            0 => left: Option<i32> [nullable(i32)],
            1 => right: Option<i32> [nullable(i32)],
        }
    }

    wire_packet! {
        #[derive(Debug, Clone, PartialEq)]
        struct Probe {
            header = "probe",
            direction = Client,
            separator = ' ';
            0 => id: i64 [scalar],
            2 => label: String [scalar],
            5 => pairs: Vec<Pair> [list(record Pair, fixed = 2, sep = ' ', inner = '.')],
        }
    }

    #[test]
    fn definition_reflects_the_declaration() {
        let def = Probe::definition();
        assert_eq!(def.header, "probe");
        assert_eq!(def.direction, Direction::Client);
        assert_eq!(def.fields.len(), 3);
        assert_eq!(def.fields[1].index, 2);
        assert_eq!(def.fields[1].name, "label");
        match &def.fields[2].shape {
            ValueShape::List { element, len } => {
                assert_eq!(*len, ListLen::Fixed(2));
                assert!(matches!(element.as_ref(), ValueShape::Record(d) if d.name == "Pair"));
            }
            other => panic!("expected list shape, got {other:?}"),
        }
        assert!(def.validate().is_ok());
    }

    #[test]
    fn glue_round_trips_through_the_envelope() {
        let probe = Probe {
            id: 143,
            label: "derfy".to_string(),
            pairs: vec![
                Pair { left: Some(0), right: Some(2105) },
                Pair { left: None, right: None },
            ],
        };
        let values = probe.to_values();
        assert_eq!(values.len(), 3);
        assert!(matches!(values[2], FieldValue::List(_)));
        let rebuilt = Probe::from_values(values).unwrap();
        assert_eq!(rebuilt, probe);
    }

    #[test]
    fn missing_values_fail_instead_of_defaulting() {
        let probe = Probe {
            id: 1,
            label: String::new(),
            pairs: vec![],
        };
        let mut values = probe.to_values();
        values.pop();
        assert!(Probe::from_values(values).is_err());
    }

    #[test]
    fn record_def_is_shared_and_ordered() {
        let def = Pair::record_def();
        assert_eq!(def.name, "Pair");
        assert_eq!(def.fields[0].name, "left");
        assert!(std::ptr::eq(def, Pair::record_def()));
    }
}
