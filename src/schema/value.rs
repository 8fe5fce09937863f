//! The dynamic value envelope.
//!
//! Generated fragments exchange [`FieldValue`]s with the typed glue the
//! packet macros emit. The envelope mirrors [`ValueShape`](super::ValueShape)
//! variant-for-variant; the `scalar_value`/`take_scalar` helper pairs are the
//! only crossing points, so a shape/value disagreement is always caught and
//! reported as a definition error rather than panicking on a bad downcast.

use std::any::Any;
use std::fmt;

use crate::convert::{ScalarValue, WireScalar};
use crate::error::{constants, ProtocolError, Result};

use super::WireRecord;

/// One field's value in transit between a generated fragment and the typed
/// packet glue.
pub enum FieldValue {
    Scalar(ScalarValue),
    Nullable(Option<ScalarValue>),
    /// A value of a repository-registered type, boxed for the erased
    /// converter interface.
    Registered(Box<dyn Any + Send + Sync>),
    List(Vec<FieldValue>),
    /// Sub-record field values in index order.
    Record(Vec<FieldValue>),
}

impl FieldValue {
    /// Envelope variant name for shape-mismatch diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Scalar(_) => "scalar",
            FieldValue::Nullable(_) => "nullable",
            FieldValue::Registered(_) => "registered",
            FieldValue::List(_) => "list",
            FieldValue::Record(_) => "record",
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            FieldValue::Nullable(v) => f.debug_tuple("Nullable").field(v).finish(),
            FieldValue::Registered(_) => f.write_str("Registered(..)"),
            FieldValue::List(v) => f.debug_tuple("List").field(v).finish(),
            FieldValue::Record(v) => f.debug_tuple("Record").field(v).finish(),
        }
    }
}

pub fn scalar_value<T: WireScalar>(value: &T) -> FieldValue {
    FieldValue::Scalar(value.to_scalar())
}

pub fn nullable_value<T: WireScalar>(value: &Option<T>) -> FieldValue {
    FieldValue::Nullable(value.as_ref().map(WireScalar::to_scalar))
}

pub fn registered_value<T: Clone + Send + Sync + 'static>(value: &T) -> FieldValue {
    FieldValue::Registered(Box::new(value.clone()))
}

pub fn record_value<R: WireRecord>(value: &R) -> FieldValue {
    FieldValue::Record(value.to_values())
}

pub fn take_scalar<T: WireScalar>(value: FieldValue, field: &'static str) -> Result<T> {
    match value {
        FieldValue::Scalar(scalar) => T::from_scalar(scalar),
        other => Err(shape_mismatch(field, "scalar", &other)),
    }
}

pub fn take_nullable<T: WireScalar>(value: FieldValue, field: &'static str) -> Result<Option<T>> {
    match value {
        FieldValue::Nullable(Some(scalar)) => T::from_scalar(scalar).map(Some),
        FieldValue::Nullable(None) => Ok(None),
        other => Err(shape_mismatch(field, "nullable", &other)),
    }
}

pub fn take_registered<T: Send + Sync + 'static>(
    value: FieldValue,
    field: &'static str,
) -> Result<T> {
    match value {
        FieldValue::Registered(boxed) => boxed.downcast::<T>().map(|b| *b).map_err(|_| {
            ProtocolError::Definition(format!(
                "field `{field}`: registered value is not a `{}`",
                std::any::type_name::<T>()
            ))
        }),
        other => Err(shape_mismatch(field, "registered", &other)),
    }
}

pub fn take_record<R: WireRecord>(value: FieldValue, field: &'static str) -> Result<R> {
    match value {
        FieldValue::Record(values) => R::from_values(values),
        other => Err(shape_mismatch(field, "record", &other)),
    }
}

pub fn take_list<T>(
    value: FieldValue,
    field: &'static str,
    mut element: impl FnMut(FieldValue) -> Result<T>,
) -> Result<Vec<T>> {
    match value {
        FieldValue::List(items) => items.into_iter().map(&mut element).collect(),
        other => Err(shape_mismatch(field, "list", &other)),
    }
}

fn shape_mismatch(field: &'static str, expected: &str, got: &FieldValue) -> ProtocolError {
    ProtocolError::Definition(format!(
        "{}: field `{field}` expected a {expected} value, got {}",
        constants::ERR_SHAPE_MISMATCH,
        got.kind_name()
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn scalar_glue_round_trips() {
        let v = scalar_value(&4452u16);
        assert_eq!(take_scalar::<u16>(v, "slot").unwrap(), 4452);
    }

    #[test]
    fn nullable_glue_preserves_none() {
        let v = nullable_value::<i32>(&None);
        assert_eq!(take_nullable::<i32>(v, "vnum").unwrap(), None);
        let v = nullable_value(&Some(319i32));
        assert_eq!(take_nullable::<i32>(v, "skin").unwrap(), Some(319));
    }

    #[test]
    fn registered_glue_downcasts() {
        let v = registered_value(&"derfy".to_string());
        assert_eq!(take_registered::<String>(v, "name").unwrap(), "derfy");

        let v = registered_value(&7u32);
        assert!(take_registered::<String>(v, "name").is_err());
    }

    #[test]
    fn shape_mismatch_is_a_definition_error() {
        let v = scalar_value(&1u8);
        match take_nullable::<u8>(v, "hp") {
            Err(ProtocolError::Definition(msg)) => {
                assert!(msg.contains("hp"));
                assert!(msg.contains("scalar"));
            }
            other => panic!("expected Definition error, got {other:?}"),
        }
    }

    #[test]
    fn list_glue_maps_elements_in_order() {
        let v = FieldValue::List(vec![scalar_value(&1u16), scalar_value(&2u16)]);
        let items = take_list(v, "buffs", |item| take_scalar::<u16>(item, "buffs")).unwrap();
        assert_eq!(items, vec![1, 2]);
    }
}
