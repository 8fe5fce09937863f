//! # Packet Schema
//!
//! The declarative metadata model that drives codec generation: field specs,
//! packet and record definitions, and the value envelope generated fragments
//! exchange with the typed glue.
//!
//! A packet type is described once, statically, as an ordered list of
//! [`FieldSpec`]s. The [`generate`] module compiles that description into a
//! fixed serialize/deserialize procedure pair ahead of any traffic; the
//! [`wire_packet!`](crate::wire_packet) and
//! [`wire_record!`](crate::wire_record) macros emit the struct, its
//! definition table, and the value glue from a single declaration.
//!
//! ## Components
//! - **FieldSpec / ValueShape**: one field's index, shape, and separators
//! - **PacketDefinition / RecordDef**: the ordered field list per type
//! - **FieldValue**: dynamic value envelope mirroring `ValueShape`
//! - **RecognizerChain / GeneratedCodec**: build-time codec generation

pub mod generate;
pub mod macros;
pub mod value;

pub use generate::{CodecCx, ElementCodec, FieldCodec, GeneratedCodec, RecognizerChain, ShapeRecognizer};
pub use value::FieldValue;

use serde::{Deserialize, Serialize};

use crate::convert::{ScalarKind, TypeDescriptor};
use crate::error::{constants, ProtocolError, Result};
use crate::wire::DEFAULT_SEPARATOR;

/// Whether a packet originates from the client or the server. The same
/// header keyword may denote different shapes per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Client,
    Server,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Direction::Client => "client",
            Direction::Server => "server",
        })
    }
}

/// How a list field maps onto wire tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListLen {
    /// Exactly `n` elements. When the list separator equals the packet
    /// separator the elements occupy `n` top-level tokens; otherwise they
    /// share one token, joined by the list separator.
    Fixed(usize),
    /// Any element count, in one top-level token joined by the list
    /// separator. An empty token deserializes as an empty list, so a
    /// delimited list of text scalars cannot round-trip `[""]`; that
    /// ambiguity belongs to the wire format itself.
    Delimited,
}

/// The declared shape of one field's value.
#[derive(Debug, Clone)]
pub enum ValueShape {
    /// A primitive with a specialized parse/format path.
    Scalar(ScalarKind),
    /// A primitive that tolerates the null sentinel.
    NullableScalar(ScalarKind),
    /// Resolved through the converter repository at call time; enums and
    /// consumer-defined types (including their `Option` forms).
    Registered(TypeDescriptor),
    /// A repeated group of elements.
    List { element: Box<ValueShape>, len: ListLen },
    /// A nested sub-record with its own field list.
    Record(&'static RecordDef),
}

impl ValueShape {
    /// Short shape name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueShape::Scalar(_) => "scalar",
            ValueShape::NullableScalar(_) => "nullable scalar",
            ValueShape::Registered(_) => "registered",
            ValueShape::List { .. } => "list",
            ValueShape::Record(_) => "record",
        }
    }
}

/// One field of a packet or record definition.
///
/// `index` orders fields within their definition; indices are unique and
/// strictly ascending but need not be contiguous, since nested groups consume
/// a variable number of raw tokens. `name` exists purely for error tagging
/// and logs.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub index: u16,
    pub name: &'static str,
    pub shape: ValueShape,
    /// Separator between repeated elements of a list field.
    pub list_separator: char,
    /// Separator between sub-fields of one element or nested record.
    pub inner_separator: char,
}

impl FieldSpec {
    pub fn scalar(index: u16, name: &'static str, kind: ScalarKind) -> Self {
        Self::with_shape(index, name, ValueShape::Scalar(kind))
    }

    pub fn nullable(index: u16, name: &'static str, kind: ScalarKind) -> Self {
        Self::with_shape(index, name, ValueShape::NullableScalar(kind))
    }

    pub fn registered(index: u16, name: &'static str, descriptor: TypeDescriptor) -> Self {
        Self::with_shape(index, name, ValueShape::Registered(descriptor))
    }

    pub fn record(index: u16, name: &'static str, def: &'static RecordDef, inner: char) -> Self {
        Self {
            inner_separator: inner,
            ..Self::with_shape(index, name, ValueShape::Record(def))
        }
    }

    pub fn list(
        index: u16,
        name: &'static str,
        element: ValueShape,
        len: ListLen,
        list_separator: char,
        inner_separator: char,
    ) -> Self {
        Self {
            index,
            name,
            shape: ValueShape::List {
                element: Box::new(element),
                len,
            },
            list_separator,
            inner_separator,
        }
    }

    fn with_shape(index: u16, name: &'static str, shape: ValueShape) -> Self {
        Self {
            index,
            name,
            shape,
            list_separator: DEFAULT_SEPARATOR,
            inner_separator: '.',
        }
    }
}

/// Field list of a nested sub-record, built once per record type.
#[derive(Debug)]
pub struct RecordDef {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

/// Field list, header, and direction of one packet type. Built once,
/// statically, per packet; immutable for the process lifetime.
#[derive(Debug)]
pub struct PacketDefinition {
    /// Matched case-sensitively against the first wire token.
    pub header: &'static str,
    pub direction: Direction,
    /// Top-level field separator, space by default.
    pub separator: char,
    pub fields: Vec<FieldSpec>,
}

impl PacketDefinition {
    /// Check the definition's invariants: unique strictly-ascending indices
    /// and unambiguous separator nesting. Run by the codec builder before
    /// generation; a failure is a bug in the definition.
    pub fn validate(&self) -> Result<()> {
        for pair in self.fields.windows(2) {
            if pair[0].index >= pair[1].index {
                return Err(ProtocolError::Definition(format!(
                    "packet `{}`: {} (`{}` then `{}`)",
                    self.header,
                    constants::ERR_INDEX_ORDER,
                    pair[0].name,
                    pair[1].name
                )));
            }
        }
        validate_fields(self.header, &self.fields, self.separator, true)
    }
}

fn validate_fields(
    owner: &str,
    fields: &[FieldSpec],
    outer_separator: char,
    top_level: bool,
) -> Result<()> {
    for field in fields {
        match &field.shape {
            ValueShape::List { element, len } => {
                // A fixed list may spread over top-level tokens; any other
                // collision with the surrounding separator is ambiguous.
                let spread = top_level && matches!(len, ListLen::Fixed(_));
                if field.list_separator == outer_separator && !spread {
                    return Err(separator_error(owner, field.name));
                }
                if let ValueShape::Record(def) = element.as_ref() {
                    if field.inner_separator == field.list_separator {
                        return Err(separator_error(owner, field.name));
                    }
                    validate_fields(def.name, &def.fields, field.inner_separator, false)?;
                }
                if matches!(element.as_ref(), ValueShape::List { .. }) {
                    return Err(ProtocolError::Definition(format!(
                        "`{owner}`.`{}`: lists cannot nest inside lists",
                        field.name
                    )));
                }
            }
            ValueShape::Record(def) => {
                if field.inner_separator == outer_separator {
                    return Err(separator_error(owner, field.name));
                }
                validate_fields(def.name, &def.fields, field.inner_separator, false)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn separator_error(owner: &str, field: &str) -> ProtocolError {
    ProtocolError::Definition(format!(
        "`{owner}`.`{field}`: {}",
        constants::ERR_LIST_SEPARATOR
    ))
}

/// A nested sub-record type: its static field list plus the value glue the
/// generated codec calls to cross between [`FieldValue`]s and the struct.
///
/// Implemented by [`wire_record!`](crate::wire_record).
pub trait WireRecord: Sized + Send + Sync + 'static {
    fn record_def() -> &'static RecordDef;

    /// Field values in index order.
    fn to_values(&self) -> Vec<FieldValue>;

    /// Rebuild from field values in index order; all-or-nothing.
    fn from_values(values: Vec<FieldValue>) -> Result<Self>;
}
