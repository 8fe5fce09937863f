//! # Scalar Kinds and Values
//!
//! The primitive vocabulary of the wire format. [`ScalarKind`] enumerates the
//! shapes the specialized code paths know how to parse and format directly;
//! [`ScalarValue`] is the widened storage those paths exchange with the typed
//! packet glue; [`WireScalar`] ties a concrete Rust type to its kind.
//!
//! Formatting is invariant: integers and floats render through `Display`
//! (locale-independent, round-trippable), booleans render as `1`/`0`. The
//! shared parse helpers live here once and are called by every generated
//! fragment rather than being duplicated per field.

use crate::error::{ProtocolError, Result};

/// The primitive shapes with specialized parse/format paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Text,
}

impl ScalarKind {
    /// Converter identity used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Text => "string",
        }
    }

    /// Parse a token's text as this kind. Range checks happen here: `300`
    /// does not parse as `U8` even though it parses as `U16`.
    pub fn parse(self, text: &str) -> Result<ScalarValue> {
        match self {
            ScalarKind::Bool => parse_bool(text).map(ScalarValue::Bool),
            ScalarKind::I8 => parse_number::<i8>(text, self.name()).map(|v| ScalarValue::I64(v.into())),
            ScalarKind::I16 => parse_number::<i16>(text, self.name()).map(|v| ScalarValue::I64(v.into())),
            ScalarKind::I32 => parse_number::<i32>(text, self.name()).map(|v| ScalarValue::I64(v.into())),
            ScalarKind::I64 => parse_number::<i64>(text, self.name()).map(ScalarValue::I64),
            ScalarKind::U8 => parse_number::<u8>(text, self.name()).map(|v| ScalarValue::U64(v.into())),
            ScalarKind::U16 => parse_number::<u16>(text, self.name()).map(|v| ScalarValue::U64(v.into())),
            ScalarKind::U32 => parse_number::<u32>(text, self.name()).map(|v| ScalarValue::U64(v.into())),
            ScalarKind::U64 => parse_number::<u64>(text, self.name()).map(ScalarValue::U64),
            ScalarKind::F32 => parse_number::<f32>(text, self.name()).map(ScalarValue::F32),
            ScalarKind::F64 => parse_number::<f64>(text, self.name()).map(ScalarValue::F64),
            ScalarKind::Text => Ok(ScalarValue::Text(text.to_string())),
        }
    }
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed scalar in widened storage. Narrow integer kinds widen into
/// `I64`/`U64`; the two float widths stay separate so their textual form
/// round-trips exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Text(String),
}

impl ScalarValue {
    /// Render as wire token text. Total for every value.
    pub fn render(&self) -> String {
        match self {
            ScalarValue::Bool(true) => "1".to_string(),
            ScalarValue::Bool(false) => "0".to_string(),
            ScalarValue::I64(v) => v.to_string(),
            ScalarValue::U64(v) => v.to_string(),
            ScalarValue::F32(v) => v.to_string(),
            ScalarValue::F64(v) => v.to_string(),
            ScalarValue::Text(v) => v.clone(),
        }
    }

    /// Storage variant name for shape-mismatch diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            ScalarValue::Bool(_) => "Bool",
            ScalarValue::I64(_) => "I64",
            ScalarValue::U64(_) => "U64",
            ScalarValue::F32(_) => "F32",
            ScalarValue::F64(_) => "F64",
            ScalarValue::Text(_) => "Text",
        }
    }
}

/// Ties a concrete Rust type to its [`ScalarKind`] and widened storage.
///
/// Implemented for the primitive types the specialized fragments handle;
/// enums and consumer types go through the converter repository instead.
pub trait WireScalar: Sized + Clone + Send + Sync + 'static {
    const KIND: ScalarKind;

    fn to_scalar(&self) -> ScalarValue;

    /// Narrow widened storage back into the concrete type.
    ///
    /// # Errors
    /// A storage or range mismatch here means a definition's declared kind
    /// disagrees with the struct's field type, so this reports
    /// [`ProtocolError::Definition`] rather than a conversion error.
    fn from_scalar(value: ScalarValue) -> Result<Self>;
}

macro_rules! impl_wire_scalar_int {
    ($($ty:ty => $kind:ident / $store:ident via $wide:ty),* $(,)?) => {$(
        impl WireScalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn to_scalar(&self) -> ScalarValue {
                ScalarValue::$store(<$wide>::from(*self))
            }

            fn from_scalar(value: ScalarValue) -> Result<Self> {
                match value {
                    ScalarValue::$store(v) => <$ty>::try_from(v).map_err(|_| {
                        ProtocolError::Definition(format!(
                            "value {v} does not fit in declared field type `{}`",
                            stringify!($ty)
                        ))
                    }),
                    other => Err(storage_mismatch(stringify!($ty), &other)),
                }
            }
        }
    )*};
}

impl_wire_scalar_int! {
    i8  => I8  / I64 via i64,
    i16 => I16 / I64 via i64,
    i32 => I32 / I64 via i64,
    i64 => I64 / I64 via i64,
    u8  => U8  / U64 via u64,
    u16 => U16 / U64 via u64,
    u32 => U32 / U64 via u64,
    u64 => U64 / U64 via u64,
}

impl WireScalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Bool(*self)
    }

    fn from_scalar(value: ScalarValue) -> Result<Self> {
        match value {
            ScalarValue::Bool(v) => Ok(v),
            other => Err(storage_mismatch("bool", &other)),
        }
    }
}

impl WireScalar for f32 {
    const KIND: ScalarKind = ScalarKind::F32;

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::F32(*self)
    }

    fn from_scalar(value: ScalarValue) -> Result<Self> {
        match value {
            ScalarValue::F32(v) => Ok(v),
            other => Err(storage_mismatch("f32", &other)),
        }
    }
}

impl WireScalar for f64 {
    const KIND: ScalarKind = ScalarKind::F64;

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::F64(*self)
    }

    fn from_scalar(value: ScalarValue) -> Result<Self> {
        match value {
            ScalarValue::F64(v) => Ok(v),
            other => Err(storage_mismatch("f64", &other)),
        }
    }
}

impl WireScalar for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Text(self.clone())
    }

    fn from_scalar(value: ScalarValue) -> Result<Self> {
        match value {
            ScalarValue::Text(v) => Ok(v),
            other => Err(storage_mismatch("String", &other)),
        }
    }
}

/// Parse the wire boolean encoding: `1` is true, `0` is false, anything else
/// fails. The null sentinel is intercepted by the nullable layer before this
/// runs, so it is plain conversion failure here.
pub fn parse_bool(text: &str) -> Result<bool> {
    match text {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(could_not_convert(text, "bool")),
    }
}

fn parse_number<T: std::str::FromStr>(text: &str, converter: &'static str) -> Result<T> {
    text.parse::<T>()
        .map_err(|_| could_not_convert(text, converter))
}

pub(crate) fn could_not_convert(token: &str, converter: &str) -> ProtocolError {
    ProtocolError::CouldNotConvert {
        token: token.to_string(),
        converter: converter.to_string(),
    }
}

fn storage_mismatch(expected: &str, got: &ScalarValue) -> ProtocolError {
    ProtocolError::Definition(format!(
        "declared field type `{expected}` received {} storage",
        got.variant_name()
    ))
}
