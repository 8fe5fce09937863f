//! # Converters
//!
//! Conversion between token text and typed values.
//!
//! This module carries both tiers of the converter design:
//! - **Specialized tier**: [`scalar::ScalarKind`] and [`scalar::WireScalar`],
//!   the primitive shapes the code generator handles with direct parse/format
//!   fragments and no lookup at call time.
//! - **Registry tier**: the [`Converter`] capability, its object-safe
//!   [`AnyConverter`] erasure, and the [`registry::ConverterRegistry`] that
//!   maps type descriptors to converter instances. Enumerations and
//!   consumer-defined types live here, so they stay extensible without
//!   touching the generator.
//!
//! ## Components
//! - **Converter**: serialize(value) → token text, deserialize(token text) →
//!   value or error
//! - **AnyConverter**: type-erased converter stored by the registry
//! - **NullableConverter**: lifts any converter to tolerate the null sentinel
//! - **PrimitiveConverter**: registry-tier adapter over a `WireScalar` type
//!
//! ## Null handling
//! No converter re-implements null handling. [`NullableConverter`] intercepts
//! the sentinel before delegating, and the registry materializes a lifted
//! `Option<T>` entry whenever `T` is registered.

pub mod enums;
pub mod registry;
pub mod scalar;

pub use enums::{EnumConverter, WireEnum};
pub use registry::{ConverterRegistry, TypeDescriptor};
pub use scalar::{ScalarKind, ScalarValue, WireScalar};

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{ProtocolError, Result};
use crate::wire::NULL_TOKEN;

/// Conversion capability between a typed value and its wire token text.
///
/// `serialize` is total for any in-range value; `deserialize` fails with
/// [`ProtocolError::CouldNotConvert`] carrying the offending token and this
/// converter's identity.
pub trait Converter<T>: Send + Sync + 'static {
    /// Identity used in diagnostics and error messages.
    fn name(&self) -> &str;

    /// Render a value as token text.
    fn serialize(&self, value: &T) -> Result<String>;

    /// Parse token text into a value.
    fn deserialize(&self, text: &str) -> Result<T>;
}

/// Shared converters delegate to their inner instance.
impl<T, C: Converter<T> + ?Sized> Converter<T> for Arc<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn serialize(&self, value: &T) -> Result<String> {
        (**self).serialize(value)
    }

    fn deserialize(&self, text: &str) -> Result<T> {
        (**self).deserialize(text)
    }
}

/// Object-safe face of [`Converter`], stored by the registry and invoked by
/// the generated catch-all fragments.
///
/// Values cross this boundary as `dyn Any`; the erasure adapter downcasts
/// back to the concrete type it was registered for. A downcast failure is a
/// definition bug (a field's declared descriptor disagrees with the value it
/// produced), never a property of wire data.
pub trait AnyConverter: Send + Sync {
    /// Identity used in diagnostics and error messages.
    fn name(&self) -> &str;

    /// Render a type-erased value as token text.
    fn serialize_any(&self, value: &(dyn Any + Send + Sync)) -> Result<String>;

    /// Parse token text into a boxed value of the registered type.
    fn deserialize_any(&self, text: &str) -> Result<Box<dyn Any + Send + Sync>>;
}

impl fmt::Debug for dyn AnyConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyConverter")
            .field("name", &self.name())
            .finish()
    }
}

/// Erasure adapter: wraps a typed [`Converter`] into an [`AnyConverter`].
pub(crate) struct Erased<T, C> {
    converter: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> Erased<T, C> {
    pub(crate) fn new(converter: C) -> Self {
        Self {
            converter,
            _marker: PhantomData,
        }
    }
}

impl<T, C> AnyConverter for Erased<T, C>
where
    T: Send + Sync + 'static,
    C: Converter<T>,
{
    fn name(&self) -> &str {
        self.converter.name()
    }

    fn serialize_any(&self, value: &(dyn Any + Send + Sync)) -> Result<String> {
        let typed = value.downcast_ref::<T>().ok_or_else(|| {
            ProtocolError::Definition(format!(
                "converter `{}` received a value of a different type",
                self.converter.name()
            ))
        })?;
        self.converter.serialize(typed)
    }

    fn deserialize_any(&self, text: &str) -> Result<Box<dyn Any + Send + Sync>> {
        Ok(Box::new(self.converter.deserialize(text)?))
    }
}

/// Lifts a converter for `T` into one for `Option<T>`.
///
/// The sentinel is intercepted before delegation: `None` serializes to `-`,
/// a standalone `-` token deserializes to `None`, and everything else passes
/// through to the wrapped converter. The inner converter never sees the
/// sentinel, so primitive converters stay null-free.
///
/// One value is unrepresentable by construction: `Some` of a text value that
/// is exactly `-` serializes to the sentinel and reads back as `None`. That
/// ambiguity belongs to the wire format itself.
pub struct NullableConverter<T, C> {
    inner: C,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C: Converter<T>> NullableConverter<T, C> {
    pub fn new(inner: C) -> Self {
        let name = format!("nullable<{}>", inner.name());
        Self {
            inner,
            name,
            _marker: PhantomData,
        }
    }
}

impl<T, C> Converter<Option<T>> for NullableConverter<T, C>
where
    T: Send + Sync + 'static,
    C: Converter<T>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn serialize(&self, value: &Option<T>) -> Result<String> {
        match value {
            None => Ok(NULL_TOKEN.to_string()),
            Some(inner) => self.inner.serialize(inner),
        }
    }

    fn deserialize(&self, text: &str) -> Result<Option<T>> {
        if text == NULL_TOKEN {
            Ok(None)
        } else {
            self.inner.deserialize(text).map(Some)
        }
    }
}

/// Registry-tier converter for any [`WireScalar`] primitive.
///
/// The generator never consults the registry for plain scalar fields, but
/// primitives still need registry entries so consumer types can embed them
/// (for example an `Option<u32>` resolved through the fallback path).
pub struct PrimitiveConverter<T>(PhantomData<fn() -> T>);

impl<T> PrimitiveConverter<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for PrimitiveConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WireScalar> Converter<T> for PrimitiveConverter<T> {
    fn name(&self) -> &str {
        T::KIND.name()
    }

    fn serialize(&self, value: &T) -> Result<String> {
        Ok(value.to_scalar().render())
    }

    fn deserialize(&self, text: &str) -> Result<T> {
        T::from_scalar(T::KIND.parse(text)?)
    }
}
