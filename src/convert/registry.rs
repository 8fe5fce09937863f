//! # Converter Repository
//!
//! Maps a [`TypeDescriptor`] to a type-erased converter instance. This is the
//! second tier of the converter design: the code generator's catch-all
//! recognizer resolves converters from here at call time, which is what lets
//! enums and consumer-defined types participate without touching the
//! generator.
//!
//! Registering `T` also materializes a lifted `Option<T>` entry, so nullable
//! descriptors resolve without separate registration and every resolve stays
//! a single lock-free probe. The registry is populated during the
//! single-threaded builder phase and frozen behind `Arc` afterward;
//! registration after freeze is unrepresentable because `CodecBuilder::build`
//! consumes the builder.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::debug;

use crate::error::{ProtocolError, Result};

use super::{AnyConverter, Converter, Erased, NullableConverter, PrimitiveConverter};

/// Identifies a value type in the repository: a `TypeId` for lookup plus the
/// type name for diagnostics. Equality and hashing use the `TypeId` only.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    pub fn of<T: Send + Sync + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Registry mapping type descriptors to converter instances.
///
/// Writable only during the builder phase; [`crate::codec::ProtocolCodec`]
/// holds it behind `Arc` afterward, so reads are unsynchronized.
#[derive(Default)]
pub struct ConverterRegistry {
    entries: HashMap<TypeDescriptor, Arc<dyn AnyConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with every primitive scalar converter. The
    /// built-in protocol enums are added by `register_defaults` on the codec
    /// builder, alongside the built-in packet set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<bool, _>(PrimitiveConverter::new());
        registry.register::<i8, _>(PrimitiveConverter::new());
        registry.register::<i16, _>(PrimitiveConverter::new());
        registry.register::<i32, _>(PrimitiveConverter::new());
        registry.register::<i64, _>(PrimitiveConverter::new());
        registry.register::<u8, _>(PrimitiveConverter::new());
        registry.register::<u16, _>(PrimitiveConverter::new());
        registry.register::<u32, _>(PrimitiveConverter::new());
        registry.register::<u64, _>(PrimitiveConverter::new());
        registry.register::<f32, _>(PrimitiveConverter::new());
        registry.register::<f64, _>(PrimitiveConverter::new());
        registry.register::<String, _>(PrimitiveConverter::new());
        registry
    }

    /// Register a converter for `T` and materialize the lifted `Option<T>`
    /// entry. Re-registration replaces both entries.
    pub fn register<T, C>(&mut self, converter: C)
    where
        T: Send + Sync + 'static,
        C: Converter<T>,
    {
        let shared = Arc::new(converter);
        debug!(
            type_name = std::any::type_name::<T>(),
            converter = shared.name(),
            "registered converter"
        );
        self.entries.insert(
            TypeDescriptor::of::<T>(),
            Arc::new(Erased::<T, _>::new(shared.clone())),
        );
        self.entries.insert(
            TypeDescriptor::of::<Option<T>>(),
            Arc::new(Erased::<Option<T>, _>::new(NullableConverter::new(shared))),
        );
    }

    /// Resolve the converter registered for a descriptor.
    ///
    /// # Errors
    /// [`ProtocolError::NotRegistered`] when no converter is registered;
    /// the builder self-check surfaces this before traffic time.
    pub fn resolve_dyn(&self, descriptor: &TypeDescriptor) -> Result<&Arc<dyn AnyConverter>> {
        self.entries
            .get(descriptor)
            .ok_or_else(|| ProtocolError::NotRegistered {
                type_name: descriptor.type_name().to_string(),
            })
    }

    /// Resolve by concrete type, a convenience over [`Self::resolve_dyn`].
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<&Arc<dyn AnyConverter>> {
        self.resolve_dyn(&TypeDescriptor::of::<T>())
    }

    pub fn is_registered(&self, descriptor: &TypeDescriptor) -> bool {
        self.entries.contains_key(descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("entries", &self.entries.len())
            .finish()
    }
}
