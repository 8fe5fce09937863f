//! Enumeration converters.
//!
//! Wire enums travel as their underlying ordinal: the token is the decimal
//! discriminant, parsed back through [`WireEnum::from_ordinal`]. Declaring an
//! enum with [`wire_enum!`] implements the trait and makes the type
//! registrable through the generic [`EnumConverter`], which is how the
//! built-in protocol enums reach the fallback tier.

use std::marker::PhantomData;

use crate::error::Result;

use super::scalar::could_not_convert;
use super::Converter;

/// An enumeration with a stable wire ordinal per variant.
///
/// Implemented by [`wire_enum!`]; hand implementations only need a total
/// `to_ordinal` and a `from_ordinal` that rejects unknown discriminants.
pub trait WireEnum: Copy + PartialEq + Send + Sync + 'static {
    /// Converter identity used in diagnostics.
    const NAME: &'static str;

    fn to_ordinal(self) -> i64;

    fn from_ordinal(ordinal: i64) -> Option<Self>;
}

/// Registry-tier converter for any [`WireEnum`].
pub struct EnumConverter<E>(PhantomData<fn() -> E>);

impl<E> EnumConverter<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for EnumConverter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: WireEnum> Converter<E> for EnumConverter<E> {
    fn name(&self) -> &str {
        E::NAME
    }

    fn serialize(&self, value: &E) -> Result<String> {
        Ok(value.to_ordinal().to_string())
    }

    fn deserialize(&self, text: &str) -> Result<E> {
        let ordinal: i64 = text.parse().map_err(|_| could_not_convert(text, E::NAME))?;
        E::from_ordinal(ordinal).ok_or_else(|| could_not_convert(text, E::NAME))
    }
}

/// Declares a wire enumeration: the enum itself plus its [`WireEnum`] impl.
///
/// The structural derives (`Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`,
/// `Hash`) come along; anything further, serde derives included, goes in the
/// attribute position of the declaration.
///
/// ```rust
/// use text_protocol::wire_enum;
///
/// wire_enum! {
///     /// Faction of a map entity.
///     pub enum Faction {
///         Neutral = 0,
///         Angel = 1,
///         Demon = 2,
///     }
/// }
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $ordinal:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $ordinal ),+
        }

        impl $crate::convert::WireEnum for $name {
            const NAME: &'static str = stringify!($name);

            fn to_ordinal(self) -> i64 {
                self as i64
            }

            fn from_ordinal(ordinal: i64) -> Option<Self> {
                match ordinal {
                    $( $ordinal => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }
    };
}
