//! Enum metadata and introspection.
//!
//! Every [`Enumerated`] enum carries an ordered table of its enumerators. The
//! free functions in this module are the static introspection API; the
//! registry holds the type-erased [`EnumMeta`] copy of the same table.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::meta::TypeTag;
use crate::reflect::{EnumValue, Reflect};

/// One row of an enum's enumerator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enumerator<E: 'static> {
    pub enumerator: E,
    pub name: &'static str,
    /// Underlying discriminant, widened to `i64`.
    pub value: i64,
}

/// A fieldless enum with a registered enumerator table.
///
/// Usually derived with `#[derive(Enumerated)]`.
pub trait Enumerated: Reflect + Copy + PartialEq {
    /// Declared name of the enum.
    const NAME: &'static str;

    /// Enumerators in declaration order.
    const ENUMERATORS: &'static [Enumerator<Self>];

    /// Type-erased copy of the table, as stored in the registry.
    fn enum_meta() -> EnumMeta {
        EnumMeta {
            ty: TypeTag::of::<Self>(),
            name: Self::NAME,
            enumerators: Self::ENUMERATORS
                .iter()
                .map(|e| EnumeratorDescriptor {
                    name: e.name,
                    value: e.value,
                })
                .collect(),
        }
    }
}

/// Name and underlying value of one enumerator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumeratorDescriptor {
    pub name: &'static str,
    pub value: i64,
}

/// Registry entry for an enum type.
#[derive(Debug, Clone)]
pub struct EnumMeta {
    pub ty: TypeTag,
    pub name: &'static str,
    pub enumerators: Vec<EnumeratorDescriptor>,
}

impl EnumMeta {
    /// Number of enumerators.
    pub fn size(&self) -> usize {
        self.enumerators.len()
    }

    /// Enumerator names in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.enumerators.iter().map(|e| e.name).collect()
    }

    /// Whether `raw` is the value of some enumerator.
    pub fn contains(&self, raw: i64) -> bool {
        self.enumerators.iter().any(|e| e.value == raw)
    }

    /// Name of the first enumerator whose value is `raw`.
    pub fn name_of(&self, raw: i64) -> Result<&'static str> {
        self.enumerators
            .iter()
            .find(|e| e.value == raw)
            .map(|e| e.name)
            .ok_or(Error::UnknownEnumeratorValue {
                enum_name: self.name,
                value: raw,
            })
    }

    /// Value of the enumerator named `name`.
    pub fn value_of(&self, name: &str) -> Result<i64> {
        self.enumerators
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value)
            .ok_or_else(|| Error::UnknownEnumeratorName {
                enum_name: self.name,
                name: name.to_string(),
            })
    }
}

// ============================================================================
// Introspection
// ============================================================================

/// Number of enumerators of `E`.
pub fn enum_size<E: Enumerated>() -> usize {
    E::ENUMERATORS.len()
}

/// Name of `value`.
pub fn enum_name<E: Enumerated>(value: E) -> Result<&'static str> {
    E::ENUMERATORS
        .iter()
        .find(|e| e.enumerator == value)
        .map(|e| e.name)
        .ok_or(Error::UnknownEnumerator(E::NAME))
}

/// Enumerator with exactly the name `name`.
pub fn from_name<E: Enumerated>(name: &str) -> Result<E> {
    E::ENUMERATORS
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.enumerator)
        .ok_or_else(|| Error::UnknownEnumeratorName {
            enum_name: E::NAME,
            name: name.to_string(),
        })
}

/// All enumerators of `E`, in declaration order.
pub fn enumerators<E: Enumerated>() -> Vec<E> {
    E::ENUMERATORS.iter().map(|e| e.enumerator).collect()
}

/// All enumerator names of `E`, index-aligned with [`enumerators`].
pub fn enum_names<E: Enumerated>() -> Vec<&'static str> {
    E::ENUMERATORS.iter().map(|e| e.name).collect()
}

/// Whether `raw` is the underlying value of some enumerator of `E`.
///
/// Check this before converting an untrusted integer with [`from_value`].
pub fn enum_contains<E: Enumerated>(raw: i64) -> bool {
    E::ENUMERATORS.iter().any(|e| e.value == raw)
}

/// Underlying value of `value`.
pub fn enum_value<E: Enumerated>(value: E) -> Result<i64> {
    E::ENUMERATORS
        .iter()
        .find(|e| e.enumerator == value)
        .map(|e| e.value)
        .ok_or(Error::UnknownEnumerator(E::NAME))
}

/// Enumerator whose underlying value is `raw`.
pub fn from_value<E: Enumerated>(raw: i64) -> Result<E> {
    E::ENUMERATORS
        .iter()
        .find(|e| e.value == raw)
        .map(|e| e.enumerator)
        .ok_or(Error::UnknownEnumeratorValue {
            enum_name: E::NAME,
            value: raw,
        })
}

impl<E: Enumerated> EnumValue for E {
    fn enum_type_name(&self) -> &'static str {
        E::NAME
    }

    fn enumerator_name(&self) -> Result<&'static str> {
        enum_name(*self)
    }

    fn underlying(&self) -> Result<i64> {
        enum_value(*self)
    }

    fn assign_name(&mut self, name: &str) -> Result<()> {
        *self = from_name::<E>(name)?;
        Ok(())
    }

    fn assign_underlying(&mut self, value: i64) -> Result<()> {
        *self = from_value::<E>(value)?;
        Ok(())
    }
}
