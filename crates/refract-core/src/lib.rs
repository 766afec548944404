//! Core metadata model and traversal engine for refract.
//!
//! This crate holds everything that does not depend on a document format:
//!
//! - [`Registry`]: the write-once map from type identity to field tables
//!   ([`RecordMeta`]) and enumerator tables ([`EnumMeta`]).
//! - The traversal engine: [`Registry::visit`], [`Registry::visit_accumulate`],
//!   type-level visitation and lock-step visitation of two instances.
//! - Index-based field access: [`Registry::field_count`], [`Registry::get`],
//!   [`Registry::get_mut`], [`Registry::get_name`].
//! - Structural comparison: [`Registry::equal_to`], [`Registry::less_than`],
//!   [`Registry::greater_than`].
//! - Enum introspection: [`enum_size`], [`enum_name`], [`from_name`],
//!   [`enumerators`], [`enum_names`], [`enum_contains`].

mod access;
mod compare;
mod enums;
mod error;
mod meta;
mod reflect;
mod registry;
mod visit;

#[cfg(test)]
mod fixtures;

pub use compare::{CompareOp, Predicate, leaf_ordering};
pub use enums::{
    EnumMeta, Enumerated, Enumerator, EnumeratorDescriptor, enum_contains, enum_name, enum_names,
    enum_size, enum_value, enumerators, from_name, from_value,
};
pub use error::{Error, Result};
pub use meta::{
    BaseLink, FieldDescriptor, FieldGetter, FieldGetterMut, RecordMeta, TypeDescriptor, TypeTag,
    Upcast, UpcastMut, Visitable,
};
pub use reflect::{EnumValue, Reflect, ReflectMut, ReflectRef, Scalar, Sequence};
pub use registry::{Entry, Registry, RegistryBuilder};
pub use visit::{Dispatch, VisitOptions};

pub use std::ops::ControlFlow;
