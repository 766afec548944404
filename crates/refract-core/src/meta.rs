//! Metadata tables: type tags, type descriptors, field descriptors and base links.
//!
//! These are the shapes produced by `#[derive(Visitable)]`, and the shapes a
//! hand-written table must fill in when a type is registered without the
//! derive.

use std::any::{Any, TypeId};
use std::fmt;

use crate::reflect::Reflect;

// ============================================================================
// Type Identity
// ============================================================================

/// Identity of a type, used as the registry key.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Tag of `T`.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` the tag compares and hashes by.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full path of the type as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the name, generics included.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(pos) => &self.name[pos + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl std::hash::Hash for TypeTag {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeTag").field(&self.name).finish()
    }
}

// ============================================================================
// Type Descriptors
// ============================================================================

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Bool,
    Char,
    Int {
        bits: u32,
        signed: bool,
    },
    Float {
        bits: u32,
    },
    String,
    /// A visitable struct.
    Record(TypeTag),
    /// A fieldless enum with an enumerator table.
    Enum(TypeTag),
    /// Fixed-length array, `[T; N]`.
    Array {
        element: Box<TypeDescriptor>,
        len: usize,
    },
    /// Growable sequence, `Vec<T>`.
    Sequence {
        element: Box<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// The registry key for records and enums.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            TypeDescriptor::Record(tag) | TypeDescriptor::Enum(tag) => Some(*tag),
            _ => None,
        }
    }

    /// Booleans, characters, numbers and strings.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Bool
                | TypeDescriptor::Char
                | TypeDescriptor::Int { .. }
                | TypeDescriptor::Float { .. }
                | TypeDescriptor::String
        )
    }

    /// Whether this is a visitable struct.
    pub fn is_record(&self) -> bool {
        matches!(self, TypeDescriptor::Record(_))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Bool => f.write_str("bool"),
            TypeDescriptor::Char => f.write_str("char"),
            TypeDescriptor::Int { bits, signed } => {
                write!(f, "{}{}", if *signed { 'i' } else { 'u' }, bits)
            }
            TypeDescriptor::Float { bits } => write!(f, "f{bits}"),
            TypeDescriptor::String => f.write_str("String"),
            TypeDescriptor::Record(tag) | TypeDescriptor::Enum(tag) => {
                f.write_str(tag.short_name())
            }
            TypeDescriptor::Array { element, len } => write!(f, "[{element}; {len}]"),
            TypeDescriptor::Sequence { element } => write!(f, "Vec<{element}>"),
        }
    }
}

// ============================================================================
// Field Descriptors
// ============================================================================

/// Borrows one field out of an instance. Returns `None` when the instance is
/// not of the type the descriptor was built for.
pub type FieldGetter = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Reflect>;

/// Mutably borrows one field out of an instance.
pub type FieldGetterMut = for<'a> fn(&'a mut dyn Any) -> Option<&'a mut dyn Reflect>;

/// Views an instance as one of its bases.
pub type Upcast = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>;

/// Mutably views an instance as one of its bases.
pub type UpcastMut = for<'a> fn(&'a mut dyn Any) -> Option<&'a mut dyn Any>;

/// Name, declared type and accessors for one field.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub ty: TypeDescriptor,
    pub get: FieldGetter,
    pub get_mut: FieldGetterMut,
}

impl FieldDescriptor {
    /// Builds a descriptor for a field of type `F`.
    pub fn new<F: Reflect>(name: &'static str, get: FieldGetter, get_mut: FieldGetterMut) -> Self {
        Self {
            name,
            ty: F::type_descriptor(),
            get,
            get_mut,
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

/// Link from a record to one of its direct bases.
///
/// Rust has no inheritance; a base is an embedded value whose fields are
/// flattened into the owner's traversal after the owner's own fields.
#[derive(Clone)]
pub struct BaseLink {
    pub ty: TypeTag,
    pub upcast: Upcast,
    pub upcast_mut: UpcastMut,
}

impl fmt::Debug for BaseLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseLink")
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Record Metadata
// ============================================================================

/// Registry entry for a record type.
#[derive(Debug, Clone)]
pub struct RecordMeta {
    pub ty: TypeTag,
    /// Declared name, without the module path.
    pub name: &'static str,
    /// Own fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Direct bases in declaration order.
    pub bases: Vec<BaseLink>,
}

impl RecordMeta {
    /// Empty table for `T`.
    pub fn new<T: Any>(name: &'static str) -> Self {
        Self {
            ty: TypeTag::of::<T>(),
            name,
            fields: Vec::new(),
            bases: Vec::new(),
        }
    }

    /// Appends an own field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a direct base.
    pub fn with_base(mut self, base: BaseLink) -> Self {
        self.bases.push(base);
        self
    }
}

/// A record type that can describe its own fields.
///
/// Usually derived with `#[derive(Visitable)]`. Implementing it is the static
/// half of the visitability capability; registering the returned table is the
/// dynamic half.
pub trait Visitable: Reflect + Sized {
    fn record_meta() -> RecordMeta;
}
