//! The value model seen by the traversal engine.
//!
//! Every field reachable through a [`FieldDescriptor`](crate::FieldDescriptor)
//! implements [`Reflect`]. A reflected value is one of four shapes:
//!
//! - **Scalar** - booleans, characters, integers, floats and strings. Scalars
//!   are the leaves: they are ordered with `PartialOrd` and converted to and
//!   from JSON with `serde`.
//! - **Record** - a visitable struct. Its fields are reached through the
//!   registry, never through the value itself.
//! - **Sequence** - `[T; N]` (fixed length) or `Vec<T>` (growable).
//! - **Enum** - a fieldless enum implementing [`Enumerated`](crate::Enumerated).

use std::any::{Any, TypeId};
use std::cmp::Ordering;

use serde::Deserialize;
use serde::ser::Error as _;
use serde_json::Value;

use crate::error::Result;
use crate::meta::TypeDescriptor;

/// A value the traversal engine can inspect.
pub trait Reflect: Any + 'static {
    /// Static description of the implementing type.
    fn type_descriptor() -> TypeDescriptor
    where
        Self: Sized;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Shared view of the value's shape.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Exclusive view of the value's shape.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Full name of the concrete type.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn Reflect {
    /// `TypeId` of the concrete value behind the trait object.
    ///
    /// `Any::type_id` called on `dyn Reflect` itself would report the id of
    /// the trait object type, so this always goes through `as_any`.
    pub fn concrete_type_id(&self) -> TypeId {
        Any::type_id(self.as_any())
    }

    /// Whether the concrete type is `T`.
    pub fn is<T: Reflect>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// The value as a `T`, if it is one.
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// The value as a mutable `T`, if it is one.
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl std::fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reflect_ref() {
            ReflectRef::Scalar(scalar) => match scalar.to_json() {
                Ok(value) => write!(f, "{value}"),
                Err(_) => write!(f, "<{}>", self.type_name()),
            },
            ReflectRef::Record(_) => write!(f, "{} {{ .. }}", self.type_name()),
            ReflectRef::Sequence(seq) => write!(f, "{} [len {}]", self.type_name(), seq.len()),
            ReflectRef::Enum(value) => match value.enumerator_name() {
                Ok(name) => write!(f, "{name}"),
                Err(_) => write!(f, "<{}>", self.type_name()),
            },
        }
    }
}

/// Shared view of a reflected value.
pub enum ReflectRef<'a> {
    Scalar(&'a dyn Scalar),
    Record(&'a dyn Reflect),
    Sequence(&'a dyn Sequence),
    Enum(&'a dyn EnumValue),
}

/// Exclusive view of a reflected value.
pub enum ReflectMut<'a> {
    Scalar(&'a mut dyn Scalar),
    Record(&'a mut dyn Reflect),
    Sequence(&'a mut dyn Sequence),
    Enum(&'a mut dyn EnumValue),
}

/// A leaf value.
pub trait Scalar: Reflect {
    /// Orders `self` against `other`, or `None` when `other` is a different
    /// type or the pair is unordered (NaN).
    fn scalar_cmp(&self, other: &dyn Reflect) -> Option<Ordering>;

    fn to_json(&self) -> serde_json::Result<Value>;

    /// Overwrites `self` with the value decoded from `value`.
    fn assign_json(&mut self, value: &Value) -> serde_json::Result<()>;
}

/// A repeated field.
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared length for fixed-size arrays, `None` for growable sequences.
    fn fixed_len(&self) -> Option<usize>;

    fn element(&self, index: usize) -> Option<&dyn Reflect>;

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Resizes a growable sequence, filling with defaults. Fixed-size arrays
    /// only accept their own length and report `false` otherwise.
    fn resize_default(&mut self, len: usize) -> bool;
}

/// Type-erased access to a value of an [`Enumerated`](crate::Enumerated) enum.
pub trait EnumValue: Reflect {
    /// Declared name of the enum type.
    fn enum_type_name(&self) -> &'static str;

    fn enumerator_name(&self) -> Result<&'static str>;

    fn underlying(&self) -> Result<i64>;

    fn assign_name(&mut self, name: &str) -> Result<()>;

    /// Fails without touching `self` unless `value` belongs to an enumerator.
    fn assign_underlying(&mut self, value: i64) -> Result<()>;
}

macro_rules! impl_scalar {
    ($($ty:ty => $descriptor:expr),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    $descriptor
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }

                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Scalar(self)
                }

                fn reflect_mut(&mut self) -> ReflectMut<'_> {
                    ReflectMut::Scalar(self)
                }
            }

            impl Scalar for $ty {
                fn scalar_cmp(&self, other: &dyn Reflect) -> Option<Ordering> {
                    other
                        .downcast_ref::<$ty>()
                        .and_then(|other| self.partial_cmp(other))
                }

                fn to_json(&self) -> serde_json::Result<Value> {
                    // serde_json writes non-finite floats as null.
                    let value = serde_json::to_value(self)?;
                    if value.is_null() {
                        let message = format!("{self:?} cannot be represented in JSON");
                        return Err(serde_json::Error::custom(message));
                    }
                    Ok(value)
                }

                fn assign_json(&mut self, value: &Value) -> serde_json::Result<()> {
                    *self = <$ty>::deserialize(value)?;
                    Ok(())
                }
            }
        )*
    };
}

impl_scalar! {
    bool => TypeDescriptor::Bool,
    char => TypeDescriptor::Char,
    i8 => TypeDescriptor::Int { bits: 8, signed: true },
    i16 => TypeDescriptor::Int { bits: 16, signed: true },
    i32 => TypeDescriptor::Int { bits: 32, signed: true },
    i64 => TypeDescriptor::Int { bits: 64, signed: true },
    isize => TypeDescriptor::Int { bits: isize::BITS, signed: true },
    u8 => TypeDescriptor::Int { bits: 8, signed: false },
    u16 => TypeDescriptor::Int { bits: 16, signed: false },
    u32 => TypeDescriptor::Int { bits: 32, signed: false },
    u64 => TypeDescriptor::Int { bits: 64, signed: false },
    usize => TypeDescriptor::Int { bits: usize::BITS, signed: false },
    f32 => TypeDescriptor::Float { bits: 32 },
    f64 => TypeDescriptor::Float { bits: 64 },
    String => TypeDescriptor::String,
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Array {
            element: Box::new(T::type_descriptor()),
            len: N,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Sequence(self)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Sequence(self)
    }
}

impl<T: Reflect, const N: usize> Sequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn fixed_len(&self) -> Option<usize> {
        Some(N)
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|element| element as &dyn Reflect)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|element| element as &mut dyn Reflect)
    }

    fn resize_default(&mut self, len: usize) -> bool {
        len == N
    }
}

impl<T: Reflect + Default> Reflect for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Sequence {
            element: Box::new(T::type_descriptor()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Sequence(self)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Sequence(self)
    }
}

impl<T: Reflect + Default> Sequence for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn fixed_len(&self) -> Option<usize> {
        None
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|element| element as &dyn Reflect)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|element| element as &mut dyn Reflect)
    }

    fn resize_default(&mut self, len: usize) -> bool {
        self.resize_with(len, T::default);
        true
    }
}
