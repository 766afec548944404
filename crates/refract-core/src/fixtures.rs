//! Hand-written registry tables shared by the unit tests.

use std::any::Any;

use crate::enums::{Enumerated, Enumerator};
use crate::meta::{BaseLink, FieldDescriptor, RecordMeta, TypeDescriptor, TypeTag, Visitable};
use crate::reflect::{Reflect, ReflectMut, ReflectRef};
use crate::registry::{Registry, RegistryBuilder};

macro_rules! record_reflect {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::Record(TypeTag::of::<Self>())
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }

                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Record(self)
                }

                fn reflect_mut(&mut self) -> ReflectMut<'_> {
                    ReflectMut::Record(self)
                }
            }
        )*
    };
}

macro_rules! enum_reflect {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::Enum(TypeTag::of::<Self>())
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }

                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Enum(self)
                }

                fn reflect_mut(&mut self) -> ReflectMut<'_> {
                    ReflectMut::Enum(self)
                }
            }
        )*
    };
}

macro_rules! field {
    ($owner:ty, $name:ident: $ty:ty) => {
        FieldDescriptor::new::<$ty>(
            stringify!($name),
            |instance| {
                instance
                    .downcast_ref::<$owner>()
                    .map(|this| &this.$name as &dyn Reflect)
            },
            |instance| {
                instance
                    .downcast_mut::<$owner>()
                    .map(|this| &mut this.$name as &mut dyn Reflect)
            },
        )
    };
}

macro_rules! base {
    ($owner:ty, $name:ident: $ty:ty) => {
        BaseLink {
            ty: TypeTag::of::<$ty>(),
            upcast: |instance| {
                instance
                    .downcast_ref::<$owner>()
                    .map(|this| &this.$name as &dyn Any)
            },
            upcast_mut: |instance| {
                instance
                    .downcast_mut::<$owner>()
                    .map(|this| &mut this.$name as &mut dyn Any)
            },
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basic {
    pub b: bool,
    pub i: i32,
    pub d: f64,
}

impl Basic {
    pub fn new(b: bool, i: i32, d: f64) -> Self {
        Self { b, i, d }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nesting {
    pub i: i32,
    pub d: f64,
    pub bs: Basic,
    pub arr: [Basic; 3],
    pub list: Vec<Basic>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseRecord {
    pub base_field: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Child {
    pub child_field: i32,
    pub base: BaseRecord,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrandChild {
    pub own: String,
    pub child: Child,
}

/// Left out of [`registry`] on purpose.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unreflected {
    pub hidden: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Orphan {
    pub orphan_field: i32,
    pub base: Unreflected,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiBase {
    pub own: u8,
    pub left: Basic,
    pub right: BaseRecord,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Empty {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unscoped {
    First = 2,
    Second = 3,
    Third = 4,
    Fourth = 5,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scoped {
    #[default]
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tagged {
    pub kind: Scoped,
    pub weight: f32,
}

record_reflect!(
    Basic,
    Nesting,
    BaseRecord,
    Child,
    GrandChild,
    Unreflected,
    Orphan,
    MultiBase,
    Empty,
    Tagged
);
enum_reflect!(Unscoped, Scoped);

impl Visitable for Basic {
    fn record_meta() -> RecordMeta {
        RecordMeta::new::<Self>("Basic")
            .with_field(field!(Basic, b: bool))
            .with_field(field!(Basic, i: i32))
            .with_field(field!(Basic, d: f64))
    }
}

impl Visitable for Nesting {
    fn record_meta() -> RecordMeta {
        RecordMeta::new::<Self>("Nesting")
            .with_field(field!(Nesting, i: i32))
            .with_field(field!(Nesting, d: f64))
            .with_field(field!(Nesting, bs: Basic))
            .with_field(field!(Nesting, arr: [Basic; 3]))
            .with_field(field!(Nesting, list: Vec<Basic>))
    }
}

impl Visitable for BaseRecord {
    fn record_meta() -> RecordMeta {
        RecordMeta::new::<Self>("BaseRecord").with_field(field!(BaseRecord, base_field: i32))
    }
}

impl Visitable for Child {
    fn record_meta() -> RecordMeta {
        RecordMeta::new::<Self>("Child")
            .with_field(field!(Child, child_field: i32))
            .with_base(base!(Child, base: BaseRecord))
    }
}

impl Visitable for GrandChild {
    fn record_meta() -> RecordMeta {
        RecordMeta::new::<Self>("GrandChild")
            .with_field(field!(GrandChild, own: String))
            .with_base(base!(GrandChild, child: Child))
    }
}

impl Visitable for Unreflected {
    fn record_meta() -> RecordMeta {
        RecordMeta::new::<Self>("Unreflected").with_field(field!(Unreflected, hidden: i32))
    }
}

impl Visitable for Orphan {
    fn record_meta() -> RecordMeta {
        RecordMeta::new::<Self>("Orphan")
            .with_field(field!(Orphan, orphan_field: i32))
            .with_base(base!(Orphan, base: Unreflected))
    }
}

impl Visitable for MultiBase {
    fn record_meta() -> RecordMeta {
        RecordMeta::new::<Self>("MultiBase")
            .with_field(field!(MultiBase, own: u8))
            .with_base(base!(MultiBase, left: Basic))
            .with_base(base!(MultiBase, right: BaseRecord))
    }
}

impl Visitable for Empty {
    fn record_meta() -> RecordMeta {
        RecordMeta::new::<Self>("Empty")
    }
}

impl Visitable for Tagged {
    fn record_meta() -> RecordMeta {
        RecordMeta::new::<Self>("Tagged")
            .with_field(field!(Tagged, kind: Scoped))
            .with_field(field!(Tagged, weight: f32))
    }
}

impl Enumerated for Unscoped {
    const NAME: &'static str = "Unscoped";
    const ENUMERATORS: &'static [Enumerator<Self>] = &[
        Enumerator {
            enumerator: Unscoped::First,
            name: "First",
            value: Unscoped::First as i64,
        },
        Enumerator {
            enumerator: Unscoped::Second,
            name: "Second",
            value: Unscoped::Second as i64,
        },
        Enumerator {
            enumerator: Unscoped::Third,
            name: "Third",
            value: Unscoped::Third as i64,
        },
        Enumerator {
            enumerator: Unscoped::Fourth,
            name: "Fourth",
            value: Unscoped::Fourth as i64,
        },
    ];
}

impl Enumerated for Scoped {
    const NAME: &'static str = "Scoped";
    const ENUMERATORS: &'static [Enumerator<Self>] = &[
        Enumerator {
            enumerator: Scoped::First,
            name: "First",
            value: 0,
        },
        Enumerator {
            enumerator: Scoped::Second,
            name: "Second",
            value: 1,
        },
        Enumerator {
            enumerator: Scoped::Third,
            name: "Third",
            value: 2,
        },
    ];
}

/// Every fixture except [`Unreflected`].
pub fn registry() -> Registry {
    RegistryBuilder::new()
        .record::<Basic>()
        .record::<Nesting>()
        .record::<BaseRecord>()
        .record::<Child>()
        .record::<GrandChild>()
        .record::<Orphan>()
        .record::<MultiBase>()
        .record::<Empty>()
        .record::<Tagged>()
        .enumeration::<Unscoped>()
        .enumeration::<Scoped>()
        .build()
}

pub fn nesting() -> Nesting {
    Nesting {
        i: 9,
        d: -2.2,
        bs: Basic::new(true, 1, 2.5),
        arr: [
            Basic::new(true, 1, 2.5),
            Basic::new(false, -5, 3.4),
            Basic::new(true, 1, 2.5),
        ],
        list: vec![Basic::new(false, -5, 3.4), Basic::new(false, -5, 3.4)],
    }
}
