//! Fixture types shared by the integration tests.

#![allow(dead_code)]

use refract::{Enumerated, Registry, Visitable};

#[derive(Visitable, Debug, Clone, Default, PartialEq)]
pub struct BasicStruct {
    pub b: bool,
    pub i: i32,
    pub d: f64,
}

impl BasicStruct {
    pub fn new(b: bool, i: i32, d: f64) -> Self {
        Self { b, i, d }
    }
}

#[derive(Visitable, Debug, Clone, Default, PartialEq)]
pub struct NestingStruct {
    pub i: i32,
    pub d: f64,
    pub bs: BasicStruct,
    pub basics_arr: [BasicStruct; 3],
    pub basics_vec: Vec<BasicStruct>,
}

#[derive(Visitable, Debug, Clone, Default, PartialEq)]
pub struct BasicClass {
    pub public_field: i32,
}

#[derive(Visitable, Debug, Clone, Default, PartialEq)]
pub struct ChildClass {
    pub child_field: i32,
    #[visit(base)]
    pub base: BasicClass,
}

#[derive(Visitable, Debug, Clone, Default, PartialEq)]
pub struct SecondLevelChild {
    pub label: String,
    #[visit(base)]
    pub parent: ChildClass,
}

/// Never registered.
#[derive(Visitable, Debug, Clone, Default, PartialEq)]
pub struct UnreflectedBase {
    pub hidden: i32,
}

#[derive(Visitable, Debug, Clone, Default, PartialEq)]
pub struct ChildOfUnreflectedBase {
    pub child_field: i32,
    #[visit(base)]
    pub base: UnreflectedBase,
}

#[derive(Visitable, Debug, Clone, Default, PartialEq)]
pub struct Annotated {
    pub kept: u16,
    #[visit(skip)]
    pub scratch: Vec<u8>,
    #[visit(rename = "label")]
    pub name: String,
    pub r#type: u8,
}

#[derive(Enumerated, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unscoped {
    First = 2,
    Second,
    Third,
    Fourth,
}

#[derive(Enumerated, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scoped {
    #[default]
    First,
    Second,
    Third,
}

#[derive(Visitable, Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub mode: Scoped,
    pub history: [Scoped; 2],
    pub gain: f32,
}

#[derive(Visitable, Debug, Clone, Default, PartialEq)]
pub struct Wrapper<T> {
    pub inner: T,
    pub count: u32,
}

pub fn registry() -> Registry {
    Registry::builder()
        .record::<BasicStruct>()
        .record::<NestingStruct>()
        .record::<BasicClass>()
        .record::<ChildClass>()
        .record::<SecondLevelChild>()
        .record::<ChildOfUnreflectedBase>()
        .record::<Annotated>()
        .record::<Settings>()
        .record::<Wrapper<BasicStruct>>()
        .enumeration::<Unscoped>()
        .enumeration::<Scoped>()
        .build()
}

pub fn b1() -> BasicStruct {
    BasicStruct::new(true, 1, 2.5)
}

pub fn b2() -> BasicStruct {
    BasicStruct::new(false, -5, 3.4)
}

pub fn nesting() -> NestingStruct {
    NestingStruct {
        i: 9,
        d: -2.2,
        bs: b1(),
        basics_arr: [b1(), b2(), b1()],
        basics_vec: vec![b2(), b2()],
    }
}
