//! The traversal engine.
//!
//! Every traversal follows one order: a record's own fields in declaration
//! order, then each registered base in declaration order, recursively. Bases
//! with no registry entry contribute nothing. Indexing, comparison and JSON
//! field order all derive from this order.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::ops::ControlFlow;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::meta::{BaseLink, FieldDescriptor, RecordMeta, TypeDescriptor};
use crate::reflect::Reflect;
use crate::registry::Registry;

/// Traversal settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitOptions {
    /// Descend into base records after the record's own fields.
    pub include_bases: bool,
}

impl Default for VisitOptions {
    fn default() -> Self {
        Self {
            include_bases: true,
        }
    }
}

impl VisitOptions {
    /// Visit only the fields declared on the record itself.
    pub fn own_fields() -> Self {
        Self {
            include_bases: false,
        }
    }
}

/// Position of one field during a walk: the base chain leading to the record
/// that declares it, that record, and the field itself.
pub(crate) struct FieldSite<'r, 'c> {
    pub chain: &'c [&'r BaseLink],
    pub owner: &'r RecordMeta,
    pub field: &'r FieldDescriptor,
}

type SiteVisitor<'v, 'r, B> = dyn for<'c> FnMut(&FieldSite<'r, 'c>) -> Result<ControlFlow<B>> + 'v;

impl Registry {
    pub(crate) fn walk<'r, B>(
        &'r self,
        record: &'r RecordMeta,
        options: VisitOptions,
        f: &mut SiteVisitor<'_, 'r, B>,
    ) -> Result<ControlFlow<B>> {
        let mut chain = Vec::new();
        self.walk_record(record, options, &mut chain, f)
    }

    fn walk_record<'r, B>(
        &'r self,
        record: &'r RecordMeta,
        options: VisitOptions,
        chain: &mut Vec<&'r BaseLink>,
        f: &mut SiteVisitor<'_, 'r, B>,
    ) -> Result<ControlFlow<B>> {
        for field in &record.fields {
            let site = FieldSite {
                chain: chain.as_slice(),
                owner: record,
                field,
            };
            if let ControlFlow::Break(value) = f(&site)? {
                return Ok(ControlFlow::Break(value));
            }
        }

        if !options.include_bases {
            return Ok(ControlFlow::Continue(()));
        }

        for base in &record.bases {
            let Some(base_meta) = self.lookup_record(base.ty.id()) else {
                trace!(
                    "Skipping unregistered base `{}` of `{}`",
                    base.ty.name(),
                    record.name
                );
                continue;
            };
            chain.push(base);
            let flow = self.walk_record(base_meta, options, chain, f)?;
            chain.pop();
            if flow.is_break() {
                return Ok(flow);
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    // ------------------------------------------------------------------------
    // Instance visitation
    // ------------------------------------------------------------------------

    /// Calls `visitor(name, field)` for every field of `instance` in
    /// traversal order.
    pub fn visit(
        &self,
        instance: &dyn Reflect,
        visitor: impl FnMut(&'static str, &dyn Reflect),
    ) -> Result<()> {
        self.visit_with(instance, VisitOptions::default(), visitor)
    }

    /// Like [`visit`](Self::visit), with explicit options.
    pub fn visit_with(
        &self,
        instance: &dyn Reflect,
        options: VisitOptions,
        mut visitor: impl FnMut(&'static str, &dyn Reflect),
    ) -> Result<()> {
        let _ = self.try_visit_reflect::<()>(instance, options, &mut |name, value| {
            visitor(name, value);
            ControlFlow::Continue(())
        })?;
        Ok(())
    }

    /// Like [`visit`](Self::visit), with mutable access to every field.
    pub fn visit_mut(
        &self,
        instance: &mut dyn Reflect,
        mut visitor: impl FnMut(&'static str, &mut dyn Reflect),
    ) -> Result<()> {
        let _ = self.try_visit_reflect_mut::<()>(
            instance,
            VisitOptions::default(),
            &mut |name, value| {
                visitor(name, value);
                ControlFlow::Continue(())
            },
        )?;
        Ok(())
    }

    /// Visits until `visitor` breaks; the break value is returned.
    pub fn try_visit<B>(
        &self,
        instance: &dyn Reflect,
        mut visitor: impl FnMut(&'static str, &dyn Reflect) -> ControlFlow<B>,
    ) -> Result<ControlFlow<B>> {
        self.try_visit_reflect(instance, VisitOptions::default(), &mut visitor)
    }

    /// Mutable [`try_visit`](Self::try_visit).
    pub fn try_visit_mut<B>(
        &self,
        instance: &mut dyn Reflect,
        mut visitor: impl FnMut(&'static str, &mut dyn Reflect) -> ControlFlow<B>,
    ) -> Result<ControlFlow<B>> {
        self.try_visit_reflect_mut(instance, VisitOptions::default(), &mut visitor)
    }

    /// Visits a type-erased instance with a dyn visitor until it breaks.
    pub fn try_visit_reflect<B>(
        &self,
        instance: &dyn Reflect,
        options: VisitOptions,
        visitor: &mut dyn FnMut(&'static str, &dyn Reflect) -> ControlFlow<B>,
    ) -> Result<ControlFlow<B>> {
        let record = self.record_of(instance)?;
        let target = instance.as_any();
        self.walk(record, options, &mut |site| {
            let value = resolve(target, site)?;
            Ok(visitor(site.field.name, value))
        })
    }

    /// Mutable [`try_visit_reflect`](Self::try_visit_reflect).
    pub fn try_visit_reflect_mut<B>(
        &self,
        instance: &mut dyn Reflect,
        options: VisitOptions,
        visitor: &mut dyn FnMut(&'static str, &mut dyn Reflect) -> ControlFlow<B>,
    ) -> Result<ControlFlow<B>> {
        let record = self.record_of(&*instance)?;
        let target = instance.as_any_mut();
        self.walk(record, options, &mut |site| {
            let value = resolve_mut(&mut *target, site)?;
            Ok(visitor(site.field.name, value))
        })
    }

    /// Collects one result per field, in traversal order.
    pub fn visit_accumulate<R>(
        &self,
        instance: &dyn Reflect,
        mut visitor: impl FnMut(&'static str, &dyn Reflect) -> R,
    ) -> Result<Vec<R>> {
        let mut results = Vec::new();
        self.visit(instance, |name, value| results.push(visitor(name, value)))?;
        Ok(results)
    }

    // ------------------------------------------------------------------------
    // Type-level visitation
    // ------------------------------------------------------------------------

    /// Calls `visitor(name, declared_type)` for every field of `T`, without
    /// an instance.
    pub fn visit_type<T: Any>(
        &self,
        visitor: impl FnMut(&'static str, &TypeDescriptor),
    ) -> Result<()> {
        self.visit_type_with::<T>(VisitOptions::default(), visitor)
    }

    /// Like [`visit_type`](Self::visit_type), with explicit options.
    pub fn visit_type_with<T: Any>(
        &self,
        options: VisitOptions,
        visitor: impl FnMut(&'static str, &TypeDescriptor),
    ) -> Result<()> {
        let record = self.record::<T>()?;
        self.visit_meta(record, options, visitor)
    }

    /// Type-level visitation starting from a record entry, e.g. one taken
    /// from [`Registry::entries`].
    pub fn visit_meta<'r>(
        &'r self,
        record: &'r RecordMeta,
        options: VisitOptions,
        mut visitor: impl FnMut(&'static str, &TypeDescriptor),
    ) -> Result<()> {
        let _ = self.walk::<()>(record, options, &mut |site| {
            visitor(site.field.name, &site.field.ty);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(())
    }

    /// Collects one result per field of `T`, in traversal order.
    pub fn visit_type_accumulate<T: Any, R>(
        &self,
        mut visitor: impl FnMut(&'static str, &TypeDescriptor) -> R,
    ) -> Result<Vec<R>> {
        let mut results = Vec::new();
        self.visit_type::<T>(|name, ty| results.push(visitor(name, ty)))?;
        Ok(results)
    }

    /// Field names of `T` in traversal order.
    pub fn field_names<T: Any>(&self) -> Result<Vec<&'static str>> {
        self.visit_type_accumulate::<T, _>(|name, _| name)
    }

    /// Declared field types of `T` in traversal order.
    pub fn field_types<T: Any>(&self) -> Result<Vec<TypeDescriptor>> {
        self.visit_type_accumulate::<T, _>(|_, ty| ty.clone())
    }

    // ------------------------------------------------------------------------
    // Lock-step visitation
    // ------------------------------------------------------------------------

    /// Visits two instances of the same type side by side, handing the
    /// visitor each pair of corresponding fields.
    pub fn visit_pair<T: Reflect>(
        &self,
        lhs: &T,
        rhs: &T,
        mut visitor: impl FnMut(&'static str, &dyn Reflect, &dyn Reflect),
    ) -> Result<()> {
        let _ = self.visit_pair_reflect::<()>(
            lhs,
            rhs,
            VisitOptions::default(),
            &mut |name, l, r| {
                visitor(name, l, r);
                Ok(ControlFlow::Continue(()))
            },
        )?;
        Ok(())
    }

    /// Lock-step visitation over type-erased instances. Fails with
    /// [`Error::TypeMismatch`] unless both have the same concrete type.
    pub fn visit_pair_reflect<B>(
        &self,
        lhs: &dyn Reflect,
        rhs: &dyn Reflect,
        options: VisitOptions,
        visitor: &mut dyn FnMut(&'static str, &dyn Reflect, &dyn Reflect) -> Result<ControlFlow<B>>,
    ) -> Result<ControlFlow<B>> {
        if lhs.concrete_type_id() != rhs.concrete_type_id() {
            return Err(Error::TypeMismatch {
                expected: lhs.type_name(),
                found: rhs.type_name(),
            });
        }
        let record = self.record_of(lhs)?;
        let (left, right) = (lhs.as_any(), rhs.as_any());
        self.walk(record, options, &mut |site| {
            let l = resolve(left, site)?;
            let r = resolve(right, site)?;
            visitor(site.field.name, l, r)
        })
    }
}

fn broken(site: &FieldSite<'_, '_>) -> Error {
    Error::BrokenAccessor {
        record: site.owner.name,
        field: site.field.name,
    }
}

/// Applies the base chain, then the field getter.
pub(crate) fn resolve<'a>(
    instance: &'a dyn Any,
    site: &FieldSite<'_, '_>,
) -> Result<&'a dyn Reflect> {
    let mut target = instance;
    for link in site.chain {
        target = (link.upcast)(target).ok_or_else(|| broken(site))?;
    }
    (site.field.get)(target).ok_or_else(|| broken(site))
}

pub(crate) fn resolve_mut<'a>(
    instance: &'a mut dyn Any,
    site: &FieldSite<'_, '_>,
) -> Result<&'a mut dyn Reflect> {
    let mut target = instance;
    for link in site.chain {
        target = (link.upcast_mut)(target).ok_or_else(|| broken(site))?;
    }
    (site.field.get_mut)(target).ok_or_else(|| broken(site))
}

// ============================================================================
// Typed Dispatch
// ============================================================================

type Handler<'f, R> = Box<dyn FnMut(&'static str, &dyn Reflect) -> R + 'f>;

/// A visitor with one handler per concrete field type and a catch-all.
///
/// ```ignore
/// let mut describe = Dispatch::otherwise(|name, _| format!("{name}: other"))
///     .on::<i32>(|name, value| format!("{name}: int {value}"))
///     .on::<bool>(|name, value| format!("{name}: bool {value}"));
/// let lines = registry.visit_accumulate(&basic, |name, value| describe.call(name, value))?;
/// ```
pub struct Dispatch<'f, R> {
    handlers: HashMap<TypeId, Handler<'f, Option<R>>>,
    otherwise: Handler<'f, R>,
}

impl<'f, R: 'f> Dispatch<'f, R> {
    /// A dispatcher that sends every field to `handler`.
    pub fn otherwise(handler: impl FnMut(&'static str, &dyn Reflect) -> R + 'f) -> Self {
        Self {
            handlers: HashMap::new(),
            otherwise: Box::new(handler),
        }
    }

    /// Routes fields of concrete type `F` to `handler`. A later handler for
    /// the same type replaces the earlier one.
    pub fn on<F: Reflect>(mut self, mut handler: impl FnMut(&'static str, &F) -> R + 'f) -> Self {
        let erased: Handler<'f, Option<R>> =
            Box::new(move |name: &'static str, value: &dyn Reflect| {
                value.downcast_ref::<F>().map(|value| handler(name, value))
            });
        self.handlers.insert(TypeId::of::<F>(), erased);
        self
    }

    /// Whether a handler is registered for the type `id`.
    pub fn handles(&self, id: TypeId) -> bool {
        self.handlers.contains_key(&id)
    }

    /// Runs the handler for the concrete type of `value`, or the catch-all.
    pub fn call(&mut self, name: &'static str, value: &dyn Reflect) -> R {
        if let Some(handler) = self.handlers.get_mut(&value.concrete_type_id()) {
            if let Some(result) = handler(name, value) {
                return result;
            }
        }
        (self.otherwise)(name, value)
    }
}
