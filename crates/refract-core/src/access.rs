//! Index-based field access.
//!
//! Field `i` of a record is the field bound at the `i`-th visitor call of a
//! full traversal, so indices count own fields first and inherited fields
//! after them.

use std::any::Any;
use std::ops::ControlFlow;

use crate::error::{Error, Result};
use crate::meta::{BaseLink, FieldDescriptor, RecordMeta, TypeDescriptor};
use crate::reflect::Reflect;
use crate::registry::Registry;
use crate::visit::{FieldSite, VisitOptions, resolve, resolve_mut};

/// A field found by index, with the base chain needed to reach it.
struct Located<'r> {
    chain: Vec<&'r BaseLink>,
    owner: &'r RecordMeta,
    field: &'r FieldDescriptor,
}

impl<'r> Located<'r> {
    fn site(&self) -> FieldSite<'r, '_> {
        FieldSite {
            chain: self.chain.as_slice(),
            owner: self.owner,
            field: self.field,
        }
    }
}

impl Registry {
    fn locate<'r>(&'r self, record: &'r RecordMeta, index: usize) -> Result<Located<'r>> {
        let mut seen = 0;
        let flow = self.walk(record, VisitOptions::default(), &mut |site| {
            if seen == index {
                return Ok(ControlFlow::Break(Located {
                    chain: site.chain.to_vec(),
                    owner: site.owner,
                    field: site.field,
                }));
            }
            seen += 1;
            Ok(ControlFlow::Continue(()))
        })?;

        match flow {
            ControlFlow::Break(located) => Ok(located),
            ControlFlow::Continue(()) => Err(Error::IndexOutOfRange { index, count: seen }),
        }
    }

    /// Number of fields of `T`, inherited fields included.
    pub fn field_count<T: Any>(&self) -> Result<usize> {
        let record = self.record::<T>()?;
        self.count_fields(record)
    }

    /// Number of fields of the record behind `instance`.
    pub fn field_count_of(&self, instance: &dyn Reflect) -> Result<usize> {
        let record = self.record_of(instance)?;
        self.count_fields(record)
    }

    fn count_fields(&self, record: &RecordMeta) -> Result<usize> {
        let mut count = 0;
        let _ = self.walk::<()>(record, VisitOptions::default(), &mut |_| {
            count += 1;
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(count)
    }

    /// Field `index` of `instance`.
    pub fn get<'a>(&self, instance: &'a dyn Reflect, index: usize) -> Result<&'a dyn Reflect> {
        let located = self.locate(self.record_of(instance)?, index)?;
        resolve(instance.as_any(), &located.site())
    }

    /// Field `index` of `instance`, writable in place.
    pub fn get_mut<'a>(
        &self,
        instance: &'a mut dyn Reflect,
        index: usize,
    ) -> Result<&'a mut dyn Reflect> {
        let located = self.locate(self.record_of(&*instance)?, index)?;
        resolve_mut(instance.as_any_mut(), &located.site())
    }

    /// Field `index` of `instance` as a `&F`.
    pub fn get_as<'a, F: Reflect>(&self, instance: &'a dyn Reflect, index: usize) -> Result<&'a F> {
        let field = self.get(instance, index)?;
        let found = field.type_name();
        field.downcast_ref::<F>().ok_or(Error::FieldTypeMismatch {
            index,
            expected: std::any::type_name::<F>(),
            found,
        })
    }

    /// Field `index` of `instance` as a `&mut F`.
    pub fn get_as_mut<'a, F: Reflect>(
        &self,
        instance: &'a mut dyn Reflect,
        index: usize,
    ) -> Result<&'a mut F> {
        let field = self.get_mut(instance, index)?;
        let found = field.type_name();
        field.downcast_mut::<F>().ok_or(Error::FieldTypeMismatch {
            index,
            expected: std::any::type_name::<F>(),
            found,
        })
    }

    /// Name of field `index` of `T`.
    pub fn get_name<T: Any>(&self, index: usize) -> Result<&'static str> {
        let located = self.locate(self.record::<T>()?, index)?;
        Ok(located.field.name)
    }

    /// Declared type of field `index` of `T`.
    pub fn field_type<T: Any>(&self, index: usize) -> Result<&TypeDescriptor> {
        let located = self.locate(self.record::<T>()?, index)?;
        Ok(&located.field.ty)
    }
}
