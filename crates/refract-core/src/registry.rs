//! The metadata registry.
//!
//! A [`Registry`] maps type identity to exactly one entry: a [`RecordMeta`]
//! for visitable records or an [`EnumMeta`] for enums. It is assembled once
//! with a [`RegistryBuilder`] and never mutated afterwards, so a built
//! registry can be shared freely between threads.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::OnceLock;

use log::{debug, warn};

use crate::enums::{EnumMeta, Enumerated};
use crate::error::{Error, Result};
use crate::meta::{FieldDescriptor, RecordMeta, TypeTag, Visitable};
use crate::reflect::Reflect;

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// A registry entry.
#[derive(Debug, Clone)]
pub enum Entry {
    Record(RecordMeta),
    Enum(EnumMeta),
}

impl Entry {
    /// Declared name of the record or enum.
    pub fn name(&self) -> &'static str {
        match self {
            Entry::Record(meta) => meta.name,
            Entry::Enum(meta) => meta.name,
        }
    }

    fn tag(&self) -> TypeTag {
        match self {
            Entry::Record(meta) => meta.ty,
            Entry::Enum(meta) => meta.ty,
        }
    }
}

/// Collects entries before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<TypeId, Entry>,
    order: Vec<TypeId>,
}

impl RegistryBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record type from its own table.
    pub fn record<T: Visitable>(self) -> Self {
        self.insert_record(T::record_meta())
    }

    /// Registers an enum type from its own table.
    pub fn enumeration<E: Enumerated>(self) -> Self {
        self.insert_enum(E::enum_meta())
    }

    /// Registers a hand-written record table.
    pub fn insert_record(self, meta: RecordMeta) -> Self {
        self.insert(Entry::Record(meta))
    }

    /// Registers a hand-written enum table.
    pub fn insert_enum(self, meta: EnumMeta) -> Self {
        self.insert(Entry::Enum(meta))
    }

    fn insert(mut self, entry: Entry) -> Self {
        let tag = entry.tag();
        if self.entries.contains_key(&tag.id()) {
            warn!(
                "Ignoring second registration of `{}`; the first entry is kept",
                tag.name()
            );
            return self;
        }

        match &entry {
            Entry::Record(meta) => debug!(
                "Registered record `{}` ({} fields, {} bases)",
                meta.name,
                meta.fields.len(),
                meta.bases.len()
            ),
            Entry::Enum(meta) => debug!(
                "Registered enum `{}` ({} enumerators)",
                meta.name,
                meta.enumerators.len()
            ),
        }
        self.order.push(tag.id());
        self.entries.insert(tag.id(), entry);
        self
    }

    /// Freezes the collected entries.
    pub fn build(self) -> Registry {
        debug!("Built registry with {} entries", self.order.len());
        Registry {
            entries: self.entries,
            order: self.order,
        }
    }
}

/// Immutable map from type identity to metadata.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<TypeId, Entry>,
    order: Vec<TypeId>,
}

impl Registry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Installs `registry` as the process-wide registry.
    ///
    /// Installation happens at most once.
    pub fn install(registry: Registry) -> Result<&'static Registry> {
        GLOBAL
            .set(registry)
            .map_err(|_| Error::RegistryAlreadyInstalled)?;
        Self::global()
    }

    /// The process-wide registry.
    pub fn global() -> Result<&'static Registry> {
        GLOBAL.get().ok_or(Error::RegistryNotInstalled)
    }

    /// Whether `T` has a record entry.
    pub fn is_visitable<T: Any>(&self) -> bool {
        self.is_visitable_id(TypeId::of::<T>())
    }

    /// Whether the type with id `id` has a record entry.
    pub fn is_visitable_id(&self, id: TypeId) -> bool {
        self.lookup_record(id).is_some()
    }

    /// Record entry for `id`, if any.
    pub fn lookup_record(&self, id: TypeId) -> Option<&RecordMeta> {
        match self.entries.get(&id) {
            Some(Entry::Record(meta)) => Some(meta),
            _ => None,
        }
    }

    /// Record entry for `T`.
    pub fn record<T: Any>(&self) -> Result<&RecordMeta> {
        self.lookup_record(TypeId::of::<T>())
            .ok_or(Error::NotVisitable(std::any::type_name::<T>()))
    }

    /// Record entry for the concrete type behind `value`.
    pub fn record_of(&self, value: &dyn Reflect) -> Result<&RecordMeta> {
        self.lookup_record(value.concrete_type_id())
            .ok_or(Error::NotVisitable(value.type_name()))
    }

    /// Enum entry for `E`.
    pub fn enum_meta<E: Any>(&self) -> Result<&EnumMeta> {
        match self.entries.get(&TypeId::of::<E>()) {
            Some(Entry::Enum(meta)) => Ok(meta),
            _ => Err(Error::NotVisitable(std::any::type_name::<E>())),
        }
    }

    /// Own fields of `T` in declaration order. Inherited fields are not
    /// included.
    pub fn fields_of<T: Any>(&self) -> Result<&[FieldDescriptor]> {
        Ok(&self.record::<T>()?.fields)
    }

    /// Direct bases of `T` in declaration order, registered or not.
    pub fn bases_of<T: Any>(&self) -> Result<Vec<TypeTag>> {
        Ok(self.record::<T>()?.bases.iter().map(|b| b.ty).collect())
    }

    /// Number of entries, records and enums together.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Declared names of all entries in registration order.
    pub fn type_names(&self) -> Vec<&'static str> {
        self.entries().map(Entry::name).collect()
    }
}
