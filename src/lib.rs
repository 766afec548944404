//! # 🔎 Refract - Metadata-Driven Field Traversal for Rust
//!
//! Refract lets generic algorithms (structural comparison, JSON marshaling,
//! field listing) work over any number of record and enum types without
//! hard-coding their shapes. Each type describes itself once through a
//! derived metadata table; the algorithms only ever walk those tables.
//!
//! ## ✨ Quick Start
//!
//! ```ignore
//! use refract::{Enumerated, Registry, Visitable};
//!
//! #[derive(Visitable, Default)]
//! struct Base {
//!     base_field: i32,
//! }
//!
//! #[derive(Visitable, Default)]
//! struct Child {
//!     child_field: i32,
//!     #[visit(base)]
//!     base: Base,
//! }
//!
//! #[derive(Enumerated, Clone, Copy, PartialEq)]
//! enum Level {
//!     Low = 1,
//!     High = 10,
//! }
//!
//! let registry = Registry::builder()
//!     .record::<Base>()
//!     .record::<Child>()
//!     .enumeration::<Level>()
//!     .build();
//!
//! // Own fields first, then inherited ones.
//! assert_eq!(registry.field_names::<Child>()?, ["child_field", "base_field"]);
//! assert_eq!(registry.field_count::<Child>()?, 2);
//!
//! let child = Child::default();
//! registry.visit(&child, |name, value| println!("{name} = {value:?}"))?;
//!
//! assert_eq!(refract::enum_name(Level::High)?, "High");
//! assert!(refract::enum_contains::<Level>(10));
//! ```
//!
//! ## 🏗️ Architecture
//!
//! - **[`refract_core`]**: registry, traversal engine, index accessors,
//!   comparison and enum introspection
//! - **[`json`]**: JSON marshaling built on traversal
//! - **[`refract_macros`]**: `#[derive(Visitable)]` and `#[derive(Enumerated)]`
//! - **`refract-demo`**: a small program printing field tables, JSON and a
//!   dominance matrix for sample types
//!
//! ## 🔍 Traversal Order
//!
//! Every operation shares one order: a record's own fields in declaration
//! order, then each registered base in declaration order, depth-first. An
//! unregistered base contributes no fields. Field indices, comparison and
//! JSON key order all follow it.
//!
//! ## ⚖️ Comparison
//!
//! [`Registry::less_than`] and [`Registry::greater_than`] are componentwise
//! dominance: every field `<=` (or `>=`) and at least one different. Two
//! unequal values may be neither less nor greater than each other.

// Re-export the core engine
pub use refract_core::*;

// Re-export the derive macros
pub use refract_macros::{Enumerated, Visitable};

/// JSON marshaling for visitable types.
pub mod json {
    pub use refract_json::*;
}
