//! JSON marshaling for refract visitable types.
//!
//! Encoding and decoding are built purely on field traversal: a record is
//! written as an object whose keys follow traversal order (own fields, then
//! inherited fields), and read back by looking up every visited field by
//! name. Nested records, fixed arrays, `Vec`s and enums recurse through the
//! same adapter.
//!
//! # Example
//!
//! ```ignore
//! use refract::json::JsonAdapter;
//!
//! let adapter = JsonAdapter::new(&registry);
//! let document = adapter.to_document(&basic)?;
//! let back: Basic = adapter.from_document(&document)?;
//! ```

mod error;

pub use error::{Error, Result};

use std::ops::ControlFlow;

use log::trace;
use refract_core::{Reflect, ReflectMut, ReflectRef, Registry, VisitOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How enum fields are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumRepr {
    /// The enumerator name, e.g. `"Fourth"`.
    #[default]
    Name,
    /// The underlying integer, e.g. `5`.
    Value,
}

/// Encoding settings. Decoding accepts every representation regardless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    pub enum_repr: EnumRepr,
}

/// Encodes and decodes instances of registered types.
#[derive(Debug, Clone, Copy)]
pub struct JsonAdapter<'r> {
    registry: &'r Registry,
    options: JsonOptions,
}

impl<'r> JsonAdapter<'r> {
    /// Adapter over `registry` with default options.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            options: JsonOptions::default(),
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: JsonOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    pub fn options(&self) -> JsonOptions {
        self.options
    }

    // ------------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------------

    /// Encodes `instance`. Records become objects keyed by field name.
    ///
    /// Fails with [`Error::InvalidValue`] on a value JSON cannot represent,
    /// such as a non-finite float.
    pub fn to_document(&self, instance: &dyn Reflect) -> Result<Value> {
        self.encode_value(instance, "")
    }

    /// Compact JSON text of `instance`.
    pub fn to_string(&self, instance: &dyn Reflect) -> Result<String> {
        Ok(serde_json::to_string(&self.to_document(instance)?)?)
    }

    /// Indented JSON text of `instance`.
    pub fn to_string_pretty(&self, instance: &dyn Reflect) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document(instance)?)?)
    }

    fn encode_value(&self, value: &dyn Reflect, path: &str) -> Result<Value> {
        match value.reflect_ref() {
            ReflectRef::Scalar(scalar) => {
                scalar
                    .to_json()
                    .map_err(|source| Error::InvalidValue {
                        field: display_path(path),
                        source,
                    })
            }
            ReflectRef::Record(record) => self.encode_record(record, path),
            ReflectRef::Sequence(sequence) => {
                let mut items = Vec::with_capacity(sequence.len());
                for index in 0..sequence.len() {
                    if let Some(element) = sequence.element(index) {
                        items.push(self.encode_value(element, &format!("{path}[{index}]"))?);
                    }
                }
                Ok(Value::Array(items))
            }
            ReflectRef::Enum(enumerator) => match self.options.enum_repr {
                EnumRepr::Name => Ok(Value::from(enumerator.enumerator_name()?)),
                EnumRepr::Value => Ok(Value::from(enumerator.underlying()?)),
            },
        }
    }

    fn encode_record(&self, record: &dyn Reflect, path: &str) -> Result<Value> {
        let mut object = Map::new();
        let flow = self.registry.try_visit_reflect(
            record,
            VisitOptions::default(),
            &mut |name, field| match self.encode_value(field, &join_path(path, name)) {
                Ok(value) => {
                    object.insert(name.to_string(), value);
                    ControlFlow::Continue(())
                }
                Err(e) => ControlFlow::Break(e),
            },
        )?;
        if let ControlFlow::Break(e) = flow {
            return Err(e);
        }
        Ok(Value::Object(object))
    }

    // ------------------------------------------------------------------------
    // Decoding
    // ------------------------------------------------------------------------

    /// Decodes a new `T`, starting from `T::default()`.
    pub fn from_document<T: Reflect + Default>(&self, document: &Value) -> Result<T> {
        let mut instance = T::default();
        self.assign_document(&mut instance, document)?;
        Ok(instance)
    }

    /// Parses `text` and decodes a new `T`.
    pub fn from_str<T: Reflect + Default>(&self, text: &str) -> Result<T> {
        let document: Value = serde_json::from_str(text)?;
        self.from_document(&document)
    }

    /// Decodes `document` into an existing instance, field by field.
    ///
    /// Decoding stops at the first bad field. Fields visited before it keep
    /// their decoded values.
    pub fn assign_document(&self, instance: &mut dyn Reflect, document: &Value) -> Result<()> {
        self.decode_value(instance, document, "")
    }

    fn decode_value(&self, target: &mut dyn Reflect, document: &Value, path: &str) -> Result<()> {
        match target.reflect_mut() {
            ReflectMut::Scalar(scalar) => {
                scalar
                    .assign_json(document)
                    .map_err(|source| Error::InvalidValue {
                        field: display_path(path),
                        source,
                    })
            }
            ReflectMut::Record(record) => self.decode_record(record, document, path),
            ReflectMut::Sequence(sequence) => {
                let Value::Array(items) = document else {
                    return Err(Error::UnexpectedShape {
                        field: display_path(path),
                        expected: "an array",
                    });
                };
                let sized = match sequence.fixed_len() {
                    Some(expected) => expected == items.len(),
                    None => sequence.resize_default(items.len()),
                };
                if !sized || sequence.len() != items.len() {
                    return Err(Error::ArraySizeMismatch {
                        field: display_path(path),
                        expected: sequence.len(),
                        actual: items.len(),
                    });
                }
                for (index, item) in items.iter().enumerate() {
                    if let Some(element) = sequence.element_mut(index) {
                        self.decode_value(element, item, &format!("{path}[{index}]"))?;
                    }
                }
                Ok(())
            }
            ReflectMut::Enum(enumerator) => match document {
                Value::String(name) => Ok(enumerator.assign_name(name)?),
                Value::Number(number) => {
                    let raw = number.as_i64().ok_or_else(|| Error::UnexpectedShape {
                        field: display_path(path),
                        expected: "an integer enumerator value",
                    })?;
                    Ok(enumerator.assign_underlying(raw)?)
                }
                _ => Err(Error::UnexpectedShape {
                    field: display_path(path),
                    expected: "an enumerator name or value",
                }),
            },
        }
    }

    fn decode_record(&self, record: &mut dyn Reflect, document: &Value, path: &str) -> Result<()> {
        let Value::Object(object) = document else {
            return Err(Error::UnexpectedShape {
                field: display_path(path),
                expected: "an object",
            });
        };

        let flow = self.registry.try_visit_reflect_mut(
            record,
            VisitOptions::default(),
            &mut |name, field| {
                let field_path = join_path(path, name);
                let decoded = match object.get(name) {
                    Some(value) => self.decode_value(field, value, &field_path),
                    None => Err(Error::MissingField { field: field_path }),
                };
                match decoded {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(e) => {
                        trace!("Failed to decode field: {e}");
                        ControlFlow::Break(e)
                    }
                }
            },
        )?;
        match flow {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(e) => Err(e),
        }
    }
}

impl JsonAdapter<'static> {
    /// Adapter over the process-wide registry.
    pub fn global() -> Result<Self> {
        Ok(Self::new(Registry::global()?))
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

// ============================================================================
// Global Registry Shortcuts
// ============================================================================

/// Encodes `instance` with the process-wide registry.
pub fn to_document(instance: &dyn Reflect) -> Result<Value> {
    JsonAdapter::global()?.to_document(instance)
}

/// Compact JSON text of `instance` with the process-wide registry.
pub fn to_string(instance: &dyn Reflect) -> Result<String> {
    JsonAdapter::global()?.to_string(instance)
}

/// Indented JSON text of `instance` with the process-wide registry.
pub fn to_string_pretty(instance: &dyn Reflect) -> Result<String> {
    JsonAdapter::global()?.to_string_pretty(instance)
}

/// Decodes a new `T` with the process-wide registry.
pub fn from_document<T: Reflect + Default>(document: &Value) -> Result<T> {
    JsonAdapter::global()?.from_document(document)
}

/// Parses `text` and decodes a new `T` with the process-wide registry.
pub fn from_str<T: Reflect + Default>(text: &str) -> Result<T> {
    JsonAdapter::global()?.from_str(text)
}

/// Decodes `document` into `instance` with the process-wide registry.
pub fn assign_document(instance: &mut dyn Reflect, document: &Value) -> Result<()> {
    JsonAdapter::global()?.assign_document(instance, document)
}
