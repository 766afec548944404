//! Errors raised by registry queries, traversal and enum lookups.

/// Errors that can occur while querying metadata or walking an instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Type `{0}` is not visitable: no registry entry")]
    NotVisitable(&'static str),

    #[error("Field index {index} out of range for a type with {count} fields")]
    IndexOutOfRange {
        index: usize,
        count: usize,
    },

    #[error("Field {index} has type `{found}`, not `{expected}`")]
    FieldTypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Expected an instance of `{expected}`, got `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value is not an enumerator of `{0}`")]
    UnknownEnumerator(&'static str),

    #[error("`{enum_name}` has no enumerator named `{name}`")]
    UnknownEnumeratorName {
        enum_name: &'static str,
        name: String,
    },

    #[error("`{enum_name}` has no enumerator with underlying value {value}")]
    UnknownEnumeratorValue {
        enum_name: &'static str,
        value: i64,
    },

    #[error("Accessor for `{record}.{field}` rejected the instance it was given")]
    BrokenAccessor {
        record: &'static str,
        field: &'static str,
    },

    #[error("A global registry is already installed")]
    RegistryAlreadyInstalled,

    #[error("No global registry installed; call `Registry::install` first")]
    RegistryNotInstalled,
}

/// Result type for refract core operations.
pub type Result<T> = std::result::Result<T, Error>;
