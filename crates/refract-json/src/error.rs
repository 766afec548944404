//! Errors raised while marshaling visitable types to and from JSON.

/// Errors that can occur when encoding or decoding a document.
///
/// Field paths are dotted, with indices for sequence elements, e.g.
/// `arr[1].d`. A top-level field's path is just its name.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing field `{field}`")]
    MissingField {
        field: String,
    },

    #[error("Field `{field}` expects {expected} elements, document has {actual}")]
    ArraySizeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Field `{field}` expects {expected}")]
    UnexpectedShape {
        field: String,
        expected: &'static str,
    },

    #[error("Invalid value for field `{field}`: {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] refract_core::Error),
}

/// Result type for refract JSON operations.
pub type Result<T> = std::result::Result<T, Error>;
