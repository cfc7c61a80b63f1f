use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditError>;

/// Errors from reading or editing a document snapshot.
///
/// An operation that returns an error never produces a document: the
/// caller's current snapshot is still the source of truth.
#[derive(Debug, Error)]
pub enum EditError {
    /// The path does not resolve: unknown key, wrong container kind, or an
    /// index past the end on `get`/`set`.
    #[error("path `{path}` does not resolve: {reason}")]
    Path { path: String, reason: String },

    /// `remove_at` with an index outside `0..len`.
    #[error("index {index} out of range for `{path}` (len {len})")]
    Index {
        path: String,
        index: usize,
        len: usize,
    },

    /// The written value has the wrong shape for the addressed field.
    #[error("invalid value for `{path}`: expected {expected}")]
    Value { path: String, expected: &'static str },

    #[error("no document is open")]
    NoDocument,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditError {
    pub fn path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Path {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn value(path: impl Into<String>, expected: &'static str) -> Self {
        Self::Value {
            path: path.into(),
            expected,
        }
    }
}
