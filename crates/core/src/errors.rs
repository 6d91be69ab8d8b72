use thiserror::Error;

/// Unified error type for the entire sgpa-calculator-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / Records ───────────────────────────────────────────
    #[error("Invalid storage key '{0}': use lowercase letters, digits and underscores")]
    InvalidKey(String),

    #[error("Stored record '{key}' is corrupt: {message}")]
    CorruptRecord { key: String, message: String },

    #[error("Unsupported catalog schema version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Grade Engine ────────────────────────────────────────────────
    #[error("Please select grades for all subjects ({} missing)", .0.len())]
    IncompleteSelection(Vec<usize>),

    #[error("Total credits cannot be zero")]
    ZeroCredits,

    #[error("Invalid previous semester data: {0}")]
    InvalidPriorData(String),

    // ── Catalog / History ───────────────────────────────────────────
    #[error("Subject validation failed: {0}")]
    ValidationError(String),

    #[error("Subject index {index} is out of range (catalog has {len} subjects)")]
    SubjectIndexOutOfRange { index: usize, len: usize },

    #[error("Subject not found: {0}")]
    SubjectNotFound(String),

    #[error("No subject edit is in progress")]
    NoEditInProgress,

    #[error("Nothing to save: calculate a result first")]
    NothingToSave,
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
