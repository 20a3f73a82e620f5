use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io { path: PathBuf, message: String },
    /// Value under `key` is not valid JSON or has the wrong shape.
    Json { key: String, message: String },
    /// Key contains characters outside `[A-Za-z0-9_-]`.
    InvalidKey(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Json { key, message } => write!(f, "value for '{key}': {message}"),
            Self::InvalidKey(key) => write!(f, "invalid store key: '{key}'"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug)]
pub enum StartupError {
    Store(StoreError),
    /// Migrated entries failed validation and were not persisted.
    Validation { errors: Vec<String> },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "store error: {e}"),
            Self::Validation { errors } => {
                write!(f, "migrated entries failed validation ({} problems): {}", errors.len(), errors.join("; "))
            }
        }
    }
}

impl std::error::Error for StartupError {}

impl From<StoreError> for StartupError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

#[derive(Debug)]
pub enum TransferError {
    Json(String),
    /// Document was written by a newer exporter.
    UnsupportedFormat(u32),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "export document: {msg}"),
            Self::UnsupportedFormat(v) => write!(f, "unsupported export format version {v}"),
        }
    }
}

impl std::error::Error for TransferError {}
