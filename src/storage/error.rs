use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Storage I/O error on {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("Stored value for '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("Could not serialize value for '{key}': {reason}")]
    Serialize { key: String, reason: String },
    #[error("Storage lock poisoned")]
    Poisoned,
}
