use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Enumerates the errors a flow can surface to the person using it.
#[derive(Debug, Error)]
pub enum CheckInError {
    /// A required field was left empty.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session record could not be read, written or removed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// The roster could not be handed over for export.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Enumerates missing or unusable form fields.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Please enter a class name")]
    MissingClassName,

    #[error("Name and email are required")]
    MissingFullName,

    #[error("Name and email are required")]
    MissingEmail,
}

/// Enumerates errors returned by the key-value persistence subsystem.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Represents a failure while reading a key.
    #[error("Failed to read {key}")]
    ReadFailed { key: String, source: io::Error },

    /// Represents a failure while writing a key.
    #[error("Failed to write {key}")]
    WriteFailed { key: String, source: io::Error },

    /// Represents a failure while removing a key.
    #[error("Failed to remove {key}")]
    RemoveFailed { key: String, source: io::Error },

    /// Represents a store that refused the operation outright.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Represents a stored value that is not a valid session record.
    #[error("Malformed record under {key}")]
    MalformedRecord {
        key: String,
        source: serde_json::Error,
    },

    /// Represents a session that could not be serialized.
    #[error("Could not serialize record")]
    SerializationFailed(#[source] serde_json::Error),
}

/// Enumerates errors returned while handing an export to the platform.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Represents a platform without a writable scratch directory.
    #[error("File system directory is not accessible")]
    NoScratchDirectory,

    /// Represents a failure to write the temporary file.
    #[error("Failed to write file {}", .path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Represents a temporary file that vanished right after writing.
    #[error("Failed to create export file {}", .path.display())]
    FileMissing { path: PathBuf },

    /// Represents a temporary file that was written without content.
    #[error("Export file {} is empty", .path.display())]
    EmptyFile { path: PathBuf },

    /// Represents a failure of the share capability itself (not a
    /// dismissal).
    #[error("Could not share the CSV file: {reason}")]
    ShareFailed { reason: String },

    /// Represents a failure to trigger a client-side download.
    #[error("Failed to export data: {reason}")]
    DownloadFailed { reason: String },
}
