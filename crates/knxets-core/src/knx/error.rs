use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

/// Errors surfaced while opening an export archive or decoding one of its files.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to open archive {}: {source}", .path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("Failed to read archive entry {entry}: {source}")]
    EntryOpen {
        entry: String,
        #[source]
        source: ZipError,
    },

    #[error("Archive entry {entry} is encrypted: password required")]
    PasswordRequired { entry: String },

    #[error("Invalid password for archive entry {entry}")]
    InvalidPassword { entry: String },

    #[error("Unsupported schema namespace '{namespace}'")]
    UnsupportedSchema { namespace: String },

    #[error("Malformed XML: {reason}")]
    MalformedXml { reason: String },

    #[error("Invalid attribute '{attribute}' on {element}: '{value}' (expected unsigned integer) ({context})")]
    MalformedValue {
        element: String,
        attribute: String,
        value: String,
        context: String,
    },

    #[error("Archive has been closed")]
    ClosedArchive,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<roxmltree::Error> for Error {
    fn from(error: roxmltree::Error) -> Self {
        Error::MalformedXml {
            reason: error.to_string(),
        }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(error: std::str::Utf8Error) -> Self {
        Error::MalformedXml {
            reason: format!("content is not valid UTF-8 ({})", error),
        }
    }
}
