//! Error types for apparatus operations.

use thiserror::Error;

/// Errors that can occur while loading or rendering a critical edition.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("No version titled '{0}' in this document")]
    VersionNotFound(String),

    #[error("Witness '{witness}' is not declared by version '{version}'")]
    UnknownWitness { witness: String, version: String },

    #[error(
        "Division nesting depth {depth} exceeds the {labels} declared division label(s)"
    )]
    DivisionLabelMismatch { depth: usize, labels: usize },

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
