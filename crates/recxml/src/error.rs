//! Error types for record XML serialization.
//!
//! Serialization itself fails only on a bad `include` entry
//! ([`SerializeError::InvalidInclude`]) or, when `max_depth` is set, on nesting past
//! it. The remaining variants come from the XML writer/reader and from loading an
//! in-memory store.

use thiserror::Error;

/// Errors raised while building, writing or reading record XML.
#[derive(Error, Debug)]
pub enum SerializeError {
    /// An `include` entry named something that is not a declared association.
    #[error("{type_name} has no association named '{association}'")]
    InvalidInclude {
        type_name: String,
        association: String,
    },

    /// Nested inclusion went deeper than the configured `max_depth`.
    #[error("association include depth exceeded the limit of {depth}")]
    IncludeDepthExceeded { depth: usize },

    /// XML writer or reader error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error while writing XML text.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized output was not valid UTF-8.
    #[error("invalid UTF-8 in XML output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// XML text could not be mapped back to a value tree.
    #[error("XML parse error: {message}")]
    Parse { message: String },

    /// In-memory store definition or data problem.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while loading or querying a [`MemoryStore`](crate::memory::MemoryStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The JSON document could not be decoded.
    #[error("invalid store definition: {0}")]
    Json(#[from] serde_json::Error),

    /// A row or association refers to a type that was never declared.
    #[error("unknown record type: {type_name}")]
    UnknownType { type_name: String },

    /// A row value does not fit its column kind.
    #[error("invalid value for {type_name}.{column}: {message}")]
    InvalidValue {
        type_name: String,
        column: String,
        message: String,
    },
}

impl SerializeError {
    /// Builds a reader error from any displayable cause.
    pub(crate) fn parse(message: impl std::fmt::Display) -> Self {
        SerializeError::Parse {
            message: message.to_string(),
        }
    }
}

/// Result type alias for serialization operations.
pub type Result<T> = std::result::Result<T, SerializeError>;
