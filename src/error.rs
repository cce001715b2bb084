//! Error types for the reference graph engine.

use thiserror::Error;

/// Main error type for `$ref` resolution and expansion.
#[derive(Error, Debug)]
pub enum RefExpanderError {
    /// The injected document loader failed (I/O, HTTP, or otherwise).
    #[error("failed to load document '{uri}': {message}")]
    Load { uri: String, message: String },

    /// Loaded bytes were not valid JSON.
    #[error("failed to parse document '{uri}' as JSON: {source}")]
    Parse {
        uri: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON-pointer fragment did not resolve inside the loaded document.
    #[error("$ref '{reference}' not found: pointer '{pointer}' missing in document '{uri}'")]
    RefNotFound {
        reference: String,
        uri: String,
        pointer: String,
    },

    /// The resolved node could not be decoded into the expected typed shape.
    #[error(
        "failed to decode $ref '{reference}' (document '{uri}') into the expected shape: {source}"
    )]
    Decode {
        reference: String,
        uri: String,
        #[source]
        source: serde_json::Error,
    },

    /// `resolve` was called with a reference that carries no usable pointer/target.
    #[error("invalid resolve target for $ref '{reference}'")]
    InvalidTarget { reference: String },

    /// Deref/resolve was invoked on a node kind the resolver does not support.
    #[error("unsupported node kind for $ref resolution: {kind}")]
    UnsupportedNode { kind: String },

    /// A circular ref was reported with no recorded referrer; indicates an engine bug.
    #[error("internal invariant violated: circular $ref '{reference}' has no recorded referrer")]
    InternalInvariant { reference: String },

    /// Generic I/O error surfaced from the default file loader.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic JSON error not tied to a specific document/reference.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, RefExpanderError>;
