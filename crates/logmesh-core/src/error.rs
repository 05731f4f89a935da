//! Error types shared across logmesh crates.

use std::path::PathBuf;

use thiserror::Error;

/// A node address that cannot be used as a transport endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid endpoint: {0}")]
    Invalid(#[from] url::ParseError),
    #[error("endpoint has no host or port")]
    MissingHost,
    #[error("endpoint must not carry credentials")]
    Credentials,
}

/// Network or protocol failure talking to a node.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("failed to reach {url}: {reason}")]
    Connect { url: String, reason: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("{url} answered with unexpected status {status}")]
    UnexpectedStatus { url: String, status: u16 },
    #[error("failed to decode response from {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Errors a caller of node operations must handle explicitly.
///
/// Read-style operations never return these; they degrade instead.
#[derive(Debug, Error)]
pub enum NodeError {
    /// An exclusive input type is already running on the node.
    #[error("an input of type {input_type} is already running on {node}")]
    ExclusiveInput { input_type: String, node: String },

    /// Enumerating inputs failed; there is no sensible default to fall back to.
    #[error("could not get inputs from {node}")]
    InputsUnavailable {
        node: String,
        #[source]
        source: TransportError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}
