//! Shared types for talking to log-processing cluster nodes:
//! transport endpoints, API payloads, configuration and error types.
//! All other logmesh crates depend on this one.

pub mod api;
pub mod config;
pub mod endpoint;
pub mod error;

pub use endpoint::TransportEndpoint;
pub use error::{EndpointError, NodeError, TransportError};
