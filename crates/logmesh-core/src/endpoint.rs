//! Transport endpoints: where a node can be reached directly.
//!
//! An endpoint is normalized once, at construction, and never changes:
//!   - scheme and host lowercased
//!   - port made explicit (80 for http, 443 for https)
//!   - repeated `/` collapsed, trailing `/` removed
//!   - query and fragment dropped
//!
//! So `http://10.0.0.1:9000`, `http://10.0.0.1:9000/` and
//! `HTTP://10.0.0.1:9000//` are the same endpoint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::error::EndpointError;

/// A normalized node address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransportEndpoint {
    /// Canonical form: `scheme://host:port[/path]`, no trailing slash.
    canonical: String,
}

impl TransportEndpoint {
    /// Parse and normalize an address string.
    pub fn parse(address: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(address.trim())?;
        Self::from_url(url)
    }

    /// Normalize an already-parsed URL.
    pub fn from_url(url: Url) -> Result<Self, EndpointError> {
        if !url.username().is_empty() || url.password().is_some() {
            return Err(EndpointError::Credentials);
        }
        let host = url.host_str().ok_or(EndpointError::MissingHost)?;
        let port = url
            .port_or_known_default()
            .ok_or(EndpointError::MissingHost)?;

        let canonical = format!(
            "{}://{}:{}{}",
            url.scheme(),
            host.to_ascii_lowercase(),
            port,
            normalize_path(url.path())
        );
        Ok(Self { canonical })
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Build the full URL for an API path on this endpoint.
    ///
    /// `join("/system")` and `join("system")` give the same result.
    pub fn join(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return self.canonical.clone();
        }
        format!("{}/{}", self.canonical, path)
    }
}

/// Collapse `//` runs and strip trailing separators. The root path becomes "".
fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    out
}

impl fmt::Display for TransportEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for TransportEndpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TransportEndpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

impl<'de> Deserialize<'de> for TransportEndpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
