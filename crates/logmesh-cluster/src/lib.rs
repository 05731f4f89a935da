//! logmesh-cluster: node records as seen by a management client.
//!
//! `NodeRecord` is the identity-stable view of one cluster member;
//! `NodeRegistry` holds them and reconciles fresh snapshots in place;
//! `NodeRefresher` keeps their liveness current. All remote calls go
//! through a `Transport`, with `HttpTransport` as the real one.

pub mod activity;
pub mod http;
pub mod input;
pub mod lookup;
pub mod node;
pub mod refresh;
pub mod registry;
pub mod system_cache;
pub mod transport;

pub use activity::ActivityTracker;
pub use http::HttpTransport;
pub use input::{BufferInfo, Input, InternalLogger, Metric};
pub use lookup::Lookup;
pub use node::{NodeRecord, NodeSnapshot, UNRESOLVED_SHORT_ID};
pub use refresh::{NodeRefresher, RefreshReport};
pub use registry::NodeRegistry;
pub use system_cache::SystemInfoCache;
pub use transport::{ApiRequest, ApiResponse, Method, Transport};
