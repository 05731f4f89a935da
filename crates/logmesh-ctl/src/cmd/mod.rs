//! CLI command modules.

pub mod config;
pub mod context;
pub mod inputs;
pub mod nodes;
pub mod system;

use logmesh_cluster::activity::now_ms;

/// Format unix ms as seconds-ago, or "never".
pub fn ago(unix_ms: Option<u64>) -> String {
    match unix_ms {
        Some(ms) => format!("{}s ago", now_ms().saturating_sub(ms) / 1000),
        None => "never".to_string(),
    }
}
