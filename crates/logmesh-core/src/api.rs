//! Payloads returned by a node's REST API.
//!
//! The transport owns the wire format; these types only decode it.
//! Unknown fields are ignored and optional ones default, so older and
//! newer nodes both parse.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ── Cluster ───────────────────────────────────────────────────────────────────

/// One resolved node as reported by `GET /cluster/nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub node_id: String,
    pub short_node_id: String,
    pub transport_address: String,
    /// Unix ms.
    pub last_seen: u64,
    #[serde(default)]
    pub is_master: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSummaryList {
    pub nodes: Vec<NodeSummary>,
    pub total: usize,
}

// ── System ────────────────────────────────────────────────────────────────────

/// `GET /system`: the expensive bits cached per node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemOverview {
    pub hostname: String,
    pub is_processing: bool,
    pub version: String,
    pub server_id: String,
    pub lifecycle: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuffersResponse {
    pub buffers: BufferClasses,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferClasses {
    pub input: BufferSummary,
    pub process: BufferSummary,
    pub output: BufferSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferSummary {
    pub utilization_percent: f64,
    pub utilization: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggersResponse {
    pub loggers: HashMap<String, LoggerSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSummary {
    pub level: String,
    pub syslog_level: i32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThroughputResponse {
    pub throughput: u64,
}

// ── Inputs ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub input_type: String,
    #[serde(default)]
    pub creator_user_id: String,
    /// Unix ms, when known.
    #[serde(default)]
    pub started_at: Option<u64>,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsResponse {
    pub inputs: Vec<InputSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputLaunchRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub configuration: HashMap<String, serde_json::Value>,
    pub creator_user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTypesResponse {
    /// Type name → human readable name.
    pub types: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTypeSummary {
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: String,
    pub is_exclusive: bool,
    pub requested_configuration: serde_json::Value,
}

// ── Metrics ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsListResponse {
    pub metrics: Vec<MetricSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSummary {
    pub full_name: String,
    #[serde(rename = "type")]
    pub metric_type: String,
    pub metric: serde_json::Value,
}
