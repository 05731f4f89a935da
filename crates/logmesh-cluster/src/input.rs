//! Node sub-resources: inputs, loggers, buffers and metrics.
//!
//! These are thin views over API payloads. Each `Input` is bound to the
//! node it runs on, so follow-up calls route to the right endpoint.

use std::sync::Arc;

use logmesh_core::api::{BufferSummary, BuffersResponse, InputSummary, MetricSummary};

use crate::node::NodeRecord;
use crate::transport::Transport;

/// A running input on a specific node.
#[derive(Debug, Clone)]
pub struct Input {
    summary: InputSummary,
    node: Arc<NodeRecord>,
}

impl Input {
    /// Bind a raw input description to the node it was read from.
    pub fn bind(summary: InputSummary, node: Arc<NodeRecord>) -> Self {
        Self { summary, node }
    }

    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn title(&self) -> &str {
        &self.summary.title
    }

    pub fn input_type(&self) -> &str {
        &self.summary.input_type
    }

    pub fn summary(&self) -> &InputSummary {
        &self.summary
    }

    pub fn node(&self) -> &Arc<NodeRecord> {
        &self.node
    }

    /// Stop this input on its node.
    pub async fn terminate<T: Transport>(&self, api: &T) -> bool {
        self.node.terminate_input(api, self.id()).await
    }
}

/// A logger configured inside a node process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalLogger {
    pub name: String,
    pub level: String,
    pub syslog_level: i32,
}

/// Ring-buffer utilization of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BufferInfo {
    pub input: BufferSummary,
    pub process: BufferSummary,
    pub output: BufferSummary,
}

impl From<BuffersResponse> for BufferInfo {
    fn from(r: BuffersResponse) -> Self {
        Self {
            input: r.buffers.input,
            process: r.buffers.process,
            output: r.buffers.output,
        }
    }
}

/// One named metric. The value is left as the node reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub metric_type: String,
    pub value: serde_json::Value,
}

impl From<MetricSummary> for Metric {
    fn from(m: MetricSummary) -> Self {
        Self {
            metric_type: m.metric_type,
            value: m.metric,
        }
    }
}
