//! Periodic liveness refresh.
//!
//! Every tick, each known node is asked for the cluster view
//! (`GET /cluster/nodes`). A node that answers is touched; one that does
//! not gets a failure recorded. Nodes it reports are reconciled into the
//! registry, so configured addresses resolve and new members appear.

use std::time::Duration;

use futures::future::join_all;
use tokio::sync::broadcast;
use tokio::time;

use logmesh_core::api::NodeSummaryList;

use crate::node::NodeRecord;
use crate::registry::NodeRegistry;
use crate::transport::{ApiRequest, Transport};

/// Outcome of one refresh pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub contacted: usize,
    pub failed: usize,
    /// Summaries reconciled across all answering nodes.
    pub discovered: usize,
}

pub struct NodeRefresher<T> {
    registry: NodeRegistry,
    api: T,
}

impl<T: Transport> NodeRefresher<T> {
    pub fn new(registry: NodeRegistry, api: T) -> Self {
        Self { registry, api }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Probe every known node once, concurrently.
    pub async fn refresh_once(&self) -> RefreshReport {
        let nodes = self.registry.all();
        let probes = nodes.iter().map(|node| async move {
            let path = "/cluster/nodes";
            let result = match self
                .api
                .execute(node.transport_address(), ApiRequest::get(path))
                .await
            {
                Ok(resp) => resp.json::<NodeSummaryList>(path),
                Err(e) => Err(e),
            };
            (node, result)
        });

        let mut report = RefreshReport::default();
        let mut failed = Vec::new();
        for (node, result) in join_all(probes).await {
            match result {
                Ok(list) => {
                    node.touch();
                    report.contacted += 1;
                    for summary in &list.nodes {
                        match NodeRecord::from_summary(summary) {
                            Ok(fresh) => {
                                // listed by a live peer: active, but not contacted
                                fresh.set_active(true);
                                self.registry.reconcile(fresh);
                                report.discovered += 1;
                            }
                            Err(e) => tracing::warn!(
                                address = %summary.transport_address,
                                error = %e,
                                "ignoring node with unusable transport address"
                            ),
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!(node = %node, error = %e, "refresh probe failed");
                    failed.push(node);
                }
            }
        }

        // after reconciling, so a peer's listing cannot revive a node whose
        // own probe failed in this pass
        for node in failed {
            node.mark_failure();
            report.failed += 1;
        }

        tracing::debug!(
            contacted = report.contacted,
            failed = report.failed,
            discovered = report.discovered,
            "node refresh complete"
        );
        report
    }

    /// Refresh on a fixed interval until `shutdown` fires.
    pub async fn run(&self, interval: Duration, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = time::interval(interval);
        tracing::info!(
            interval_secs = interval.as_secs(),
            nodes = self.registry.len(),
            "node refresh starting"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("node refresh stopping");
                    return;
                }
            }
        }
    }
}
