//! Shared state for CLI commands: transport, registry and node lookup.

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use logmesh_cluster::{HttpTransport, NodeRecord, NodeRefresher, NodeRegistry};
use logmesh_core::TransportEndpoint;
use logmesh_core::config::LogmeshConfig;

pub struct Ctx {
    pub api: HttpTransport,
    pub registry: NodeRegistry,
}

impl Ctx {
    /// `overrides` replaces the configured node list when non-empty.
    pub fn new(config: LogmeshConfig, overrides: &[String]) -> Result<Self> {
        let endpoints = if overrides.is_empty() {
            config.cluster.endpoints()
        } else {
            overrides
                .iter()
                .map(|raw| {
                    TransportEndpoint::parse(raw).with_context(|| format!("invalid --node {raw}"))
                })
                .collect::<Result<Vec<_>>>()?
        };
        if endpoints.is_empty() {
            bail!("no nodes configured; pass --node <url> or run `logmesh-ctl config init`");
        }

        let api = HttpTransport::new(&config.http).context("failed to build http client")?;
        Ok(Self {
            api,
            registry: NodeRegistry::with_configured(endpoints),
        })
    }

    /// One refresh pass over the registry.
    pub async fn refresh(&self) -> logmesh_cluster::RefreshReport {
        NodeRefresher::new(self.registry.clone(), self.api.clone())
            .refresh_once()
            .await
    }

    /// Resolve a node argument: a transport address, or a node id found by
    /// refreshing the cluster view.
    pub async fn node(&self, target: &str) -> Result<Arc<NodeRecord>> {
        if let Ok(endpoint) = TransportEndpoint::parse(target) {
            if let Some(node) = self.registry.get(&endpoint) {
                return Ok(node);
            }
            return Ok(self
                .registry
                .reconcile(NodeRecord::from_transport_address(endpoint)));
        }

        self.refresh().await;
        self.registry
            .find_by_node_id(target)
            .with_context(|| format!("no node with id {target}, is it part of the cluster?"))
    }
}
