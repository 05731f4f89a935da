//! Node registry: the long-lived records everything else holds on to.
//!
//! Keyed on transport address, which never changes for a record. Fresh
//! snapshots are reconciled into the matching record rather than replacing
//! it, so an `Arc<NodeRecord>` handed out earlier keeps seeing updates.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use logmesh_core::TransportEndpoint;

use crate::node::NodeRecord;

#[derive(Clone, Default)]
pub struct NodeRegistry {
    nodes: Arc<DashMap<TransportEndpoint, Arc<NodeRecord>>>,
    /// Serializes `reconcile`. The id-then-address search spans many
    /// shards, so without it two snapshots of one node could both miss.
    reconcile_lock: Arc<Mutex<()>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with unresolved records for configured addresses.
    pub fn with_configured(endpoints: impl IntoIterator<Item = TransportEndpoint>) -> Self {
        let registry = Self::new();
        for ep in endpoints {
            registry
                .nodes
                .entry(ep.clone())
                .or_insert_with(|| Arc::new(NodeRecord::from_transport_address(ep)));
        }
        registry
    }

    /// Merge `updated` into the record it identifies, or add it.
    ///
    /// A record sharing the node id is preferred over one sharing only the
    /// address. Returns the record now held by the registry.
    pub fn reconcile(&self, updated: NodeRecord) -> Arc<NodeRecord> {
        let _guard = self
            .reconcile_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let existing = updated
            .node_id()
            .filter(|id| !id.is_empty())
            .and_then(|id| self.find_by_node_id(&id))
            .or_else(|| self.get(updated.transport_address()));

        if let Some(existing) = existing {
            existing.merge(&updated);
            return existing;
        }

        let key = updated.transport_address().clone();
        let record = match self.nodes.entry(key) {
            Entry::Occupied(e) => {
                // never drop an update, even if the address is already held
                let existing = e.get().clone();
                drop(e);
                existing.merge(&updated);
                return existing;
            }
            Entry::Vacant(e) => e.insert(Arc::new(updated)).clone(),
        };
        tracing::info!(node = %record, "tracking new node");
        record
    }

    pub fn get(&self, endpoint: &TransportEndpoint) -> Option<Arc<NodeRecord>> {
        self.nodes.get(endpoint).map(|e| e.value().clone())
    }

    pub fn find_by_node_id(&self, node_id: &str) -> Option<Arc<NodeRecord>> {
        self.nodes
            .iter()
            .find(|e| e.value().node_id().as_deref() == Some(node_id))
            .map(|e| e.value().clone())
    }

    /// All records, ordered by transport address.
    pub fn all(&self) -> Vec<Arc<NodeRecord>> {
        let mut all: Vec<_> = self.nodes.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.transport_address().cmp(b.transport_address()));
        all
    }

    pub fn active(&self) -> Vec<Arc<NodeRecord>> {
        self.all().into_iter().filter(|n| n.is_active()).collect()
    }

    /// The active master, if one is known.
    pub fn master(&self) -> Option<Arc<NodeRecord>> {
        self.active().into_iter().find(|n| n.is_master())
    }

    pub fn any_active(&self) -> bool {
        self.nodes.iter().any(|e| e.value().is_active())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
