//! Node records: one long-lived, identity-stable view of a cluster member.
//!
//! A record is created either from a discovered `NodeSummary` (resolved) or
//! from a bare configured address (unresolved), then kept alive while fresh
//! snapshots are `merge`d into it. Holders of an `Arc<NodeRecord>` see the
//! updates without the record ever being replaced.
//!
//! Identity is deliberately loose: two records are the same node if they
//! share a non-empty node id OR a transport address. That relation is not
//! transitive (A~B by id, B~C by address, A≁C) and is kept that way.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use serde::de::DeserializeOwned;

use logmesh_core::api::{
    BuffersResponse, InputLaunchRequest, InputSummary, InputTypeSummary, InputTypesResponse,
    InputsResponse, LoggersResponse, MetricsListResponse, NodeSummary, SystemOverview,
    ThroughputResponse,
};
use logmesh_core::{EndpointError, NodeError, TransportEndpoint, TransportError};

use crate::activity::ActivityTracker;
use crate::input::{BufferInfo, Input, InternalLogger, Metric};
use crate::lookup::Lookup;
use crate::system_cache::SystemInfoCache;
use crate::transport::{ApiRequest, Transport};

/// Short id shown for records that have not been resolved by discovery yet.
pub const UNRESOLVED_SHORT_ID: &str = "unresolved";

/// Every record hashes here. See `NodeRecord::identity_hash`.
const IDENTITY_HASH: u64 = 0x6e6f_6465_7265_6364;

/// The fields discovery can change. Written as one unit by `merge`.
#[derive(Debug, Clone)]
struct Resolution {
    node_id: Option<String>,
    short_node_id: String,
    is_master: bool,
    /// Unix ms.
    last_seen: Option<u64>,
}

/// A consistent copy of every field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub transport_address: TransportEndpoint,
    pub node_id: Option<String>,
    pub short_node_id: String,
    pub is_master: bool,
    pub last_seen: Option<u64>,
    pub last_contact: Option<u64>,
    pub is_from_configuration: bool,
    pub is_active: bool,
    pub failure_count: u32,
}

#[derive(Debug)]
pub struct NodeRecord {
    transport_address: TransportEndpoint,
    from_configuration: bool,
    resolution: RwLock<Resolution>,
    activity: ActivityTracker,
    system: SystemInfoCache,
}

impl NodeRecord {
    /// Build a resolved record from a discovery snapshot.
    pub fn from_summary(summary: &NodeSummary) -> Result<Self, EndpointError> {
        let transport_address = TransportEndpoint::parse(&summary.transport_address)?;
        Ok(Self::new(
            transport_address,
            false,
            Resolution {
                node_id: Some(summary.node_id.clone()),
                short_node_id: summary.short_node_id.clone(),
                is_master: summary.is_master,
                last_seen: Some(summary.last_seen),
            },
        ))
    }

    /// Build an unresolved record for an address taken from configuration.
    pub fn from_transport_address(transport_address: TransportEndpoint) -> Self {
        Self::new(
            transport_address,
            true,
            Resolution {
                node_id: None,
                short_node_id: UNRESOLVED_SHORT_ID.to_string(),
                is_master: false,
                last_seen: None,
            },
        )
    }

    fn new(transport_address: TransportEndpoint, from_configuration: bool, r: Resolution) -> Self {
        Self {
            transport_address,
            from_configuration,
            resolution: RwLock::new(r),
            activity: ActivityTracker::new(),
            system: SystemInfoCache::new(),
        }
    }

    fn resolution(&self) -> RwLockReadGuard<'_, Resolution> {
        self.resolution
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn transport_address(&self) -> &TransportEndpoint {
        &self.transport_address
    }

    pub fn node_id(&self) -> Option<String> {
        self.resolution().node_id.clone()
    }

    pub fn short_node_id(&self) -> String {
        self.resolution().short_node_id.clone()
    }

    pub fn is_master(&self) -> bool {
        self.resolution().is_master
    }

    pub fn last_seen(&self) -> Option<u64> {
        self.resolution().last_seen
    }

    pub fn last_contact(&self) -> Option<u64> {
        self.activity.last_contact()
    }

    pub fn is_from_configuration(&self) -> bool {
        self.from_configuration
    }

    pub fn failure_count(&self) -> u32 {
        self.activity.failure_count()
    }

    pub fn is_active(&self) -> bool {
        self.activity.is_active()
    }

    /// Single atomic write; `touch`, `mark_failure` and `merge` all land here.
    pub fn set_active(&self, active: bool) {
        self.activity.set_active(active);
    }

    /// The cached system overview, if one has been loaded. Never fetches.
    pub fn system_info(&self) -> Option<Arc<SystemOverview>> {
        self.system.cached()
    }

    /// Every field, with the discovery-owned ones read under one lock.
    pub fn snapshot(&self) -> NodeSnapshot {
        let r = self.resolution();
        NodeSnapshot {
            transport_address: self.transport_address.clone(),
            node_id: r.node_id.clone(),
            short_node_id: r.short_node_id.clone(),
            is_master: r.is_master,
            last_seen: r.last_seen,
            last_contact: self.activity.last_contact(),
            is_from_configuration: self.from_configuration,
            is_active: self.activity.is_active(),
            failure_count: self.activity.failure_count(),
        }
    }

    // ── Identity ──────────────────────────────────────────────────────────────

    /// Same node if both carry the same non-empty node id, or if they share
    /// a transport address.
    pub fn same_identity_as(&self, other: &NodeRecord) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let ours = self.node_id().filter(|id| !id.is_empty());
        let theirs = other.node_id().filter(|id| !id.is_empty());
        if let (Some(a), Some(b)) = (ours, theirs) {
            if a == b {
                return true;
            }
        }
        self.transport_address == other.transport_address
    }

    /// Hash consistent with `same_identity_as`.
    ///
    /// Equal records may agree on only their node id or only their address,
    /// so neither can feed the hash. Keyed lookup goes through `NodeRegistry`.
    pub fn identity_hash(&self) -> u64 {
        IDENTITY_HASH
    }

    // ── Reconciliation ────────────────────────────────────────────────────────

    /// Overwrite the discovery-owned fields and the activity flag from a
    /// fresher record. Address, origin, failures, last contact and the
    /// system cache stay as they are.
    pub fn merge(&self, updated: &NodeRecord) {
        if std::ptr::eq(self, updated) {
            return;
        }
        tracing::debug!(updated = %updated, node = %self, "merging node");

        let incoming = updated.resolution().clone();
        let active = updated.is_active();
        {
            let mut r = self
                .resolution
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *r = incoming;
        }
        self.set_active(active);
    }

    // ── Liveness ──────────────────────────────────────────────────────────────

    /// Record a successful contact.
    pub fn touch(&self) {
        self.activity.touch();
    }

    /// Record a failed contact and mark the node inactive.
    pub fn mark_failure(&self) {
        let failures = self.activity.record_failure();
        tracing::info!(node = %self, failures, "node failed, marking as inactive");
    }

    // ── Remote state ──────────────────────────────────────────────────────────

    async fn fetch<R, T>(&self, api: &T, request: ApiRequest) -> Result<R, TransportError>
    where
        R: DeserializeOwned,
        T: Transport,
    {
        let path = request.path.clone();
        api.execute(&self.transport_address, request)
            .await?
            .json(&path)
    }

    async fn fetch_system(&self, api: &impl Transport) -> Result<SystemOverview, TransportError> {
        self.fetch(api, ApiRequest::get("/system")).await
    }

    /// Re-fetch the system overview and replace the cached one.
    pub async fn load_system_information<T: Transport>(
        &self,
        api: &T,
    ) -> Lookup<Arc<SystemOverview>> {
        self.system.reload(|| self.fetch_system(api)).await
    }

    pub async fn hostname<T: Transport>(&self, api: &T) -> Lookup<String> {
        self.system
            .get_or_load(|| self.fetch_system(api))
            .await
            .map(|s| s.hostname.clone())
    }

    pub async fn is_processing<T: Transport>(&self, api: &T) -> Lookup<bool> {
        self.system
            .get_or_load(|| self.fetch_system(api))
            .await
            .map(|s| s.is_processing)
    }

    pub async fn buffer_info<T: Transport>(&self, api: &T) -> Lookup<BufferInfo> {
        match self
            .fetch::<BuffersResponse, _>(api, ApiRequest::get("/system/buffers"))
            .await
        {
            Ok(r) => Lookup::Ready(r.into()),
            Err(e) => {
                tracing::error!(node = %self, error = %e, "unable to read buffer info");
                Lookup::Degraded
            }
        }
    }

    pub async fn all_loggers<T: Transport>(&self, api: &T) -> Lookup<Vec<InternalLogger>> {
        match self
            .fetch::<LoggersResponse, _>(api, ApiRequest::get("/system/loggers"))
            .await
        {
            Ok(r) => Lookup::Ready(
                r.loggers
                    .into_iter()
                    .map(|(name, l)| InternalLogger {
                        name,
                        level: l.level,
                        syslog_level: l.syslog_level,
                    })
                    .collect(),
            ),
            Err(e) => {
                tracing::error!(node = %self, error = %e, "unable to load loggers");
                Lookup::Degraded
            }
        }
    }

    pub async fn thread_dump<T: Transport>(&self, api: &T) -> Lookup<String> {
        match api
            .execute(&self.transport_address, ApiRequest::get("/system/threaddump"))
            .await
        {
            Ok(r) => Lookup::Ready(r.body),
            Err(e) => {
                tracing::error!(node = %self, error = %e, "unable to fetch thread dump");
                Lookup::Degraded
            }
        }
    }

    /// Messages per second currently processed.
    pub async fn throughput<T: Transport>(&self, api: &T) -> Lookup<u64> {
        match self
            .fetch::<ThroughputResponse, _>(api, ApiRequest::get("/system/throughput"))
            .await
        {
            Ok(r) => Lookup::Ready(r.throughput),
            Err(e) => {
                tracing::error!(node = %self, error = %e, "could not load throughput");
                Lookup::Degraded
            }
        }
    }

    /// Metrics under `namespace`, keyed by full name. An unknown namespace
    /// (404) is an empty map, not a failure.
    pub async fn metrics<T: Transport>(
        &self,
        api: &T,
        namespace: &str,
    ) -> Lookup<HashMap<String, Metric>> {
        let path = format!("/system/metrics/namespace/{namespace}");
        let request = ApiRequest::get(path.clone()).expect(&[200, 404]);
        let response = match api.execute(&self.transport_address, request).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(node = %self, namespace, error = %e, "could not load metrics");
                return Lookup::Degraded;
            }
        };
        if response.status == 404 {
            return Lookup::Ready(HashMap::new());
        }
        match response.json::<MetricsListResponse>(&path) {
            Ok(list) => Lookup::Ready(
                list.metrics
                    .into_iter()
                    .map(|m| (m.full_name.clone(), Metric::from(m)))
                    .collect(),
            ),
            Err(e) => {
                tracing::error!(node = %self, namespace, error = %e, "could not load metrics");
                Lookup::Degraded
            }
        }
    }

    pub async fn pause<T: Transport>(&self, api: &T) -> bool {
        self.processing_action(api, "/system/processing/pause").await
    }

    pub async fn resume<T: Transport>(&self, api: &T) -> bool {
        self.processing_action(api, "/system/processing/resume").await
    }

    async fn processing_action<T: Transport>(&self, api: &T, path: &str) -> bool {
        match api
            .execute(&self.transport_address, ApiRequest::put(path))
            .await
        {
            Ok(_) => {
                tracing::info!(node = %self, path, "processing state changed");
                true
            }
            Err(e) => {
                tracing::error!(node = %self, path, error = %e, "could not change processing state");
                false
            }
        }
    }

    // ── Inputs ────────────────────────────────────────────────────────────────

    /// Raw input list. Failure here is not degraded: callers cannot guess
    /// what is running.
    async fn input_list<T: Transport>(&self, api: &T) -> Result<InputsResponse, NodeError> {
        self.fetch(api, ApiRequest::get("/system/inputs"))
            .await
            .map_err(|source| {
                tracing::error!(node = %self, error = %source, "could not get inputs");
                NodeError::InputsUnavailable {
                    node: self.to_string(),
                    source,
                }
            })
    }

    /// Inputs running on this node, bound to it.
    pub async fn inputs<T: Transport>(self: &Arc<Self>, api: &T) -> Result<Vec<Input>, NodeError> {
        Ok(self
            .input_list(api)
            .await?
            .inputs
            .into_iter()
            .map(|summary| Input::bind(summary, self.clone()))
            .collect())
    }

    pub async fn number_of_inputs<T: Transport>(&self, api: &T) -> Result<usize, NodeError> {
        Ok(self.input_list(api).await?.total)
    }

    pub async fn input<T: Transport>(
        self: &Arc<Self>,
        api: &T,
        input_id: &str,
    ) -> Result<Input, NodeError> {
        let summary: InputSummary = self
            .fetch(api, ApiRequest::get(format!("/system/inputs/{input_id}")))
            .await?;
        Ok(Input::bind(summary, self.clone()))
    }

    /// Start an input. With `exclusive`, refuses if one of the same type
    /// already runs here. A failed launch request is logged and gives `false`.
    pub async fn launch_input<T: Transport>(
        &self,
        api: &T,
        request: &InputLaunchRequest,
        exclusive: bool,
    ) -> Result<bool, NodeError> {
        if exclusive {
            let running = self.input_list(api).await?;
            if running
                .inputs
                .iter()
                .any(|i| i.input_type == request.input_type)
            {
                return Err(NodeError::ExclusiveInput {
                    input_type: request.input_type.clone(),
                    node: self.to_string(),
                });
            }
        }

        let launch = ApiRequest::post("/system/inputs")
            .json(request)
            .expect(&[202]);
        match api.execute(&self.transport_address, launch).await {
            Ok(_) => {
                tracing::info!(node = %self, title = %request.title, input_type = %request.input_type, "input launched");
                Ok(true)
            }
            Err(e) => {
                tracing::error!(node = %self, title = %request.title, error = %e, "could not launch input");
                Ok(false)
            }
        }
    }

    pub async fn terminate_input<T: Transport>(&self, api: &T, input_id: &str) -> bool {
        let request = ApiRequest::delete(format!("/system/inputs/{input_id}")).expect(&[202]);
        match api.execute(&self.transport_address, request).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(node = %self, input_id, error = %e, "could not terminate input");
                false
            }
        }
    }

    /// Input type name → human readable name.
    pub async fn input_types<T: Transport>(
        &self,
        api: &T,
    ) -> Result<HashMap<String, String>, NodeError> {
        let r: InputTypesResponse = self
            .fetch(api, ApiRequest::get("/system/inputs/types"))
            .await?;
        Ok(r.types)
    }

    pub async fn input_type_information<T: Transport>(
        &self,
        api: &T,
        input_type: &str,
    ) -> Result<InputTypeSummary, NodeError> {
        Ok(self
            .fetch(api, ApiRequest::get(format!("/system/inputs/types/{input_type}")))
            .await?)
    }

    pub async fn all_input_type_information<T: Transport>(
        &self,
        api: &T,
    ) -> Result<HashMap<String, InputTypeSummary>, NodeError> {
        let mut all = HashMap::new();
        for input_type in self.input_types(api).await?.into_keys() {
            let info = self.input_type_information(api, &input_type).await?;
            all.insert(info.input_type.clone(), info);
        }
        Ok(all)
    }
}

impl PartialEq for NodeRecord {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity_as(other)
    }
}

impl Eq for NodeRecord {}

/// Every record hashes to the same value, so a `HashSet<NodeRecord>` or
/// `HashMap` keyed on records degrades to O(n) lookups. Key by
/// `TransportEndpoint` instead, as `NodeRegistry` does.
impl Hash for NodeRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.identity_hash());
    }
}

impl fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.resolution();
        let Some(node_id) = &r.node_id else {
            return write!(f, "UnresolvedNode {{'{}'}}", self.transport_address);
        };

        write!(f, "Node {{'{}', {}", node_id, self.transport_address)?;
        if r.is_master {
            f.write_str(", master")?;
        }
        f.write_str(if self.is_active() { ", active" } else { ", inactive" })?;
        let failures = self.failure_count();
        if failures > 0 {
            write!(f, ", failed: {failures} times")?;
        }
        f.write_str("}")
    }
}
