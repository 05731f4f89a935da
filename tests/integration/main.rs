//! logmesh integration test harness.
//!
//! Tests run against fake nodes served in-process by axum on 127.0.0.1,
//! driven through the real `HttpTransport`. No external services needed:
//!
//!   cargo test --test integration
//!
//! Each fake node binds its own ephemeral port, so tests can run in
//! parallel without interfering with each other.

mod cluster;
mod http;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use logmesh_cluster::HttpTransport;
use logmesh_core::config::HttpConfig;
use logmesh_core::TransportEndpoint;

// ── Harness ───────────────────────────────────────────────────────────────────

/// Mutable state behind one fake node.
pub struct FakeState {
    pub node_id: String,
    pub address: String,
    pub hostname: String,
    pub is_master: bool,
    pub processing: AtomicBool,
    pub inputs: Mutex<Vec<Value>>,
    /// Other members this node reports in `/cluster/nodes`.
    pub peers: Mutex<Vec<Value>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl FakeState {
    fn hit(&self, route: &str) {
        *self.hits.lock().unwrap().entry(route.to_string()).or_default() += 1;
    }

    /// How many requests reached `route` (e.g. "GET /system").
    pub fn hits(&self, route: &str) -> usize {
        self.hits.lock().unwrap().get(route).copied().unwrap_or(0)
    }

    fn summary(&self) -> Value {
        json!({
            "node_id": self.node_id,
            "short_node_id": &self.node_id[..self.node_id.len().min(8)],
            "transport_address": self.address,
            "last_seen": 1_700_000_000_000u64,
            "is_master": self.is_master,
        })
    }
}

/// A running fake node.
pub struct FakeNode {
    pub endpoint: TransportEndpoint,
    pub state: Arc<FakeState>,
}

/// Serve a fake node on an ephemeral port.
pub async fn spawn_fake_node(node_id: &str, is_master: bool) -> Result<FakeNode> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind fake node")?;
    let addr = listener.local_addr()?;
    let address = format!("http://{addr}/");

    let state = Arc::new(FakeState {
        node_id: node_id.to_string(),
        address: address.clone(),
        hostname: format!("{node_id}.local"),
        is_master,
        processing: AtomicBool::new(true),
        inputs: Mutex::new(Vec::new()),
        peers: Mutex::new(Vec::new()),
        hits: Mutex::new(HashMap::new()),
    });

    let app = Router::new()
        .route("/cluster/nodes", get(cluster_nodes))
        .route("/system", get(system))
        .route("/system/throughput", get(throughput))
        .route("/system/threaddump", get(threaddump))
        .route("/system/inputs", get(list_inputs).post(launch_input))
        .route("/system/inputs/{id}", delete(terminate_input))
        .route("/system/metrics/namespace/{ns}", get(metrics))
        .route("/system/processing/pause", put(pause))
        .route("/system/processing/resume", put(resume))
        .with_state(state.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(FakeNode {
        endpoint: TransportEndpoint::parse(&address)?,
        state,
    })
}

/// An endpoint nothing listens on.
pub async fn dead_endpoint() -> Result<TransportEndpoint> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(TransportEndpoint::parse(&format!("http://{addr}"))?)
}

pub fn transport() -> HttpTransport {
    HttpTransport::new(&HttpConfig {
        request_timeout_secs: 2,
        connect_timeout_secs: 1,
    })
    .expect("http client should build")
}

// ── Fake node handlers ────────────────────────────────────────────────────────

type S = State<Arc<FakeState>>;

async fn cluster_nodes(State(s): S) -> Json<Value> {
    s.hit("GET /cluster/nodes");
    let mut nodes = vec![s.summary()];
    nodes.extend(s.peers.lock().unwrap().iter().cloned());
    let total = nodes.len();
    Json(json!({ "nodes": nodes, "total": total }))
}

async fn system(State(s): S) -> Json<Value> {
    s.hit("GET /system");
    Json(json!({
        "hostname": s.hostname,
        "is_processing": s.processing.load(Ordering::SeqCst),
        "version": "0.20.0",
        "server_id": s.node_id,
        "lifecycle": "running",
    }))
}

async fn throughput(State(s): S) -> Json<Value> {
    s.hit("GET /system/throughput");
    Json(json!({ "throughput": 250 }))
}

async fn threaddump(State(s): S) -> String {
    s.hit("GET /system/threaddump");
    format!("\"main\" #1 prio=5 node={}", s.node_id)
}

async fn list_inputs(State(s): S) -> Json<Value> {
    s.hit("GET /system/inputs");
    let inputs = s.inputs.lock().unwrap().clone();
    let total = inputs.len();
    Json(json!({ "inputs": inputs, "total": total }))
}

async fn launch_input(State(s): S, Json(req): Json<Value>) -> StatusCode {
    s.hit("POST /system/inputs");
    let mut inputs = s.inputs.lock().unwrap();
    let id = format!("input-{}", inputs.len() + 1);
    inputs.push(json!({
        "id": id,
        "title": req["title"],
        "type": req["type"],
        "creator_user_id": req["creator_user_id"],
    }));
    StatusCode::ACCEPTED
}

async fn terminate_input(State(s): S, Path(id): Path<String>) -> StatusCode {
    s.hit("DELETE /system/inputs");
    let mut inputs = s.inputs.lock().unwrap();
    let before = inputs.len();
    inputs.retain(|i| i["id"] != id.as_str());
    if inputs.len() < before {
        StatusCode::ACCEPTED
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn metrics(State(s): S, Path(ns): Path<String>) -> (StatusCode, Json<Value>) {
    s.hit("GET /system/metrics");
    if ns != "org.graylog2" {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "no such namespace" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "metrics": [
                { "full_name": "org.graylog2.buffers.input.size", "type": "gauge", "metric": { "value": 65536 } },
                { "full_name": "org.graylog2.throughput", "type": "meter", "metric": { "rate": { "mean": 1.5 } } }
            ],
            "total": 2
        })),
    )
}

async fn pause(State(s): S) -> StatusCode {
    s.hit("PUT /system/processing/pause");
    s.processing.store(false, Ordering::SeqCst);
    StatusCode::OK
}

async fn resume(State(s): S) -> StatusCode {
    s.hit("PUT /system/processing/resume");
    s.processing.store(true, Ordering::SeqCst);
    StatusCode::OK
}
