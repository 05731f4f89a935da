//! Registry refresh against a small fake cluster.

use std::time::Duration;

use serde_json::json;
use tokio::sync::broadcast;

use logmesh_cluster::{NodeRefresher, NodeRegistry};

use crate::{dead_endpoint, spawn_fake_node, transport};

#[tokio::test]
async fn refresh_resolves_configured_nodes_and_discovers_peers() {
    let master = spawn_fake_node("master-node", true).await.unwrap();
    let worker = spawn_fake_node("worker-node", false).await.unwrap();
    // the master reports the worker, which is not configured
    master.state.peers.lock().unwrap().push(json!({
        "node_id": worker.state.node_id,
        "short_node_id": "worker-n",
        "transport_address": worker.state.address,
        "last_seen": 1_700_000_000_500u64,
        "is_master": false,
    }));

    let registry = NodeRegistry::with_configured([master.endpoint.clone()]);
    let refresher = NodeRefresher::new(registry.clone(), transport());

    let report = refresher.refresh_once().await;
    assert_eq!(report.contacted, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.discovered, 2);
    assert_eq!(registry.len(), 2);

    let m = registry.get(&master.endpoint).unwrap();
    assert_eq!(m.node_id().as_deref(), Some("master-node"));
    assert!(m.is_from_configuration());
    assert!(m.is_active());
    assert!(m.last_contact().is_some());
    assert_eq!(registry.master().unwrap().transport_address(), &master.endpoint);

    let w = registry.find_by_node_id("worker-node").unwrap();
    assert!(!w.is_from_configuration());
    assert!(w.is_active());

    // second pass probes the discovered worker too
    let report = refresher.refresh_once().await;
    assert_eq!(report.contacted, 2);
    assert_eq!(registry.len(), 2);
    assert_eq!(worker.state.hits("GET /cluster/nodes"), 1);
}

#[tokio::test]
async fn unreachable_configured_node_is_marked_failed() {
    let live = spawn_fake_node("live-node", false).await.unwrap();
    let dead = dead_endpoint().await.unwrap();

    let registry = NodeRegistry::with_configured([live.endpoint.clone(), dead.clone()]);
    let refresher = NodeRefresher::new(registry.clone(), transport());

    let report = refresher.refresh_once().await;
    assert_eq!(report.contacted, 1);
    assert_eq!(report.failed, 1);

    let d = registry.get(&dead).unwrap();
    assert!(!d.is_active());
    assert_eq!(d.failure_count(), 1);
    assert_eq!(d.node_id(), None);

    refresher.refresh_once().await;
    assert_eq!(d.failure_count(), 2);
    assert_eq!(registry.active().len(), 1);
    assert!(registry.any_active());
}

#[tokio::test]
async fn peer_listing_does_not_revive_an_unreachable_node() {
    let master = spawn_fake_node("master-node", true).await.unwrap();
    let dead = dead_endpoint().await.unwrap();
    master.state.peers.lock().unwrap().push(json!({
        "node_id": "gone-node",
        "short_node_id": "gone-nod",
        "transport_address": dead.as_str(),
        "last_seen": 1_700_000_000_100u64,
        "is_master": false,
    }));

    let registry = NodeRegistry::with_configured([master.endpoint.clone(), dead.clone()]);
    let refresher = NodeRefresher::new(registry.clone(), transport());

    for pass in 1..=2u32 {
        let report = refresher.refresh_once().await;
        assert_eq!(report.contacted, 1);
        assert_eq!(report.failed, 1);

        let d = registry.get(&dead).unwrap();
        assert!(!d.is_active(), "pass {pass}: listed but unreachable node is active");
        assert_eq!(d.failure_count(), pass);
        assert_eq!(d.last_contact(), None);
        // resolved from the listing even though it was never reached
        assert_eq!(d.node_id().as_deref(), Some("gone-node"));
    }
    assert_eq!(registry.active().len(), 1);
}

#[tokio::test]
async fn refresh_loop_stops_on_shutdown() {
    let fake = spawn_fake_node("node-one", true).await.unwrap();
    let registry = NodeRegistry::with_configured([fake.endpoint.clone()]);
    let refresher = NodeRefresher::new(registry.clone(), transport());
    let (tx, rx) = broadcast::channel(1);

    let handle = tokio::spawn(async move {
        refresher.run(Duration::from_millis(20), rx).await;
    });

    tokio::time::sleep(Duration::from_millis(120)).await;
    tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("refresh loop did not stop")
        .unwrap();

    assert!(fake.state.hits("GET /cluster/nodes") >= 2);
    assert!(registry.get(&fake.endpoint).unwrap().is_active());
}
