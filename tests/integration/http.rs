//! Node operations over real HTTP against fake nodes.

use std::collections::HashMap;
use std::sync::Arc;

use logmesh_cluster::NodeRecord;
use logmesh_core::api::InputLaunchRequest;
use logmesh_core::NodeError;

use crate::{dead_endpoint, spawn_fake_node, transport};

fn launch(title: &str, input_type: &str) -> InputLaunchRequest {
    InputLaunchRequest {
        title: title.into(),
        input_type: input_type.into(),
        configuration: HashMap::new(),
        creator_user_id: "admin".into(),
    }
}

#[tokio::test]
async fn hostname_is_fetched_once_until_reload() {
    let fake = spawn_fake_node("node-one", true).await.unwrap();
    let api = transport();
    let node = NodeRecord::from_transport_address(fake.endpoint.clone());

    assert_eq!(node.hostname(&api).await.ready().as_deref(), Some("node-one.local"));
    assert_eq!(fake.state.hits("GET /system"), 1);

    assert!(node.is_processing(&api).await.unwrap_or(false));
    assert_eq!(node.hostname(&api).await.unwrap_or_default(), "node-one.local");
    assert_eq!(fake.state.hits("GET /system"), 1);

    assert!(node.pause(&api).await);
    // still the cached overview until an explicit reload
    assert!(node.is_processing(&api).await.unwrap_or(false));
    assert!(node.load_system_information(&api).await.is_ready());
    assert!(!node.is_processing(&api).await.unwrap_or(true));
    assert_eq!(fake.state.hits("GET /system"), 2);

    assert!(node.resume(&api).await);
    assert_eq!(fake.state.hits("PUT /system/processing/resume"), 1);
}

#[tokio::test]
async fn concurrent_first_reads_share_one_fetch() {
    let fake = spawn_fake_node("node-one", false).await.unwrap();
    let api = Arc::new(transport());
    let node = Arc::new(NodeRecord::from_transport_address(fake.endpoint.clone()));

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let node = node.clone();
            let api = api.clone();
            tokio::spawn(async move { node.hostname(&api).await.ready() })
        })
        .collect();
    for t in tasks {
        assert_eq!(t.await.unwrap().as_deref(), Some("node-one.local"));
    }
    assert_eq!(fake.state.hits("GET /system"), 1);
}

#[tokio::test]
async fn unreachable_node_degrades_reads() {
    let api = transport();
    let node = NodeRecord::from_transport_address(dead_endpoint().await.unwrap());

    assert!(node.hostname(&api).await.is_degraded());
    assert!(node.throughput(&api).await.is_degraded());
    assert!(node.thread_dump(&api).await.is_degraded());
    assert!(node.metrics(&api, "org.graylog2").await.is_degraded());
    assert!(!node.pause(&api).await);
    assert!(node.system_info().is_none());

    match node.number_of_inputs(&api).await {
        Err(NodeError::InputsUnavailable { .. }) => {}
        other => panic!("expected InputsUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn diagnostics_are_read_from_the_node() {
    let fake = spawn_fake_node("node-one", false).await.unwrap();
    let api = transport();
    let node = NodeRecord::from_transport_address(fake.endpoint.clone());

    assert_eq!(node.throughput(&api).await.ready(), Some(250));
    assert!(node
        .thread_dump(&api)
        .await
        .unwrap_or_default()
        .contains("node=node-one"));

    let metrics = node.metrics(&api, "org.graylog2").await.ready().unwrap();
    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics["org.graylog2.buffers.input.size"].metric_type, "gauge");
    assert_eq!(
        metrics["org.graylog2.buffers.input.size"].value["value"],
        serde_json::json!(65536)
    );

    // unknown namespace answers 404, which is an empty result
    let none = node.metrics(&api, "com.example").await;
    assert_eq!(none.ready().map(|m| m.len()), Some(0));
}

#[tokio::test]
async fn inputs_launch_list_and_terminate() {
    let fake = spawn_fake_node("node-one", false).await.unwrap();
    let api = transport();
    let node = Arc::new(NodeRecord::from_transport_address(fake.endpoint.clone()));

    assert_eq!(node.number_of_inputs(&api).await.unwrap(), 0);

    let req = launch("syslog udp", "org.graylog2.inputs.syslog.udp.SyslogUDPInput");
    assert!(node.launch_input(&api, &req, true).await.unwrap());
    assert_eq!(node.number_of_inputs(&api).await.unwrap(), 1);

    // exclusive type already running: refused before any launch request
    match node.launch_input(&api, &req, true).await {
        Err(NodeError::ExclusiveInput { input_type, .. }) => {
            assert_eq!(input_type, req.input_type)
        }
        other => panic!("expected ExclusiveInput, got {other:?}"),
    }
    assert_eq!(fake.state.hits("POST /system/inputs"), 1);

    // non-exclusive launches of the same type are allowed
    assert!(node.launch_input(&api, &req, false).await.unwrap());

    let inputs = node.inputs(&api).await.unwrap();
    assert_eq!(inputs.len(), 2);
    assert!(inputs.iter().all(|i| Arc::ptr_eq(i.node(), &node)));
    assert_eq!(inputs[0].title(), "syslog udp");

    assert!(inputs[0].terminate(&api).await);
    assert!(!node.terminate_input(&api, "no-such-input").await);
    assert_eq!(node.number_of_inputs(&api).await.unwrap(), 1);
}
