//! Health checking and passive liveness.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shoal::{Client, ClientParts, RequestOptions};

mod common;

async fn wait_for<F: Fn() -> bool>(condition: F, what: &str) {
    for _ in 0..50 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("timed out waiting for {what}");
}

#[tokio::test]
async fn probes_evict_and_revive_nodes() {
    common::init_tracing();
    let healthy = Arc::new(AtomicBool::new(false));
    let flaky = common::start_flaky_node(healthy.clone(), r#"{"node":"flaky"}"#).await;
    let live = common::start_mock_node(r#"{"node":"live"}"#).await;

    let mut config = common::base_config(&[flaky, live]);
    config.health_check.enabled = true;
    config.health_check.interval_secs = 1;
    config.health_check.timeout_secs = 1;
    config.retries.enabled = false;

    let client = Client::new(config).await.unwrap();

    let flaky_conn = client
        .pool()
        .connections()
        .into_iter()
        .find(|c| c.url().port() == Some(flaky.port()))
        .unwrap();

    // The dropped-connection node is found dead...
    wait_for(|| !flaky_conn.is_alive(), "flaky node to be marked dead").await;

    // ...and while dead it never receives traffic.
    for _ in 0..6 {
        let response = client.perform_request(RequestOptions::get("/")).await.unwrap();
        assert_eq!(response.json::<serde_json::Value>().unwrap()["node"], "live");
    }

    // Recovery is noticed by the next probe.
    healthy.store(true, Ordering::SeqCst);
    wait_for(|| flaky_conn.is_alive(), "flaky node to be revived").await;

    client.close().await;
}

#[tokio::test]
async fn probe_treats_any_http_response_as_alive() {
    // A node answering 500 is reachable: probing keeps it alive even
    // though dispatch treats the same status as a request failure.
    let node = common::start_programmable_node(|| async { (500, r#"{"error":"boom"}"#.to_string()) }).await;

    let mut config = common::base_config(&[node]);
    config.health_check.enabled = true;
    config.health_check.interval_secs = 1;

    let client = Client::new(config).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let conns = client.pool().connections();
    let conn = &conns[0];
    assert!(conn.is_alive(), "an error status still proves reachability");

    let err = client.perform_request(RequestOptions::get("/")).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(
        conn.is_alive(),
        "a completed exchange keeps the node alive regardless of status"
    );

    client.close().await;
}

#[tokio::test]
async fn passive_liveness_alone_keeps_the_pool_honest() {
    let refused = common::refused_addr().await;
    let live = common::start_mock_node(r#"{"ok":true}"#).await;

    let observer = Arc::new(common::CountingObserver::default());
    // Health checking disabled: only request outcomes drive liveness.
    let client = Client::with_parts(
        common::base_config(&[refused, live]),
        ClientParts {
            observer: Some(observer.clone()),
            ..ClientParts::default()
        },
    )
    .await
    .unwrap();

    // First request fails over (2 attempts) and buries the dead node.
    client.perform_request(RequestOptions::get("/")).await.unwrap();

    // Every later request goes straight to the live node.
    for _ in 0..6 {
        client.perform_request(RequestOptions::get("/")).await.unwrap();
    }
    assert_eq!(
        observer.attempts.load(Ordering::SeqCst),
        2 + 6,
        "dead node must not be selected again"
    );

    let dead = client
        .pool()
        .connections()
        .into_iter()
        .find(|c| c.url().port() == Some(refused.port()))
        .unwrap();
    assert!(!dead.is_alive());
    assert_eq!(dead.failures(), 1);
}

#[tokio::test]
async fn close_stops_background_tasks_promptly() {
    let node = common::start_mock_node(r#"{"ok":true}"#).await;

    let mut config = common::base_config(&[node]);
    config.health_check.enabled = true;
    config.health_check.interval_secs = 1;

    let client = Client::new(config).await.unwrap();

    let pong = client.ping().await.unwrap();
    assert_eq!(pong.status(), 200);

    tokio::time::timeout(Duration::from_secs(5), client.close())
        .await
        .expect("close must join background tasks promptly");
}
