//! Failure injection tests: rate limits, remote errors, unreachable store,
//! and configuration reload.

use std::sync::atomic::Ordering;

use employee_sdk::GatewayClient;

mod common;

#[tokio::test]
async fn test_list_recovers_after_rate_limits() {
    let (store_addr, store) = common::start_mock_store().await;
    store.seed("Ann", 10);
    store.list_rate_limits.store(2, Ordering::SeqCst);
    let gateway = common::start_gateway(common::gateway_config(store_addr)).await;

    let all = GatewayClient::new(&gateway.url).list().await.unwrap();
    assert_eq!(all.len(), 1, "Should eventually succeed after retries");
    assert_eq!(store.list_calls.load(Ordering::SeqCst), 3);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_exhausted_rate_limit_degrades_aggregates() {
    let (store_addr, store) = common::start_mock_store().await;
    store.seed("Ann", 10);
    store.list_rate_limits.store(3, Ordering::SeqCst);
    let gateway = common::start_gateway(common::gateway_config(store_addr)).await;
    let client = GatewayClient::new(&gateway.url);

    assert!(client.list().await.unwrap().is_empty());
    assert_eq!(store.list_calls.load(Ordering::SeqCst), 3);

    // the next request sees a fresh snapshot
    assert_eq!(client.highest_salary().await.unwrap(), 10);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_get_rate_limit_is_surfaced_without_retry() {
    let (store_addr, store) = common::start_mock_store().await;
    let id = store.seed("Ann", 10);
    store.all_rate_limits.store(1, Ordering::SeqCst);
    let gateway = common::start_gateway(common::gateway_config(store_addr)).await;

    let err = GatewayClient::new(&gateway.url)
        .get(&id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(429));
    assert_eq!(store.get_calls.load(Ordering::SeqCst), 1);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_delete_refuses_when_collision_check_is_rate_limited() {
    let (store_addr, store) = common::start_mock_store().await;
    let id = store.seed("Lee", 10);
    store.list_rate_limits.store(3, Ordering::SeqCst);
    let gateway = common::start_gateway(common::gateway_config(store_addr)).await;

    let err = GatewayClient::new(&gateway.url)
        .delete(&id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(429));
    assert_eq!(store.delete_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.len(), 1);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_remote_delete_failure_is_bad_gateway() {
    let (store_addr, store) = common::start_mock_store().await;
    let id = store.seed("Pat", 10);
    store.refuse_deletes.store(true, Ordering::SeqCst);
    let gateway = common::start_gateway(common::gateway_config(store_addr)).await;

    let err = GatewayClient::new(&gateway.url)
        .delete(&id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(store.delete_calls.load(Ordering::SeqCst), 1);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_remote_error_status_is_passed_through() {
    let (store_addr, store) = common::start_mock_store().await;
    let id = store.seed("Ann", 10);
    store.get_failure_status.store(503, Ordering::SeqCst);
    let gateway = common::start_gateway(common::gateway_config(store_addr)).await;

    let err = GatewayClient::new(&gateway.url)
        .get(&id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.body_json().unwrap()["error"], "injected failure");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_store_is_bad_gateway() {
    let dead = common::closed_port().await;
    let gateway = common::start_gateway(common::gateway_config(dead)).await;

    let err = GatewayClient::new(&gateway.url).list().await.unwrap_err();
    assert_eq!(err.status(), Some(502));

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_reload_disables_retries() {
    let (store_addr, store) = common::start_mock_store().await;
    store.seed("Ann", 10);
    let gateway = common::start_gateway(common::gateway_config(store_addr)).await;
    let client = GatewayClient::new(&gateway.url);

    let mut next = gateway.config.clone();
    next.retries.enabled = false;
    gateway.updates.send(next).unwrap();
    common::settle().await;

    store.list_rate_limits.store(1, Ordering::SeqCst);
    assert!(client.list().await.unwrap().is_empty());
    assert_eq!(store.list_calls.load(Ordering::SeqCst), 1);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_reload_repoints_upstream() {
    let (first_addr, first) = common::start_mock_store().await;
    let (second_addr, second) = common::start_mock_store().await;
    first.seed("From First", 1);
    second.seed("From Second", 2);
    let gateway = common::start_gateway(common::gateway_config(first_addr)).await;
    let client = GatewayClient::new(&gateway.url);

    assert_eq!(client.list().await.unwrap()[0].name, "From First");

    gateway
        .updates
        .send(common::gateway_config(second_addr))
        .unwrap();
    common::settle().await;

    assert_eq!(client.list().await.unwrap()[0].name, "From Second");

    gateway.shutdown.trigger();
}
