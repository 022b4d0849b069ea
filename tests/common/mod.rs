//! Shared utilities for integration testing: an in-memory backing store
//! speaking the store's wire format, and a gateway wired to it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dashmap::DashMap;
use employee_gateway::config::GatewayConfig;
use employee_gateway::http::HttpServer;
use employee_gateway::lifecycle::Shutdown;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use uuid::Uuid;

pub const STORE_PATH: &str = "/api/v1/employee";

/// Backing store double with scripted failures and call counters.
#[derive(Default)]
pub struct MockStore {
    records: DashMap<Uuid, (u64, Value)>,
    seq: AtomicU64,
    /// Remaining 429 answers for list calls.
    pub list_rate_limits: AtomicU32,
    /// Remaining 429 answers for every call.
    pub all_rate_limits: AtomicU32,
    /// Non-zero: answer every get-by-id with this status.
    pub get_failure_status: AtomicU16,
    /// Answer deletes with `data: false` and keep the record.
    pub refuse_deletes: AtomicBool,
    pub list_calls: AtomicU32,
    pub get_calls: AtomicU32,
    pub delete_calls: AtomicU32,
}

#[derive(Deserialize)]
struct CreateBody {
    name: String,
    salary: u32,
    age: u32,
    title: String,
}

#[derive(Deserialize)]
struct DeleteBody {
    name: String,
}

fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn rate_limited() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({"status": "Too Many Requests", "error": "slow down"})),
    )
        .into_response()
}

impl MockStore {
    /// Insert a record directly, returning its id.
    pub fn seed(&self, name: &str, salary: u32) -> Uuid {
        let id = Uuid::new_v4();
        let record = json!({
            "id": id,
            "employee_name": name,
            "employee_salary": salary,
            "employee_age": 30,
            "employee_title": "Engineer",
            "employee_email": format!("{}@company.com", name.to_lowercase().replace(' ', ".")),
        });
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        self.records.insert(id, (seq, record));
        id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    fn snapshot(&self) -> Vec<Value> {
        let mut entries: Vec<(u64, Value)> =
            self.records.iter().map(|e| e.value().clone()).collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, v)| v).collect()
    }

    fn gate(&self) -> Option<Response> {
        take_one(&self.all_rate_limits).then(rate_limited)
    }
}

async fn list_records(State(store): State<Arc<MockStore>>) -> Response {
    store.list_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(resp) = store.gate() {
        return resp;
    }
    if take_one(&store.list_rate_limits) {
        return rate_limited();
    }
    Json(json!({"data": store.snapshot(), "status": "Successfully processed request."})).into_response()
}

async fn get_record(State(store): State<Arc<MockStore>>, Path(id): Path<Uuid>) -> Response {
    store.get_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(resp) = store.gate() {
        return resp;
    }
    let failure = store.get_failure_status.load(Ordering::SeqCst);
    if failure != 0 {
        let status = StatusCode::from_u16(failure).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({"status": "Failed", "error": "injected failure"}))).into_response();
    }
    match store.records.get(&id) {
        Some(entry) => Json(json!({"data": entry.value().1, "status": "Successfully processed request."}))
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "Not Found", "error": "no such employee"})),
        )
            .into_response(),
    }
}

async fn create_record(State(store): State<Arc<MockStore>>, Json(body): Json<CreateBody>) -> Response {
    if let Some(resp) = store.gate() {
        return resp;
    }
    let id = store.seed(&body.name, body.salary);
    if let Some(mut entry) = store.records.get_mut(&id) {
        entry.value_mut().1["employee_age"] = json!(body.age);
        entry.value_mut().1["employee_title"] = json!(body.title);
    }
    let record = store.records.get(&id).map(|e| e.value().1.clone());
    Json(json!({"data": record, "status": "Successfully processed request."})).into_response()
}

async fn delete_record(State(store): State<Arc<MockStore>>, Json(body): Json<DeleteBody>) -> Response {
    store.delete_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(resp) = store.gate() {
        return resp;
    }
    if store.refuse_deletes.load(Ordering::SeqCst) {
        return Json(json!({"data": false, "status": "Successfully processed request."})).into_response();
    }
    let before = store.records.len();
    store.records.retain(|_, (_, v)| v["employee_name"] != body.name);
    let removed = store.records.len() < before;
    Json(json!({"data": removed, "status": "Successfully processed request."})).into_response()
}

/// Start the mock backing store on a random loopback port.
pub async fn start_mock_store() -> (SocketAddr, Arc<MockStore>) {
    let store = Arc::new(MockStore::default());
    let app = Router::new()
        .route(
            STORE_PATH,
            get(list_records).post(create_record).delete(delete_record),
        )
        .route(&format!("{}/{{id}}", STORE_PATH), get(get_record))
        .with_state(store.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, store)
}

/// A running gateway and the handles needed to steer it.
pub struct TestGateway {
    pub url: String,
    pub config: GatewayConfig,
    pub updates: mpsc::UnboundedSender<GatewayConfig>,
    pub shutdown: Shutdown,
}

/// Config pointing at `store_addr` with millisecond retry delays.
pub fn gateway_config(store_addr: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = format!("http://{}{}", store_addr, STORE_PATH);
    config.upstream.request_timeout_secs = 5;
    config.retries.initial_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config.observability.metrics_enabled = false;
    config
}

/// Start a gateway with `config` on a random loopback port.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config.clone()).unwrap();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    TestGateway {
        url: format!("http://{}", addr),
        config,
        updates,
        shutdown,
    }
}

/// A loopback address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Give a pushed config time to be applied.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}
