//! In-process stand-in for the broker's control-plane API.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use shardctl_core::config::BrokerSettings;

const SLOT_COUNT: u64 = 16384;

#[derive(Default)]
pub struct FakeState {
    /// `METHOD /raw/path` of every request received, in order.
    pub requests: Vec<String>,
    pub proxies: Vec<(String, Vec<String>)>,
    pub clusters: HashMap<String, Value>,
    pub added_nodes: Vec<String>,
    pub migrations: Vec<String>,
    pub failovers: Vec<String>,
    /// Registering this proxy answers 500.
    pub broken_proxy: Option<String>,
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeBroker {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl FakeBroker {
    pub async fn start() -> Self {
        Self::start_with(FakeState::default()).await
    }

    pub async fn start_with(state: FakeState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state }
    }

    pub fn settings(&self) -> BrokerSettings {
        BrokerSettings {
            address: format!("http://{}", self.addr),
            api_version: "v2".to_string(),
            timeout_secs: Some(5),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn failovers(&self) -> Vec<String> {
        self.state.lock().unwrap().failovers.clone()
    }

    pub fn insert_cluster(&self, name: &str, view: Value) {
        self.state
            .lock()
            .unwrap()
            .clusters
            .insert(name.to_string(), view);
    }
}

/// Settings pointing at a port nothing listens on.
pub async fn unreachable_settings() -> BrokerSettings {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    BrokerSettings {
        address: format!("http://{addr}"),
        api_version: "v2".to_string(),
        timeout_secs: Some(5),
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v2/proxies/meta", post(register_proxy))
        .route("/api/v2/proxies/failover/{address}", post(failover_proxy))
        .route("/api/v2/clusters", post(create_cluster))
        .route("/api/v2/clusters/nodes/{name}", put(add_node))
        .route("/api/v2/clusters/meta/{name}", get(get_cluster))
        .route(
            "/api/v2/clusters/migrations/expand/{name}",
            post(migrate_slots),
        )
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    state.lock().unwrap().requests.push(line);
    next.run(request).await
}

async fn register_proxy(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let address = body["proxy_address"].as_str().unwrap_or_default().to_string();
    let nodes: Vec<String> = body["nodes"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|n| n.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let mut state = state.lock().unwrap();
    if state.broken_proxy.as_deref() == Some(address.as_str()) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "storage unavailable").into_response();
    }
    if state.proxies.iter().any(|(p, _)| *p == address) {
        return (StatusCode::BAD_REQUEST, "proxy already exists").into_response();
    }
    state.proxies.push((address, nodes));
    StatusCode::OK.into_response()
}

async fn create_cluster(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let name = body["cluster_name"].as_str().unwrap_or_default().to_string();
    let node_number = body["node_number"].as_u64().unwrap_or_default() as usize;

    let mut state = state.lock().unwrap();
    if state.clusters.contains_key(&name) {
        return (StatusCode::CONFLICT, "cluster already exists").into_response();
    }
    let free: Vec<(String, String)> = state
        .proxies
        .iter()
        .flat_map(|(proxy, nodes)| nodes.iter().map(move |n| (proxy.clone(), n.clone())))
        .take(node_number)
        .collect();
    if node_number == 0 || free.len() < node_number {
        return (StatusCode::CONFLICT, "not enough free nodes").into_response();
    }

    // Nodes alternate master / replica; masters split the slot space evenly.
    let masters = node_number.div_ceil(2) as u64;
    let per_master = SLOT_COUNT / masters;
    let nodes: Vec<Value> = free
        .iter()
        .enumerate()
        .map(|(i, (proxy, node))| {
            if i % 2 == 0 {
                let idx = (i / 2) as u64;
                let end = if idx + 1 == masters {
                    SLOT_COUNT - 1
                } else {
                    (idx + 1) * per_master - 1
                };
                json!({
                    "address": node,
                    "proxy_address": proxy,
                    "cluster_name": name,
                    "slots": [{"start": idx * per_master, "end": end, "tag": "None"}],
                    "repl": {"role": "master", "peers": []},
                })
            } else {
                json!({
                    "address": node,
                    "proxy_address": proxy,
                    "cluster_name": name,
                    "slots": [],
                    "repl": {"role": "replica", "peers": []},
                })
            }
        })
        .collect();
    let view = json!({ "name": name, "epoch": 1, "nodes": nodes });
    state.clusters.insert(name, view);
    StatusCode::OK.into_response()
}

async fn add_node(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    if !state.clusters.contains_key(&name) {
        return (StatusCode::NOT_FOUND, "cluster not found").into_response();
    }
    state.added_nodes.push(name);
    StatusCode::OK.into_response()
}

async fn get_cluster(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    let state = state.lock().unwrap();
    match state.clusters.get(&name) {
        Some(view) => Json(json!({ "cluster": view })).into_response(),
        None => (StatusCode::NOT_FOUND, "cluster not found").into_response(),
    }
}

async fn migrate_slots(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    if !state.clusters.contains_key(&name) {
        return (StatusCode::NOT_FOUND, "cluster not found").into_response();
    }
    state.migrations.push(name);
    StatusCode::OK.into_response()
}

async fn failover_proxy(State(state): State<Shared>, Path(address): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    if !state.proxies.iter().any(|(p, _)| *p == address) {
        return (StatusCode::NOT_FOUND, "proxy not found").into_response();
    }
    state.failovers.push(address);
    StatusCode::OK.into_response()
}
