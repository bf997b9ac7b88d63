//! In-memory stand-in for the RedisGreen API.
//!
//! Serves `/servers` and `/monitors` with the same status codes, error
//! bodies and token check as the hosted service, so the client can be
//! exercised over real HTTP without an account.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const TOKEN_HEADER: &str = "x-api-token";
pub const MEDIA_TYPE: &str = "application/vnd.redisgreen.1+json";

pub const PLANS: &[&str] = &[
    "minidev", "dev", "basic", "starter", "plus", "large", "xlarge", "2xlarge", "4xlarge",
    "15xlarge", "30xlarge", "60xlarge",
];

pub const REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "ap-northeast-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "sa-east-1",
];

/// Most replicas a single create call may ask for.
pub const MAX_SLAVES: usize = 8;

pub const BAD_TOKEN_MESSAGE: &str = "X-API-Token header was missing or incorrect.";
pub const BAD_MONITOR_URL_MESSAGE: &str = "URL should be formatted as redis://:password@host:port";
pub const BLANK_NAME_MESSAGE: &str = "Name can't be blank.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    pub name: String,
    pub url: String,
    pub slaves: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Body of every non-2xx response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Errors {
    pub errors: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateServer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub plan: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub slave_count: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateMonitor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

#[derive(Default)]
pub struct Store {
    pub servers: HashMap<String, Server>,
    pub monitors: HashMap<String, Monitor>,
    /// Insertion order, so listings are stable.
    server_order: Vec<String>,
    monitor_order: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    store: Arc<RwLock<Store>>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<Errors>)>;

fn fail(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Errors>) {
    (
        status,
        Json(Errors {
            errors: vec![message.into()],
        }),
    )
}

/// Unreadable request bodies get the same error document as every other failure.
fn rejected(rejection: JsonRejection) -> (StatusCode, Json<Errors>) {
    fail(rejection.status(), rejection.body_text())
}

fn not_found(path: &str) -> (StatusCode, Json<Errors>) {
    fail(StatusCode::NOT_FOUND, format!("{path} couldn't be found."))
}

/// Router accepting only `token`.
pub fn app(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        store: Arc::new(RwLock::new(Store::default())),
    };
    Router::new()
        .route("/servers", get(list_servers).post(create_server))
        .route("/servers/{id}", get(get_server).delete(delete_server))
        .route("/monitors", get(list_monitors).post(create_monitor))
        .route("/monitors/{id}", get(get_monitor).delete(delete_monitor))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_client))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

/// Rejects requests without the right token or media type.
async fn require_client(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let headers = req.headers();
    let token_ok = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == &*state.token);
    if !token_ok {
        return fail(StatusCode::UNAUTHORIZED, BAD_TOKEN_MESSAGE).into_response();
    }

    let accept_ok = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == MEDIA_TYPE);
    if !accept_ok {
        return fail(
            StatusCode::NOT_ACCEPTABLE,
            format!("Accept header must be {MEDIA_TYPE}."),
        )
        .into_response();
    }

    next.run(req).await
}

async fn list_servers(State(state): State<AppState>) -> Json<Vec<Server>> {
    let store = state.store.read().await;
    Json(
        store
            .server_order
            .iter()
            .filter_map(|id| store.servers.get(id).cloned())
            .collect(),
    )
}

async fn create_server(
    State(state): State<AppState>,
    payload: Result<Json<CreateServer>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Server>)> {
    let Json(input) = payload.map_err(rejected)?;
    if input.name.trim().is_empty() {
        return Err(fail(StatusCode::UNPROCESSABLE_ENTITY, BLANK_NAME_MESSAGE));
    }
    if !PLANS.contains(&input.plan.as_str()) {
        return Err(fail(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("\"{}\" is not a valid plan.", input.plan),
        ));
    }
    if !REGIONS.contains(&input.region.as_str()) {
        return Err(fail(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("\"{}\" is not a valid region.", input.region),
        ));
    }
    let slave_count: usize = match input.slave_count.as_deref() {
        None | Some("") => 0,
        Some(raw) => raw.parse().map_err(|_| {
            fail(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("\"{raw}\" is not a valid slave count."),
            )
        })?,
    };
    if slave_count > MAX_SLAVES {
        return Err(fail(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("slave_count must be at most {MAX_SLAVES}."),
        ));
    }

    let mut store = state.store.write().await;
    let slaves: Vec<String> = (0..slave_count)
        .map(|n| {
            let replica = new_server(format!("{}-replica-{}", input.name, n + 1), Vec::new());
            let id = replica.id.clone();
            store.insert_server(replica);
            id
        })
        .collect();
    let server = new_server(input.name, slaves);
    store.insert_server(server.clone());
    info!(id = %server.id, name = %server.name, replicas = server.slaves.len(), "server created");

    Ok((StatusCode::CREATED, Json(server)))
}

async fn get_server(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Server>> {
    let store = state.store.read().await;
    store
        .servers
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(&format!("/servers/{id}")))
}

// Replicas are stored as servers of their own and are left untouched.
async fn delete_server(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    store
        .servers
        .remove(&id)
        .ok_or_else(|| not_found(&format!("/servers/{id}")))?;
    store.server_order.retain(|existing| existing != &id);
    info!(%id, "server deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_monitors(State(state): State<AppState>) -> Json<Vec<Monitor>> {
    let store = state.store.read().await;
    Json(
        store
            .monitor_order
            .iter()
            .filter_map(|id| store.monitors.get(id).cloned())
            .collect(),
    )
}

async fn create_monitor(
    State(state): State<AppState>,
    payload: Result<Json<CreateMonitor>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Monitor>)> {
    let Json(input) = payload.map_err(rejected)?;
    if input.name.trim().is_empty() {
        return Err(fail(StatusCode::UNPROCESSABLE_ENTITY, BLANK_NAME_MESSAGE));
    }
    if !is_redis_url(&input.url) {
        return Err(fail(StatusCode::UNPROCESSABLE_ENTITY, BAD_MONITOR_URL_MESSAGE));
    }
    let monitor = Monitor {
        id: new_id(),
        name: input.name,
        url: input.url,
    };
    let mut store = state.store.write().await;
    store.monitor_order.push(monitor.id.clone());
    store.monitors.insert(monitor.id.clone(), monitor.clone());
    info!(id = %monitor.id, name = %monitor.name, "monitor created");
    Ok((StatusCode::CREATED, Json(monitor)))
}

async fn get_monitor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Monitor>> {
    let store = state.store.read().await;
    store
        .monitors
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(&format!("/monitors/{id}")))
}

async fn delete_monitor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    store
        .monitors
        .remove(&id)
        .ok_or_else(|| not_found(&format!("/monitors/{id}")))?;
    store.monitor_order.retain(|existing| existing != &id);
    info!(%id, "monitor deleted");
    Ok(StatusCode::NO_CONTENT)
}

impl Store {
    fn insert_server(&mut self, server: Server) {
        self.server_order.push(server.id.clone());
        self.servers.insert(server.id.clone(), server);
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

fn new_server(name: String, slaves: Vec<String>) -> Server {
    let id = new_id();
    let password = Uuid::new_v4().simple().to_string();
    Server {
        url: format!("redis://:{password}@{id}.redisgreen.net:11042/"),
        id,
        name,
        slaves,
    }
}

/// `redis://[:password@]host:port` with a numeric port.
pub fn is_redis_url(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("redis://") else {
        return false;
    };
    let authority = rest.trim_end_matches('/');
    let host_port = match authority.rsplit_once('@') {
        Some((_, host_port)) => host_port,
        None => authority,
    };
    match host_port.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !port.is_empty() && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}
