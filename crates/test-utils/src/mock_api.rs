//! A fake map and backend API for integration tests.
//!
//! [`FakeApi::spawn`] binds an axum server on an ephemeral localhost port and
//! serves every endpoint the dashboard talks to from the fixtures module.
//! Each request is recorded so tests can assert on paths and query strings.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use atlas_common::DivisionLevel;
use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::fixtures::{self, auth};

/// One request seen by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Query parameters as decoded by axum.
    pub params: HashMap<String, String>,
    pub authorization: Option<String>,
}

impl RecordedRequest {
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }
}

#[derive(Default)]
struct FakeState {
    requests: Mutex<Vec<RecordedRequest>>,
    failing: Mutex<HashSet<String>>,
    delays: Mutex<HashMap<String, Duration>>,
}

/// Handle on a running fake API server.
///
/// The server task lives until the test's runtime shuts down.
#[derive(Clone)]
pub struct FakeApi {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeApi {
    pub async fn spawn() -> Self {
        let state = Arc::new(FakeState::default());

        let app = Router::new()
            .route("/api/gis/zones", get(zones))
            .route("/api/gis/search", get(search))
            .route("/api/map/data", get(map_data))
            .route("/api/filters", get(filters))
            .route("/api/stats/global", get(global_stats))
            .route("/api/stats/evolution", get(evolution))
            .route("/api/stats/comparison", get(comparison))
            .route("/api/zone/stats", get(zone_stats))
            .route("/api/zone/details", get(zone_stats))
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/verify-otp", post(verify_otp))
            .route("/api/auth/me", get(me))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API listener");
        let addr = listener.local_addr().expect("Fake API has no local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, state }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for the map API.
    pub fn map_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Base URL for the backend API.
    pub fn backend_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Make every request to `path` answer 500.
    pub fn fail(&self, path: &str) {
        self.state.failing.lock().unwrap().insert(path.to_string());
    }

    /// Delay every response on `path`.
    pub fn delay(&self, path: &str, delay: Duration) {
        self.state
            .delays
            .lock()
            .unwrap()
            .insert(path.to_string(), delay);
    }

    /// All requests so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests made to `path`, oldest first.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state.requests.lock().unwrap().clear();
    }
}

async fn record(State(state): State<Arc<FakeState>>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: path.clone(),
        query: request.uri().query().map(str::to_string),
        params: Params::try_from_uri(request.uri())
            .map(|Query(params)| params)
            .unwrap_or_default(),
        authorization: request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.requests.lock().unwrap().push(recorded);

    let delay = state.delays.lock().unwrap().get(&path).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if state.failing.lock().unwrap().contains(&path) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Erreur interne"})),
        )
            .into_response();
    }
    next.run(request).await
}

type Params = Query<HashMap<String, String>>;

fn level_param(params: &HashMap<String, String>) -> DivisionLevel {
    params
        .get("level")
        .and_then(|l| l.parse().ok())
        .unwrap_or(DivisionLevel::Region)
}

fn id_param(params: &HashMap<String, String>, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.parse().ok())
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
}

async fn zones(Query(params): Params) -> Json<Value> {
    let collection = fixtures::zones(level_param(&params), id_param(&params, "parent_id"));
    Json(json!(collection))
}

async fn search(Query(params): Params) -> Json<Value> {
    Json(fixtures::search_json(params.get("q").map(String::as_str).unwrap_or("")))
}

async fn map_data(Query(params): Params) -> Response {
    let Some(sector_id) = id_param(&params, "sector_id") else {
        return bad_request("sector_id requis");
    };
    Json(fixtures::map_data_json(
        sector_id,
        level_param(&params),
        id_param(&params, "parent_id"),
    ))
    .into_response()
}

async fn filters() -> Json<Value> {
    Json(fixtures::sector_catalog_json())
}

async fn global_stats(Query(params): Params) -> Response {
    match id_param(&params, "zone_id") {
        Some(zone_id) => Json(fixtures::global_stats_json(zone_id)).into_response(),
        None => bad_request("zone_id requis"),
    }
}

async fn evolution() -> Json<Value> {
    Json(fixtures::evolution_json())
}

async fn comparison() -> Json<Value> {
    Json(fixtures::comparison_json())
}

async fn zone_stats(Query(params): Params) -> Response {
    match id_param(&params, "zone_id") {
        Some(zone_id) => Json(fixtures::zone_stats_json(zone_id)).into_response(),
        None => bad_request("zone_id requis"),
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == auth::EMAIL && body["password"] == auth::PASSWORD {
        Json(fixtures::auth_response_json()).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Identifiants invalides"})),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == auth::EMAIL {
        return bad_request("Cet email est déjà utilisé");
    }
    (
        StatusCode::CREATED,
        Json(json!({"message": "Code de vérification envoyé"})),
    )
        .into_response()
}

async fn verify_otp(Json(body): Json<Value>) -> Response {
    if body["otp"] == auth::OTP {
        Json(fixtures::auth_response_json()).into_response()
    } else {
        bad_request("Code invalide")
    }
}

async fn me(headers: HeaderMap) -> Response {
    let expected = format!("Bearer {}", auth::TOKEN);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if authorized {
        Json(fixtures::user_json()).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Token invalide"})),
        )
            .into_response()
    }
}
