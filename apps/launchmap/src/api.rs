//! # HTTP API
//!
//! Query surface for map renderers and dashboards.
//!
//! | Method | Path                          | Purpose                          |
//! |--------|-------------------------------|----------------------------------|
//! | GET    | `/health`                     | liveness                         |
//! | GET    | `/features`                   | discovered features              |
//! | GET    | `/session`                    | active feature (or null)         |
//! | PUT    | `/session`                    | select / clear a feature         |
//! | GET    | `/session/status`             | resolved country status map      |
//! | GET    | `/session/countries/{code}`   | country report (tooltip facts)   |
//! | GET    | `/session/stats`              | cohort progress + coverage       |
//! | GET    | `/names/{name}`               | map display name -> country code |
//!
//! The active session lives behind `RwLock<Arc<Session>>`. A selection
//! builds the new session outside the lock and swaps the `Arc`, so readers
//! always see a complete map.

use crate::loader::LoadedData;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use launchmap_core::{
    resolve_display_name_to_code, ActiveFeature, CohortStats, CountryCode, CountryReport,
    FeatureStats, FeatureSummary, LaunchMapError, ResolvedStatusMap, Session,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// STATE
// =============================================================================

/// Shared server state: immutable inputs plus the swappable session.
#[derive(Clone)]
pub struct AppState {
    data: Arc<LoadedData>,
    session: Arc<RwLock<Arc<Session>>>,
}

impl AppState {
    #[must_use]
    pub fn new(data: LoadedData) -> Self {
        Self {
            data: Arc::new(data),
            session: Arc::new(RwLock::new(Arc::new(Session::cleared()))),
        }
    }

    /// Snapshot of the current session.
    pub async fn current(&self) -> Arc<Session> {
        Arc::clone(&*self.session.read().await)
    }

    /// Resolve a new selection and make it current.
    pub async fn select(&self, feature: Option<&str>) -> Result<Arc<Session>, LaunchMapError> {
        let next = Arc::new(Session::from_selection(
            &self.data.registry,
            &self.data.catalog,
            feature,
        )?);
        *self.session.write().await = Arc::clone(&next);
        Ok(next)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<LaunchMapError> for ApiError {
    fn from(err: LaunchMapError) -> Self {
        let msg = err.to_string();
        match err {
            LaunchMapError::UnknownFeature(_) => ApiError::NotFound(msg),
            _ => ApiError::BadRequest(msg),
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_features(State(state): State<AppState>) -> Json<Vec<FeatureSummary>> {
    Json(state.data.registry.summaries())
}

async fn get_session(State(state): State<AppState>) -> Json<Option<ActiveFeature>> {
    Json(state.current().await.active().cloned())
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub feature: Option<String>,
}

async fn put_session(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<Option<ActiveFeature>>, ApiError> {
    let session = state.select(request.feature.as_deref()).await?;
    match session.active() {
        Some(active) => tracing::info!(feature = %active.id, "feature selected"),
        None => tracing::info!("feature selection cleared"),
    }
    Ok(Json(session.active().cloned()))
}

async fn get_status(State(state): State<AppState>) -> Json<ResolvedStatusMap> {
    Json(state.current().await.resolved().clone())
}

async fn get_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CountryReport>, ApiError> {
    let code = CountryCode::parse(&code)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid country code {code:?}")))?;
    let session = state.current().await;
    Ok(Json(session.country_report(&state.data.cohort, &code)))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub feature: Option<String>,
    pub cohort: CohortStats,
    pub coverage: FeatureStats,
}

async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let session = state.current().await;
    Json(StatsResponse {
        feature: session.active_feature_id().map(str::to_string),
        cohort: session.cohort_stats(&state.data.cohort),
        coverage: session.feature_stats(),
    })
}

#[derive(Debug, Serialize)]
struct NameResponse {
    name: String,
    code: CountryCode,
}

async fn get_name(Path(name): Path<String>) -> Result<Json<NameResponse>, ApiError> {
    let code = resolve_display_name_to_code(&name)
        .ok_or_else(|| ApiError::NotFound(format!("no country named {name:?}")))?;
    Ok(Json(NameResponse { name, code }))
}

// =============================================================================
// ROUTER
// =============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/features", get(list_features))
        .route("/session", get(get_session).put(put_session))
        .route("/session/status", get(get_status))
        .route("/session/countries/{code}", get(get_country))
        .route("/session/stats", get(get_stats))
        .route("/names/{name}", get(get_name))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
