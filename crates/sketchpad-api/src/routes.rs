use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sketchpad_core::storage::JsonFileStorage;
use sketchpad_core::util::fingerprint;
use sketchpad_core::{Canvas, CanvasMetricsSnapshot, PollOutcome, SessionId, Stroke};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;

/// Cookie carrying a server-issued session id.
pub const SESSION_COOKIE: &str = "sketchpad_session";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    canvas: Arc<Canvas>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self, sketchpad_core::Error> {
        let storage = JsonFileStorage::new(config.log_path.clone());
        let canvas = Canvas::open(Box::new(storage), config.presence_timeout)?;
        tracing::info!(
            log_path = %config.log_path.display(),
            "Opened stroke log"
        );
        Ok(Self {
            canvas: Arc::new(canvas),
            config,
        })
    }
}

pub fn app_router(state: AppState) -> Router {
    let client_files = ServeDir::new(&state.config.static_dir);

    let api_routes = Router::new()
        .route(
            "/drawings",
            get(poll_drawings)
                .post(submit_drawing)
                .delete(reset_drawings),
        )
        .route("/draw", post(submit_drawing))
        .route("/create-session", post(create_session));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .fallback_service(client_files)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    user_count: usize,
    reset_generation: i64,
    strokes: usize,
    metrics: CanvasMetricsSnapshot,
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
        user_count: state.canvas.active_count().await,
        reset_generation: state.canvas.reset_generation().await,
        strokes: state.canvas.stroke_count().await,
        metrics: state.canvas.metrics_snapshot(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct PollQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
    #[serde(default)]
    since: i64,
}

async fn poll_drawings(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PollQuery>, QueryRejection>,
) -> Result<Json<PollOutcome>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let session = SessionId::parse(query.session_id.as_deref())
        .or_else(|| session_from_cookies(&headers));

    let outcome = state.canvas.poll(session.as_ref(), query.since).await;
    tracing::debug!(
        endpoint = "poll",
        session = session.as_ref().map(|id| fingerprint(id.as_str())),
        since = query.since,
        strokes = outcome.strokes.len(),
        user_count = outcome.user_count,
        reset_flag = outcome.reset_flag,
        "Served poll"
    );
    Ok(Json(outcome))
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    status: &'static str,
    data: Stroke,
}

async fn submit_drawing(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let Json(payload) =
        payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let stroke = state.canvas.submit(payload).await?;
    tracing::info!(
        endpoint = "submit",
        timestamp = stroke.timestamp,
        "Stored stroke"
    );
    Ok(Json(SubmitResponse {
        status: "success",
        data: stroke,
    }))
}

#[derive(Debug, Serialize)]
struct ResetResponse {
    status: &'static str,
    message: String,
}

async fn reset_drawings(State(state): State<AppState>) -> Result<Json<ResetResponse>, AppError> {
    let outcome = state.canvas.reset().await?;
    tracing::info!(
        endpoint = "reset",
        generation = outcome.generation,
        strokes_removed = outcome.strokes_removed,
        "Cleared canvas"
    );
    Ok(Json(ResetResponse {
        status: "success",
        message: format!("Canvas cleared ({} strokes removed)", outcome.strokes_removed),
    }))
}

#[derive(Debug, Serialize)]
struct CreateSessionResponse {
    status: &'static str,
    session_created: bool,
    session_id: SessionId,
}

async fn create_session(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = state.canvas.create_session().await;
    let cookie = HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={session}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        state.config.session_cookie_max_age_secs
    ))
    .map_err(|error| AppError::internal(format!("Session cookie is not a valid header: {error}")))?;
    tracing::info!(
        endpoint = "create_session",
        session = fingerprint(session.as_str()),
        "Issued session"
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(CreateSessionResponse {
            status: "success",
            session_created: true,
            session_id: session,
        }),
    ))
}

fn session_from_cookies(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name == SESSION_COOKIE {
                SessionId::parse(Some(value))
            } else {
                None
            }
        })
}
