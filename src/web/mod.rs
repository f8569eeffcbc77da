mod assets;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::dashboard::{Dashboard, HeadlineMetrics};

pub struct WebServerConfig {
    pub scenario_name: String,
    pub dashboard: Dashboard,
    pub host: String,
    pub port: u16,
}

pub struct AppState {
    pub scenario_name: String,
    pub dashboard: Dashboard,
}

#[derive(Debug, Deserialize)]
pub struct ProgressionQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/dashboard", get(dashboard))
        .route("/api/metrics", get(metrics))
        .route("/api/progression", get(progression))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario_name,
        dashboard,
        host,
        port,
    } = config;

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    let state = Arc::new(AppState {
        scenario_name: scenario_name.clone(),
        dashboard,
    });

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(scenario = %scenario_name, "dashboard live at http://{addr} (Ctrl+C to stop)");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {err}");
    }
    info!("shutting down dashboard server");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        assets::STYLES_CSS,
    )
}

async fn script() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        assets::APP_JS,
    )
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Json<Dashboard> {
    Json(state.dashboard.clone())
}

#[derive(Serialize)]
struct MetricsResponse {
    scenario: String,
    metrics: HeadlineMetrics,
}

async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        scenario: state.scenario_name.clone(),
        metrics: state.dashboard.metrics.clone(),
    })
}

async fn progression(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProgressionQuery>,
) -> Response {
    match state.dashboard.progression(query.date) {
        Ok(progression) => Json(progression).into_response(),
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: err.to_string(),
            }),
        )
            .into_response(),
    }
}
