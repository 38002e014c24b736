// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The API is the hand-off point to the
// chart/UI client: it fetches (or reuses cached) market inputs, runs the
// stateless engine and returns the full report as JSON.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::engine::{self, OracleReport};
use crate::error::{validate_sensitivity, EngineError};
use crate::types::AlertState;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/symbols", get(symbols))
        .route("/api/v1/oracle/:symbol", get(oracle))
        .route("/api/v1/config", get(get_config))
        .route("/api/v1/config/alerts", post(set_alerts))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Symbols
// =============================================================================

async fn symbols(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.config.read();
    Json(serde_json::json!({
        "symbols": config.symbols,
        "quote_asset": config.quote_asset,
    }))
}

// =============================================================================
// Oracle report
// =============================================================================

#[derive(Debug, Deserialize)]
struct OracleQuery {
    /// Overrides the configured alert sensitivity for this request only.
    #[serde(default)]
    sensitivity: Option<f64>,
    /// Bypass the input cache.
    #[serde(default)]
    refresh: bool,
}

async fn oracle(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<OracleQuery>,
) -> Result<Json<OracleReport>, ApiError> {
    // Copy what we need out of the config so no lock is held across awaits.
    let (symbol, params) = {
        let config = state.config.read();
        let resolved = config.resolve_symbol(&symbol).ok_or_else(|| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Unknown symbol '{symbol}'. Use one of {:?}", config.symbols),
            )
        })?;
        (resolved, config.engine_params(query.sensitivity))
    };

    validate_sensitivity(params.sensitivity_pct)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let input = state
        .market_data
        .inputs(&symbol, query.refresh)
        .await
        .map_err(|e| {
            warn!(symbol = %symbol, error = %format!("{e:#}"), "market data fetch failed");
            api_error(StatusCode::BAD_GATEWAY, format!("{e:#}"))
        })?;

    let report = engine::run(&input, &params).map_err(|e| {
        warn!(symbol = %symbol, error = %e, "engine rejected market inputs");
        let status = match e {
            EngineError::SensitivityOutOfRange(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        api_error(status, e.to_string())
    })?;

    match report.alert.state {
        AlertState::FibProximity => warn!(
            symbol = %symbol,
            fib = format!("{:.2}", report.fibonacci.level),
            distance_pct = ?report.alert.distance_to_fib_pct,
            "price inside Fibonacci 0.618 zone"
        ),
        AlertState::NearHigh => info!(
            symbol = %symbol,
            high = report.fibonacci.high,
            "price near window high"
        ),
        AlertState::None => {}
    }

    info!(
        symbol = %symbol,
        score = report.score.score,
        label = %report.label,
        "oracle report served"
    );

    Ok(Json(report))
}

// =============================================================================
// Configuration
// =============================================================================

async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.config.read().clone();
    Json(config)
}

#[derive(Debug, Deserialize)]
struct AlertSettingsUpdate {
    #[serde(default)]
    sensitivity_pct: Option<f64>,
    #[serde(default)]
    visual_alerts: Option<bool>,
}

async fn set_alerts(
    State(state): State<Arc<AppState>>,
    Json(update): Json<AlertSettingsUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(pct) = update.sensitivity_pct {
        validate_sensitivity(pct).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    }

    let config_clone = {
        let mut config = state.config.write();
        if let Some(pct) = update.sensitivity_pct {
            config.alerts.sensitivity_pct = pct;
        }
        if let Some(visual) = update.visual_alerts {
            config.alerts.visual_alerts = visual;
        }
        config.clone()
    };

    info!(
        sensitivity_pct = config_clone.alerts.sensitivity_pct,
        visual_alerts = config_clone.alerts.visual_alerts,
        "Alert settings updated"
    );

    // Save to disk (best-effort).
    if let Err(e) = config_clone.save(&state.config_path) {
        warn!(error = %e, "Failed to save alert settings to disk");
    }

    Ok(Json(config_clone.alerts))
}
