//! HTTP router and handlers

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer,
};
use tracing::debug;

use crate::client::BlockchainApi;
use crate::dashboard::{Dashboard, DashboardView};
use crate::{Error, ErrorKind};

/// Shared application state
pub struct AppState {
    /// Dashboard controller holding the view
    pub dashboard: Arc<Dashboard>,
    /// Client used by passthrough endpoints
    pub api: Arc<dyn BlockchainApi>,
    /// Chain used by passthrough endpoints
    pub chain: String,
    /// Default limit for recent transactions
    pub recent_limit: u32,
}

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/view", get(view_handler))
        .route("/api/cards", get(cards_handler))
        .route("/api/stats/refresh", post(refresh_handler))
        .route("/api/lookup/address", post(address_lookup_handler))
        .route("/api/lookup/transaction", post(transaction_lookup_handler))
        .route("/api/chain/stats", get(chain_stats_handler))
        .route("/api/chain/transactions", get(recent_transactions_handler))
        .layer(CatchPanicLayer::new())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Lookup request body
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    /// Address or transaction id
    pub query: String,
}

/// Query string of the recent-transactions endpoint
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    /// Overrides the configured limit
    pub limit: Option<u32>,
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = state.dashboard.view();
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "chain": view.chain,
        "busy": view.is_busy(),
    }))
}

async fn view_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = state.dashboard.view();
    view_body(&view)
}

async fn cards_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard.cards())
}

async fn refresh_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = state.dashboard.load_general_stats().await;
    view_body(&view)
}

async fn address_lookup_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LookupRequest>,
) -> impl IntoResponse {
    debug!("Address lookup requested");
    let view = state.dashboard.lookup_address(&request.query).await;
    view_body(&view)
}

async fn transaction_lookup_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LookupRequest>,
) -> impl IntoResponse {
    debug!("Transaction lookup requested");
    let view = state.dashboard.lookup_transaction(&request.query).await;
    view_body(&view)
}

async fn chain_stats_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.api.chain_stats(&state.chain).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn recent_transactions_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentParams>,
) -> Response {
    let limit = params.limit.unwrap_or(state.recent_limit);
    match state.api.recent_transactions(&state.chain, limit).await {
        Ok(transactions) => Json(transactions).into_response(),
        Err(e) => error_response(&e),
    }
}

fn view_body(view: &DashboardView) -> Json<Value> {
    Json(json!({
        "view": view,
        "banner": view.banner(),
    }))
}

/// Map a classified failure onto a status and the fixed message for its kind
fn error_response(err: &Error) -> Response {
    let kind = err.kind();
    let status = match kind {
        ErrorKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Authorization | ErrorKind::Transient => StatusCode::BAD_GATEWAY,
    };
    debug!(%kind, error = %err, "Passthrough request failed");
    (
        status,
        Json(json!({
            "error": kind.as_str(),
            "message": kind.message(),
        })),
    )
        .into_response()
}
