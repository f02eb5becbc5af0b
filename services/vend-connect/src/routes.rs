//! HTTP routes for the Vend connect flow
//!
//! Endpoints:
//! - GET /connect: redirect the merchant to Vend's authorization page
//! - GET /callback: exchange the code Vend sends back for an access token
//! - GET /health: uptime and exchange counters
//! - GET /metrics: Prometheus exposition
//!
//! Every request builds its own gateway from the shared configuration, so
//! flows never share mutable state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use tracing::{info, warn};
use vend_api::VendRequest;
use vend_auth::AuthenticationGateway;

use crate::config::{VendConfig, is_valid_store_name};
use crate::error::{gateway_error_response, json_error, outcome_for};
use crate::metrics;
use crate::redirect::AxumRedirector;

/// Counters reported by /health.
#[derive(Debug)]
pub struct FlowCounters {
    pub started_at: Instant,
    pub logins: AtomicU64,
    pub exchanges_succeeded: AtomicU64,
    pub exchanges_failed: AtomicU64,
}

impl FlowCounters {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            logins: AtomicU64::new(0),
            exchanges_succeeded: AtomicU64::new(0),
            exchanges_failed: AtomicU64::new(0),
        }
    }
}

impl Default for FlowCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared application state accessible from all handlers
#[derive(Clone)]
pub struct AppState {
    pub vend: Arc<VendConfig>,
    pub http_client: VendRequest,
    pub counters: Arc<FlowCounters>,
    pub prometheus: PrometheusHandle,
}

impl AppState {
    fn gateway(
        &self,
        store_override: Option<&str>,
    ) -> AuthenticationGateway<VendRequest, AxumRedirector> {
        AuthenticationGateway::with_config(
            self.http_client.clone(),
            AxumRedirector,
            self.vend.gateway_config(store_override),
        )
    }
}

/// Build the router with all routes and shared state.
///
/// Applies a concurrency limit layer based on `max_connections`.
pub fn build_router(state: AppState, max_connections: usize) -> Router {
    Router::new()
        .route("/connect", get(connect))
        .route("/callback", get(callback))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_connections))
        .with_state(state)
}

fn request_id() -> String {
    format!("req_{}", uuid::Uuid::new_v4().as_simple())
}

/// GET /connect: start the authorization-code flow.
async fn connect(State(state): State<AppState>) -> Response {
    let request_id = request_id();
    let gateway = state.gateway(None);

    match gateway.initiate_login() {
        Ok(redirect) => {
            state.counters.logins.fetch_add(1, Ordering::Relaxed);
            metrics::record_login("redirected");
            info!(request_id, store = %state.vend.store_name, "redirecting to Vend");
            redirect.into_response()
        }
        Err(e) => {
            metrics::record_login(outcome_for(&e));
            warn!(request_id, error = %e, "unable to initiate login");
            gateway_error_response(&e, &request_id)
        }
    }
}

/// Query parameters Vend appends to the callback URI.
#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    domain_prefix: Option<String>,
    error: Option<String>,
}

/// GET /callback: exchange the temporary code for an access token.
async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let request_id = request_id();

    if let Some(error) = params.error {
        warn!(request_id, error, "merchant did not authorize the application");
        return json_error(
            StatusCode::BAD_REQUEST,
            &format!("authorization denied: {error}"),
            &request_id,
        );
    }

    let store = params.domain_prefix.as_deref().filter(|s| !s.is_empty());
    if let Some(store) = store
        && !is_valid_store_name(store)
    {
        warn!(request_id, store, "rejecting callback with invalid domain_prefix");
        return json_error(StatusCode::BAD_REQUEST, "invalid domain_prefix", &request_id);
    }

    let gateway = state.gateway(store);
    let code = params.code.as_deref().unwrap_or_default();

    let started = Instant::now();
    let result = gateway.to_exchange(code).await;
    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Ok(token) => {
            state.counters.exchanges_succeeded.fetch_add(1, Ordering::Relaxed);
            metrics::record_exchange("ok", elapsed);
            info!(
                request_id,
                store = %gateway.config().store_name,
                expires_in = token.expires_in,
                "Vend code exchanged"
            );
            (StatusCode::OK, axum::Json(token)).into_response()
        }
        Err(e) => {
            state.counters.exchanges_failed.fetch_add(1, Ordering::Relaxed);
            metrics::record_exchange(outcome_for(&e), elapsed);
            warn!(
                request_id,
                store = %gateway.config().store_name,
                error = %e,
                "Vend code exchange failed"
            );
            gateway_error_response(&e, &request_id)
        }
    }
}

/// GET /health: uptime and flow counters.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let counters = &state.counters;
    let body = serde_json::json!({
        "status": "healthy",
        "store": state.vend.store_name,
        "uptime_seconds": counters.started_at.elapsed().as_secs(),
        "logins_total": counters.logins.load(Ordering::Relaxed),
        "exchanges_succeeded": counters.exchanges_succeeded.load(Ordering::Relaxed),
        "exchanges_failed": counters.exchanges_failed.load(Ordering::Relaxed),
    });

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
}

/// GET /metrics: Prometheus text exposition format.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.prometheus.render(),
    )
}
