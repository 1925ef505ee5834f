//! HTTP surface for EdgeCare: login, pain logging for players and weekly
//! analytics for coaches.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use edgecare_core::{LogService, PainLogStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::timeout::TimeoutLayer;

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;

use session::{SessionSigner, UserDirectory};

pub struct AppState {
    pub store: Arc<dyn PainLogStore>,
    pub service: LogService,
    pub sessions: SessionSigner,
    pub users: UserDirectory,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PainLogStore>,
        recent_limit: usize,
        sessions: SessionSigner,
        users: UserDirectory,
    ) -> Self {
        Self {
            service: LogService::new(store.clone()).with_recent_limit(recent_limit),
            store,
            sessions,
            users,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn build_router(state: Arc<AppState>, max_body_size: usize, timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/metrics", get(routes::metrics_endpoint))
        .route("/login", post(routes::login))
        .route("/log_pain", post(routes::log_pain))
        .route("/log_no_pain", post(routes::log_no_pain))
        .route("/recent_logs", get(routes::recent_logs))
        .route("/weekly_summary", get(routes::weekly_summary))
        .route("/api/weekly-data", get(routes::weekly_data))
        .route("/api/players", get(routes::players))
        .route("/api/coach_weekly/{player_id}", get(routes::coach_weekly))
        .layer(axum::extract::DefaultBodyLimit::max(max_body_size))
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}
