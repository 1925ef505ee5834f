use std::sync::Arc;

use edgecare_core::{JsonLinesStore, MemoryStore, PainLogStore};
use edgecare_server::config::ServerConfig;
use edgecare_server::middleware::LoggingStore;
use edgecare_server::session::{SessionSigner, UserDirectory};
use edgecare_server::{AppState, build_router};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// `EDGECARE_LOG_LEVEL` wins over `RUST_LOG`; default `info`.
fn log_filter_with<F>(get: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get("EDGECARE_LOG_LEVEL")
        .or_else(|| get("RUST_LOG"))
        .unwrap_or_else(|| "info".to_string())
}

/// Falls back to `info` when the directive does not parse.
fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let log_env = log_filter_with(|k| std::env::var(k).ok());
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter(&log_env))
        .init();
    tracing::info!(%log_env, "edgecare: log filter");

    let handle = PrometheusBuilder::new().install_recorder()?;

    let config = ServerConfig::from_env()?;

    let store: Arc<dyn PainLogStore> = match &config.core.data_file {
        Some(path) => {
            info!(path = %path.display(), "using json-lines log store");
            Arc::new(LoggingStore::new(JsonLinesStore::new(path.clone())))
        }
        None => {
            warn!("EDGECARE_DATA_FILE not set; entries are kept in memory only");
            Arc::new(LoggingStore::new(MemoryStore::new()))
        }
    };

    let sessions = match &config.session_secret {
        Some(secret) => SessionSigner::new(secret)?,
        None => {
            warn!("EDGECARE_SESSION_SECRET not set; sessions will not survive a restart");
            SessionSigner::random()?
        }
    };

    let state = Arc::new(
        AppState::new(
            store,
            config.core.recent_limit,
            sessions,
            UserDirectory::new(config.users),
        )
        .with_metrics(handle),
    );

    let app = build_router(state, config.max_body_size, config.request_timeout);

    let addr = config.address;
    info!(
        %addr,
        max_body_bytes = config.max_body_size,
        reset_delay_ms = config.core.reset_delay.as_millis() as u64,
        "starting HTTP server"
    );

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    let server = axum::serve(listener, app.into_make_service());
    if let Err(e) = server
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl+c: {e}");
            }
        })
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_variable_wins_over_rust_log() {
        let get = |k: &str| match k {
            "EDGECARE_LOG_LEVEL" => Some("debug".to_string()),
            "RUST_LOG" => Some("warn".to_string()),
            _ => None,
        };
        assert_eq!(log_filter_with(get), "debug");
    }

    #[test]
    fn rust_log_then_info_are_fallbacks() {
        let rust_log_only = |k: &str| (k == "RUST_LOG").then(|| "warn".to_string());
        assert_eq!(log_filter_with(rust_log_only), "warn");
        assert_eq!(log_filter_with(|_| None), "info");
    }

    #[test]
    fn invalid_directive_falls_back_to_info() {
        assert_eq!(env_filter("invalid[[[filter").to_string(), "info");
        assert_eq!(env_filter("edgecare=debug").to_string(), "edgecare=debug");
    }
}
