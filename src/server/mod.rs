pub mod error;
pub mod handlers;

pub use error::ApiError;
pub use handlers::HealthSummary;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::scoring::ScoringConfig;
use crate::store::TransactionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransactionStore>,
    pub scoring: Arc<ScoringConfig>,
    /// Pin the clock (tests); None reads the system clock per request
    pub fixed_now: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(store: Arc<dyn TransactionStore>, scoring: ScoringConfig) -> Self {
        Self {
            store,
            scoring: Arc::new(scoring),
            fixed_now: None,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/health/tiers", get(handlers::tiers_handler))
        .route("/transactions/health", get(handlers::all_health_handler))
        .route(
            "/transactions/:id/health",
            get(handlers::transaction_health_handler),
        )
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!(addr = %bind, "listening");

    axum::serve(listener, build_router(state))
        .await
        .context("Server error")?;
    Ok(())
}
