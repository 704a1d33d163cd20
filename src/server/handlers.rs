use anyhow::Context;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::error::ApiError;
use super::AppState;
use crate::scoring::{compute_health, HealthResult, HealthTier, RiskRank, TierBand, TIERS};
use crate::snapshot::validate_snapshot;
use crate::store::{is_valid_id, HealthRecord};

/// One row of `GET /transactions/health`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthSummary {
    pub transaction_id: String,
    pub closing_date: Option<NaiveDate>,
    pub score: u8,
    pub status: HealthTier,
    pub color: String,
}

impl HealthSummary {
    fn rank(&self) -> RiskRank<'_> {
        RiskRank {
            score: self.score,
            closing_date: self.closing_date,
            id: &self.transaction_id,
        }
    }
}

pub async fn healthz_handler() -> &'static str {
    "ok"
}

pub async fn tiers_handler() -> Json<&'static [TierBand]> {
    Json(&TIERS[..])
}

pub async fn transaction_health_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HealthResult>, ApiError> {
    let now = state.now();
    let (result, id) = run_blocking(move || {
        let (_, result) = score_transaction(&state, &id, now)?;
        Ok((result, id))
    })
    .await?;
    info!(
        transaction_id = %id,
        score = result.score,
        status = %result.status,
        "health computed"
    );
    Ok(Json(result))
}

/// Every stored transaction, riskiest first. Transactions that fail to load
/// or validate are skipped with a warning.
pub async fn all_health_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<HealthSummary>>, ApiError> {
    let now = state.now();
    let mut summaries = run_blocking(move || {
        let ids = state.store.list_ids()?;
        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            match score_transaction(&state, &id, now) {
                Ok((closing_date, result)) => summaries.push(HealthSummary {
                    transaction_id: id,
                    closing_date,
                    score: result.score,
                    status: result.status,
                    color: result.color,
                }),
                Err(e) => warn!(transaction_id = %id, error = %e, "skipping transaction"),
            }
        }
        Ok(summaries)
    })
    .await?;

    summaries.sort_by(|a, b| a.rank().cmp(&b.rank()));
    Ok(Json(summaries))
}

/// Store reads and writes are plain file I/O; keep them off the async workers.
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .context("Health task failed")?
}

/// Load, validate, score, and cache one transaction's health.
fn score_transaction(
    state: &AppState,
    id: &str,
    now: DateTime<Utc>,
) -> Result<(Option<NaiveDate>, HealthResult), ApiError> {
    if !is_valid_id(id) {
        return Err(ApiError::InvalidId(id.to_string()));
    }

    let snapshot = state
        .store
        .load(id)?
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
    validate_snapshot(&snapshot).map_err(ApiError::InvalidSnapshot)?;

    let result = compute_health(&snapshot, now, &state.scoring);

    // The cache is best-effort; a stale record never blocks a response
    let record = HealthRecord::new(id, &result, now);
    if let Err(e) = state.store.record_health(id, &record) {
        warn!(transaction_id = %id, error = %e, "failed to record health");
    }

    Ok((snapshot.transaction.closing_date, result))
}
