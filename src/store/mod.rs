pub mod dir;
pub mod memory;

pub use dir::DirStore;
pub use memory::MemoryStore;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{HealthResult, HealthTier};
use crate::snapshot::TransactionSnapshot;

/// Source of transaction snapshots for the health engine.
pub trait TransactionStore: Send + Sync {
    /// Snapshot for `id`, or None if the store has no such transaction
    fn load(&self, id: &str) -> Result<Option<TransactionSnapshot>>;

    /// All transaction ids, sorted
    fn list_ids(&self) -> Result<Vec<String>>;

    /// Remember the last computed health for `id`
    fn record_health(&self, id: &str, record: &HealthRecord) -> Result<()>;
}

/// Last computed health, cached next to the transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthRecord {
    pub version: u32,
    pub transaction_id: String,
    pub score: u8,
    pub status: HealthTier,
    pub computed_at: DateTime<Utc>,
}

impl HealthRecord {
    pub fn new(transaction_id: &str, result: &HealthResult, computed_at: DateTime<Utc>) -> Self {
        Self {
            version: 1,
            transaction_id: transaction_id.to_string(),
            score: result.score,
            status: result.status,
            computed_at,
        }
    }
}

/// Ids map straight to file names, so only `[A-Za-z0-9_-]` is allowed.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
