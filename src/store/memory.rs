use super::{HealthRecord, TransactionStore};
use crate::snapshot::TransactionSnapshot;
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory store, keyed by transaction id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: RwLock<BTreeMap<String, TransactionSnapshot>>,
    health: RwLock<BTreeMap<String, HealthRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, snapshot: TransactionSnapshot) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| anyhow!("snapshot lock poisoned"))?;
        snapshots.insert(snapshot.transaction.id.clone(), snapshot);
        Ok(())
    }

    pub fn health(&self, id: &str) -> Option<HealthRecord> {
        self.health.read().ok()?.get(id).cloned()
    }
}

impl TransactionStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Option<TransactionSnapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| anyhow!("snapshot lock poisoned"))?;
        Ok(snapshots.get(id).cloned())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| anyhow!("snapshot lock poisoned"))?;
        Ok(snapshots.keys().cloned().collect())
    }

    fn record_health(&self, id: &str, record: &HealthRecord) -> Result<()> {
        let mut health = self
            .health
            .write()
            .map_err(|_| anyhow!("health lock poisoned"))?;
        health.insert(id.to_string(), record.clone());
        Ok(())
    }
}
