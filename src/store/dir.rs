use super::{is_valid_id, HealthRecord, TransactionStore};
use crate::snapshot::TransactionSnapshot;
use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Store backed by a directory of JSON files.
///
/// ```text
/// <root>/transactions/<id>.json   snapshot
/// <root>/health/<id>.json         last HealthRecord
/// ```
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn transactions_dir(&self) -> PathBuf {
        self.root.join("transactions")
    }

    fn health_dir(&self) -> PathBuf {
        self.root.join("health")
    }

    fn snapshot_path(&self, id: &str) -> PathBuf {
        self.transactions_dir().join(format!("{}.json", id))
    }

    fn health_path(&self, id: &str) -> PathBuf {
        self.health_dir().join(format!("{}.json", id))
    }

    /// Load the cached health record for `id`, if one was written
    pub fn load_health(&self, id: &str) -> Result<Option<HealthRecord>> {
        if !is_valid_id(id) {
            bail!("Invalid transaction id: {:?}", id);
        }
        let path = self.health_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)
            .with_context(|| format!("Failed to open health record at {}", path.display()))?;
        let record: HealthRecord =
            serde_json::from_reader(file).context("Failed to load health record")?;

        if record.version != 1 {
            bail!("Unsupported health record version: {}", record.version);
        }

        Ok(Some(record))
    }
}

impl TransactionStore for DirStore {
    fn load(&self, id: &str) -> Result<Option<TransactionSnapshot>> {
        if !is_valid_id(id) {
            bail!("Invalid transaction id: {:?}", id);
        }
        let path = self.snapshot_path(id);
        if !path.exists() {
            debug!(id, path = %path.display(), "no snapshot");
            return Ok(None);
        }

        let snapshot = crate::snapshot::load_snapshot(&path)?;
        Ok(Some(snapshot))
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let dir = self.transactions_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read transactions directory {}", dir.display()))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_id(stem) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Written atomically so readers never see a half-written record.
    fn record_health(&self, id: &str, record: &HealthRecord) -> Result<()> {
        if !is_valid_id(id) {
            bail!("Invalid transaction id: {:?}", id);
        }
        let dir = self.health_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create health directory at {}", dir.display()))?;

        let path = self.health_path(id);
        let mut file = AtomicWriteFile::open(&path)
            .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

        serde_json::to_writer_pretty(&mut file, record)
            .context("Failed to serialize health record")?;

        file.commit().context("Failed to save health record")?;

        debug!(id, score = record.score, "recorded health");
        Ok(())
    }
}
