pub mod types;
pub mod validation;

pub use types::*;
pub use validation::validate_snapshot;

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

/// Load a snapshot from a JSON file
pub fn load_snapshot(path: &Path) -> Result<TransactionSnapshot> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot file at {}", path.display()))?;

    let snapshot: TransactionSnapshot = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse snapshot: invalid JSON in {}", path.display()))?;

    Ok(snapshot)
}
