use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::schema::{Config, ServerConfig, StoreConfig};
use crate::scoring::ScoringConfig;

const HEADER: &str = "\
# deal-health configuration
#
# scoring: each category subtracts min(count * per_item, cap) from 100.
# Remove a category (or set it to null) to stop it costing points.
";

/// Write a config file with every default spelled out.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_default_config(path: &Path, store_path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }
    }

    let config = Config {
        store: StoreConfig {
            path: Some(store_path.to_path_buf()),
        },
        server: ServerConfig::default(),
        scoring: Some(ScoringConfig::default()),
    };
    let yaml = serde_saphyr::to_string(&config).context("Failed to serialize default config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .and_then(|_| file.write_all(yaml.as_bytes()))
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}
