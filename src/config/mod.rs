mod init;
mod schema;

pub use init::write_default_config;
pub use schema::{Config, ServerConfig, StoreConfig, DEFAULT_BIND};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/deal-health/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("deal-health"))
}

/// Get the default config file path (~/.config/deal-health/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

impl Config {
    /// Store root from the config, or ~/.config/deal-health/data
    pub fn store_path(&self) -> Result<PathBuf> {
        match self.store.path {
            Some(ref path) => Ok(path.clone()),
            None => Ok(get_config_dir()?.join("data")),
        }
    }
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to built-in defaults when that file doesn't exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let path = env::temp_dir().join("deal_health_test_no_such_config.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_full_config() {
        let path = env::temp_dir().join("deal_health_test_full_config.yaml");
        fs::write(
            &path,
            r#"
store:
  path: /var/lib/deal-health
server:
  bind: 0.0.0.0:9000
scoring:
  overdue_milestones: { per_item: 20, cap: 90 }
"#,
        )
        .unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.store_path().unwrap(), PathBuf::from("/var/lib/deal-health"));
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        let scoring = config.scoring.unwrap();
        assert_eq!(scoring.overdue_milestones.unwrap().per_item, 20);
        assert!(scoring.pace_ratio.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_empty_sections_use_defaults() {
        let path = env::temp_dir().join("deal_health_test_empty_config.yaml");
        fs::write(&path, "{}").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert!(config.store.path.is_none());
        assert!(config.scoring.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let path = env::temp_dir().join("deal_health_test_bad_config.yaml");
        fs::write(&path, "server: [unterminated").unwrap();

        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));

        let _ = fs::remove_file(&path);
    }
}
