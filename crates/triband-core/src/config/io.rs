//! YAML configuration I/O
//!
//! Two loading flavours: [`load_config`] never fails and falls back to
//! defaults (for the implicit per-user config), [`read_config`] reports
//! every problem (for a file the user named explicitly).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Load configuration from a YAML file, falling back to defaults
///
/// A missing file yields `T::default()`. An unreadable or invalid file logs
/// a warning and also yields `T::default()`.
///
/// ```ignore
/// let config: EngineConfig = load_config(&default_config_path());
/// ```
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        log::info!("load_config: {:?} not found, using defaults", path);
        return T::default();
    }

    match read_config(path) {
        Ok(config) => {
            log::info!("load_config: loaded {:?}", path);
            config
        }
        Err(e) => {
            log::warn!("load_config: {:#}, using defaults", e);
            T::default()
        }
    }
}

/// Read configuration from a YAML file, failing on any error
pub fn read_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("save_config: wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct TestConfig {
        block: u32,
        label: String,
    }

    #[test]
    fn test_missing_file_gives_default() {
        let config: TestConfig = load_config(Path::new("/nonexistent/triband/config.yaml"));
        assert_eq!(config, TestConfig::default());
        assert!(read_config::<TestConfig>(Path::new("/nonexistent/triband/config.yaml")).is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "block: [not a number").unwrap();

        let config: TestConfig = load_config(&path);
        assert_eq!(config, TestConfig::default());

        let err = read_config::<TestConfig>(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }

    #[test]
    fn test_roundtrip_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = TestConfig {
            block: 256,
            label: "studio".to_string(),
        };
        save_config(&config, &path).unwrap();

        let loaded: TestConfig = load_config(&path);
        assert_eq!(loaded, config);
    }
}
