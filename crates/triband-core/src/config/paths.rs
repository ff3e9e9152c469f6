//! Standard locations for triband configuration files

use std::path::PathBuf;

/// Per-user configuration directory
///
/// Returns: `~/.config/triband` on Linux (platform equivalent elsewhere),
/// or `./triband` when no config directory is known.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("triband")
}

/// Default engine config file
///
/// Returns: `{config_dir}/config.yaml`
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_layout() {
        let path = default_config_path();
        assert!(path.ends_with("triband/config.yaml"));
        assert!(path.starts_with(config_dir()));
    }
}
