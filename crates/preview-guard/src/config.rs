//! Configuration file (preview-guard.toml).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use preview_guard_pipeline::{SanitizerConfig, TransformerConfig};
use preview_guard_server::ServerConfig;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub service: TransformerConfig,
    #[serde(default)]
    pub pipeline: SanitizerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let config = load_config(&temp.path().join("nope.toml")).unwrap();

        assert_eq!(config.pipeline.max_attempts, 2);
        assert_eq!(config.service.model, "gpt-4o-mini");
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("preview-guard.toml");
        fs::write(
            &path,
            "[service]\nmodel = \"gpt-4.1\"\n\n[pipeline]\nmax_attempts = 3\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.service.model, "gpt-4.1");
        assert_eq!(config.service.max_tokens, 8000);
        assert_eq!(config.pipeline.max_attempts, 3);
        assert!(config.pipeline.instructions_path.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("preview-guard.toml");
        fs::write(&path, "[pipeline\nmax_attempts = ").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn default_config_template_parses() {
        let config: ConfigFile = toml::from_str(crate::commands::init::DEFAULT_CONFIG).unwrap();
        assert_eq!(config.pipeline.max_attempts, 2);
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
