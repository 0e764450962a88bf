//! Write a starter config and instruction prompt.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use preview_guard_pipeline::DEFAULT_INSTRUCTIONS;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing preview-guard...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    // Instruction prompt, editable and referenced from the config
    let prompts_dir = root.join("prompts");
    fs::create_dir_all(&prompts_dir).context("Failed to create prompts directory")?;
    let prompt_path = prompts_dir.join("sanitize.md");
    if !prompt_path.exists() || yes {
        fs::write(&prompt_path, DEFAULT_INSTRUCTIONS)
            .context("Failed to write prompts/sanitize.md")?;
        tracing::info!("Created {}", prompt_path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Set OPENAI_API_KEY and run 'preview-guard serve' to start the API.");

    Ok(())
}

pub(crate) const DEFAULT_CONFIG: &str = r#"# preview-guard configuration

[service]
# OpenAI-compatible API root (/v1/chat/completions is appended)
base_url = "https://api.openai.com"
model = "gpt-4o-mini"

# Environment variable holding the bearer token
api_key_env = "OPENAI_API_KEY"

max_tokens = 8000
temperature = 0.2
timeout_secs = 120

[pipeline]
# Total service calls per sanitize request
max_attempts = 2

# Custom instruction prompt (read once per process)
# instructions_path = "prompts/sanitize.md"

[server]
host = "127.0.0.1"
port = 7878
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_config_and_prompt() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("preview-guard.toml");

        run(&config_path, false).await.unwrap();

        assert_eq!(fs::read_to_string(&config_path).unwrap(), DEFAULT_CONFIG);
        let prompt = fs::read_to_string(temp.path().join("prompts/sanitize.md")).unwrap();
        assert_eq!(prompt, DEFAULT_INSTRUCTIONS);
    }

    #[tokio::test]
    async fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("preview-guard.toml");
        fs::write(&config_path, "# mine\n").unwrap();

        run(&config_path, false).await.unwrap();
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "# mine\n");

        run(&config_path, true).await.unwrap();
        assert_eq!(fs::read_to_string(&config_path).unwrap(), DEFAULT_CONFIG);
    }
}
