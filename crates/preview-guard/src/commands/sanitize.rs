//! Sanitize a single component through the transformation service.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use preview_guard_pipeline::{OpenAiTransformer, Sanitizer};

use crate::config::ConfigFile;

/// Run the sanitize command.
pub async fn run(
    config: ConfigFile,
    input: PathBuf,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let raw = read_input(&input)?;

    let transformer = OpenAiTransformer::from_env(config.service)?;
    tracing::debug!("Using model {}", transformer.config().model);
    let sanitizer = Sanitizer::with_config(transformer, config.pipeline);

    let result = match sanitizer.sanitize(&raw).await {
        Ok(result) => result,
        Err(err) => {
            for detail in &err.details {
                tracing::error!("  {}", detail);
            }
            tracing::debug!("{}", err.debug_info);
            return Err(err.into());
        }
    };

    tracing::info!("Sanitized in {} attempt(s)", result.attempts);
    for warning in &result.warnings {
        tracing::warn!("{}", warning);
    }

    let rendered = if json {
        serde_json::to_string_pretty(&result)?
    } else {
        result.code
    };

    match output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}
