//! HTTP API command.

use std::sync::Arc;

use anyhow::Result;
use preview_guard_pipeline::{CodeTransformer, OpenAiTransformer, Sanitizer};
use preview_guard_server::ApiServer;

use crate::config::ConfigFile;

/// Run the serve command.
pub async fn run(config: ConfigFile) -> Result<()> {
    let transformer: Arc<dyn CodeTransformer> =
        Arc::new(OpenAiTransformer::from_env(config.service)?);
    let sanitizer = Sanitizer::with_config(transformer, config.pipeline);

    ApiServer::new(config.server, sanitizer).start().await?;

    Ok(())
}
