//! Transformation orchestrator.
//!
//! States: the shape gate either rejects the input outright (no service
//! calls) or the sanitizer runs up to `max_attempts` transform-and-validate
//! rounds, ending in success or exhaustion. Each retry is told only about
//! the failure of the attempt immediately before it.

use std::path::PathBuf;

use preview_guard_rules::{inspect_shape, validate_minimal};
use serde::{Deserialize, Serialize};

use crate::error::{AttemptFailure, SanitizationError};
use crate::prompt::{system_instruction, user_message};
use crate::transformer::{CodeTransformer, TransformOutput};

/// Default number of transformation attempts per submission.
pub const MAX_ATTEMPTS: u32 = 2;

/// Marker recorded in `fixes_applied` on success.
pub const AI_SANITIZATION_FIX: &str = "AI sanitization";

/// Characters of raw output kept in the debug info of a terminal error.
const DEBUG_TAIL_CHARS: usize = 200;

/// Sanitizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizerConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Optional file overriding the built-in instruction text
    #[serde(default)]
    pub instructions_path: Option<PathBuf>,
}

fn default_max_attempts() -> u32 {
    MAX_ATTEMPTS
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            instructions_path: None,
        }
    }
}

/// Successful sanitization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizationResult {
    /// Code that passed the minimal validator
    pub code: String,

    /// Attempt number that succeeded (1-based)
    pub attempts: u32,

    pub fixes_applied: Vec<String>,
    pub warnings: Vec<String>,
}

/// Metadata about the last service response, kept for diagnostics.
#[derive(Debug, Default)]
struct LastOutput {
    completion: Option<String>,
    text: String,
}

impl LastOutput {
    fn record(&mut self, output: &TransformOutput) {
        self.completion = Some(output.completion.to_string());
        self.text = output.text.clone();
    }

    fn debug_info(&self) -> String {
        let char_count = self.text.chars().count();
        let tail: String = self
            .text
            .chars()
            .skip(char_count.saturating_sub(DEBUG_TAIL_CHARS))
            .collect();

        format!(
            "finish_reason={}, output_length={}, output_tail={:?}",
            self.completion.as_deref().unwrap_or("none"),
            self.text.len(),
            tail
        )
    }
}

/// Runs untrusted component source through the transformation service until
/// the minimal validator accepts it or the attempt budget runs out.
pub struct Sanitizer<T> {
    transformer: T,
    config: SanitizerConfig,
}

impl<T: CodeTransformer> Sanitizer<T> {
    pub fn new(transformer: T) -> Self {
        Self::with_config(transformer, SanitizerConfig::default())
    }

    pub fn with_config(transformer: T, config: SanitizerConfig) -> Self {
        Self {
            transformer,
            config,
        }
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Sanitize `raw` into a component the rendering sandbox can mount.
    pub async fn sanitize(&self, raw: &str) -> Result<SanitizationResult, SanitizationError> {
        let shape = inspect_shape(raw);
        if !shape.is_component() {
            tracing::warn!("Rejected input before transformation: {:?}", shape);
            return Err(SanitizationError::shape_rejected(shape.missing()));
        }

        let instruction = system_instruction(self.config.instructions_path.as_deref());
        let max_attempts = self.config.max_attempts.max(1);

        let mut warnings: Vec<String> = Vec::new();
        let mut last = LastOutput::default();

        for attempt in 1..=max_attempts {
            tracing::info!("Sanitization attempt {}/{}", attempt, max_attempts);

            let attempt_result = self
                .run_attempt(instruction, raw, &warnings, &mut last)
                .await;
            let failure = match attempt_result {
                Ok(code) => {
                    tracing::info!("Sanitization succeeded on attempt {}", attempt);
                    return Ok(SanitizationResult {
                        code,
                        attempts: attempt,
                        fixes_applied: vec![AI_SANITIZATION_FIX.to_string()],
                        warnings: Vec::new(),
                    });
                }
                Err(failure) => failure,
            };

            tracing::warn!("Attempt {} failed: {}", attempt, failure);
            warnings = failure.into_warnings();
        }

        let error = SanitizationError::exhausted(max_attempts, warnings, last.debug_info());
        tracing::error!("{}: {:?}", error.message, error.details);
        Err(error)
    }

    /// One transform-and-validate round. Returns the cleaned code on success.
    async fn run_attempt(
        &self,
        instruction: &str,
        raw: &str,
        previous_warnings: &[String],
        last: &mut LastOutput,
    ) -> Result<String, AttemptFailure> {
        // Diagnostics describe only the attempt that ran last
        *last = LastOutput::default();

        let message = user_message(raw, previous_warnings)
            .map_err(|e| AttemptFailure::ServiceError(format!("failed to render prompt: {e}")))?;

        let output = self
            .transformer
            .transform(instruction, &message)
            .await
            .map_err(|e| AttemptFailure::ServiceError(e.to_string()))?;

        last.record(&output);
        tracing::debug!(
            "Transformer returned {} bytes (finish_reason={})",
            output.text.len(),
            output.completion
        );

        if output.text.trim().is_empty() {
            return Err(AttemptFailure::EmptyResponse);
        }

        if output.completion.is_truncated() {
            return Err(AttemptFailure::Truncated);
        }

        let validation = validate_minimal(&output.text);
        if validation.valid {
            Ok(validation.code)
        } else {
            Err(AttemptFailure::ValidationFailed(validation.errors))
        }
    }
}
