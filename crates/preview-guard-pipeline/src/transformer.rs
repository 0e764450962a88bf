//! Capability interface for the generative code-transformation service.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransformerError;

/// Why the service stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// Natural end of output
    Stop,

    /// Output was cut off by the token limit
    Length,

    /// Any other provider-specific reason
    Other(String),
}

impl CompletionStatus {
    /// Map a provider `finish_reason` string.
    pub fn from_reason(reason: Option<&str>) -> Self {
        match reason {
            Some("stop") | Some("end_turn") | None => Self::Stop,
            Some("length") | Some("max_tokens") => Self::Length,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Length)
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => f.write_str("stop"),
            Self::Length => f.write_str("length"),
            Self::Other(reason) => f.write_str(reason),
        }
    }
}

/// Text and completion metadata returned by one service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub text: String,
    pub completion: CompletionStatus,
}

impl TransformOutput {
    pub fn new(text: impl Into<String>, completion: CompletionStatus) -> Self {
        Self {
            text: text.into(),
            completion,
        }
    }
}

/// A generative service that rewrites component source.
///
/// Only the returned text and completion status are inspected; everything
/// else about the service is opaque to the pipeline.
#[async_trait]
pub trait CodeTransformer: Send + Sync {
    /// Send one instruction and user message, wait for the full response.
    async fn transform(
        &self,
        instruction: &str,
        user_message: &str,
    ) -> Result<TransformOutput, TransformerError>;
}

#[async_trait]
impl<T: CodeTransformer + ?Sized> CodeTransformer for std::sync::Arc<T> {
    async fn transform(
        &self,
        instruction: &str,
        user_message: &str,
    ) -> Result<TransformOutput, TransformerError> {
        (**self).transform(instruction, user_message).await
    }
}
