//! Scripted in-memory transformer for tests and offline runs.
//!
//! Returns pre-recorded responses in order and records every request it
//! receives, so callers can assert on attempt counts and retry prompts.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::TransformerError;
use crate::transformer::{CodeTransformer, CompletionStatus, TransformOutput};

/// A request received by [`ScriptedTransformer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub instruction: String,
    pub user_message: String,
}

/// Transformer that replays a fixed script of responses.
#[derive(Debug, Default)]
pub struct ScriptedTransformer {
    responses: Mutex<VecDeque<Result<TransformOutput, TransformerError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransformer {
    pub fn new(
        responses: impl IntoIterator<Item = Result<TransformOutput, TransformerError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script of responses that all finished normally.
    pub fn completing<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            texts
                .into_iter()
                .map(|text| Ok(TransformOutput::new(text, CompletionStatus::Stop))),
        )
    }

    /// Every request received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl CodeTransformer for ScriptedTransformer {
    async fn transform(
        &self,
        instruction: &str,
        user_message: &str,
    ) -> Result<TransformOutput, TransformerError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                instruction: instruction.to_string(),
                user_message: user_message.to_string(),
            });

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransformerError::Other(
                    "no scripted response left".to_string(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_errors() {
        let fake = ScriptedTransformer::completing(["one", "two"]);

        assert_eq!(fake.transform("i", "a").await.unwrap().text, "one");
        assert_eq!(fake.transform("i", "b").await.unwrap().text, "two");
        assert!(fake.transform("i", "c").await.is_err());

        let calls = fake.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].user_message, "b");
    }
}
