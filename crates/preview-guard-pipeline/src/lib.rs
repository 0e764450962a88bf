//! Bounded-retry sanitization pipeline.
//!
//! The [`Sanitizer`] sends untrusted component source to a generative
//! [`CodeTransformer`], checks each response with the minimal validator, and
//! either returns a [`SanitizationResult`] or a terminal
//! [`SanitizationError`] once the attempt budget is spent.

pub mod error;
pub mod fakes;
pub mod openai;
pub mod prompt;
pub mod sanitizer;
pub mod transformer;

pub use error::{AttemptFailure, FailureKind, SanitizationError, TransformerError};
pub use fakes::ScriptedTransformer;
pub use openai::{OpenAiTransformer, TransformerConfig};
pub use prompt::{system_instruction, user_message, DEFAULT_INSTRUCTIONS};
pub use sanitizer::{SanitizationResult, Sanitizer, SanitizerConfig, MAX_ATTEMPTS};
pub use transformer::{CodeTransformer, CompletionStatus, TransformOutput};
