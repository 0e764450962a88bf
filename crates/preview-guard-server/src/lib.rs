//! HTTP action boundary for the preview sanitization pipeline.
//!
//! Exposes the retrying sanitizer and the standalone validate/fix path as
//! JSON endpoints.

pub mod api;
pub mod server;

pub use api::{router, AppState, CodeRequest, ErrorBody};
pub use server::{ApiServer, ServerConfig, ServerError};
