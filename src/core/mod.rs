//! Core Module - infrastructure components of the application
//!
//! - Authentication and JWT
//! - Configuration
//! - Error handling
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

// Re-exports
pub use auth::{Claims, authentication_middleware, decode_jwt, encode_jwt};
pub use config::{Config, LlmSettings};
pub use error::AppError;
pub use state::AppState;
