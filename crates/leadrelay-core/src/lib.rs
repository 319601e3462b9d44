//! Leadrelay Core Library
//!
//! This crate provides the lead model, error types and configuration shared by
//! the storage and API crates.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, EmailApiConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::Lead;
