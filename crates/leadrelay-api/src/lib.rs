//! Leadrelay API Library
//!
//! This crate provides the HTTP handlers, the lead pipeline services, middleware
//! and application setup.

// Module declarations
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod response;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use response::LeadResponse;
pub use services::email::{EmailComposer, EmailMessage, EmailSender, SendGridClient};
pub use services::ingest::{LeadSubmission, UploadedFile};
