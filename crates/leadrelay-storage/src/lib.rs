//! Leadrelay Storage Library
//!
//! Stages the optional file attached to a lead submission on local disk.
//!
//! # Storage name format
//!
//! Staged files live directly in the upload directory as
//! `{millisecond-timestamp}_{filename}`. When that name is already taken the
//! stager falls back to `{millisecond-timestamp}-{random hex}_{filename}`.
//! Files are always created with create-new semantics, so two requests can
//! never write into the same file.

pub(crate) mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{AttachmentStorage, StagedFile, StorageError, StorageResult};
