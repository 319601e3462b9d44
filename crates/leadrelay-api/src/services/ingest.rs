//! Binding of the multipart lead form.
//!
//! The whole form, file bytes included, is read before anything touches the
//! disk, so a body that fails halfway (size cap, broken encoding) leaves no
//! trace behind.

use crate::error::HttpAppError;
use axum::extract::{FromRequest, Multipart, Request};
use bytes::Bytes;
use leadrelay_core::{AppError, Lead};
use std::collections::HashSet;

/// Form part carrying the optional attachment.
pub const FILE_FIELD: &str = "File";

/// File part of a submission, held in memory until staged.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A parsed lead form.
#[derive(Debug, Clone)]
pub struct LeadSubmission {
    pub lead: Lead,
    pub file: Option<UploadedFile>,
}

impl<S> FromRequest<S> for LeadSubmission
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        ingest(multipart).await
    }
}

/// Read every part of the form into a [`LeadSubmission`].
///
/// Text parts bind to lead fields by exact name; the first occurrence wins and
/// unknown names are skipped. At most one non-empty `File` part is accepted.
pub async fn ingest(mut multipart: Multipart) -> Result<LeadSubmission, HttpAppError> {
    let mut lead = Lead::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == FILE_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await?;

            // Browsers send an empty part when no file was chosen.
            if filename.is_empty() && data.is_empty() {
                continue;
            }
            if file.is_some() {
                return Err(AppError::Validation(format!(
                    "Only one {} part is allowed",
                    FILE_FIELD
                ))
                .into());
            }

            tracing::debug!(
                filename = %filename,
                size_bytes = data.len(),
                "File part received"
            );
            file = Some(UploadedFile {
                filename,
                content_type,
                data,
            });
            continue;
        }

        if seen.contains(&name) {
            continue;
        }
        let Some(slot) = lead.field_mut(&name) else {
            tracing::debug!(field = %name, "Ignoring unknown form field");
            continue;
        };

        let raw = field.bytes().await?;
        *slot = String::from_utf8(raw.to_vec()).map_err(|_| {
            AppError::Validation(format!("Field {} is not valid UTF-8", name))
        })?;
        seen.insert(name);
    }

    Ok(LeadSubmission { lead, file })
}
