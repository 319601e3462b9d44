use crate::error::HttpAppError;
use crate::response::LeadResponse;
use crate::services::ingest::LeadSubmission;
use crate::state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Accept a lead form: stage the optional file, email the lead, echo it back.
///
/// A file staged before a later failure stays on disk.
#[tracing::instrument(skip_all, fields(lead_fio = tracing::field::Empty))]
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    submission: LeadSubmission,
) -> Result<Json<LeadResponse>, HttpAppError> {
    let LeadSubmission { lead, file } = submission;
    tracing::Span::current().record("lead_fio", lead.fio.as_str());

    let staged = match file {
        Some(upload) => Some(
            state
                .storage
                .stage(&upload.filename, upload.data)
                .await?
                .with_content_type(upload.content_type),
        ),
        None => None,
    };

    tracing::info!(
        has_attachment = staged.is_some(),
        file_path = %staged.as_ref().map(|s| s.display_path()).unwrap_or_default(),
        "Lead received"
    );

    let message = state.composer.compose(&lead, staged.as_ref()).await?;
    let receipt = state.email_sender.send(&message).await?;

    tracing::info!(status = receipt.status, "Lead delivered");

    Ok(Json(LeadResponse::created(lead, staged.as_ref())))
}
