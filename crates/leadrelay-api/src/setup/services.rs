//! Service wiring: storage, email composer and email client.

use crate::services::email::{EmailComposer, EmailSender, SendGridClient};
use crate::state::AppState;
use anyhow::{Context, Result};
use leadrelay_core::Config;
use leadrelay_storage::{AttachmentStorage, LocalStorage};
use std::sync::Arc;

pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let storage: Arc<dyn AttachmentStorage> = Arc::new(
        LocalStorage::new(config.upload_path())
            .await
            .context("Failed to initialize upload storage")?,
    );
    tracing::info!(
        upload_path = %storage.root().display(),
        "Upload storage initialized"
    );

    let email_sender: Arc<dyn EmailSender> = Arc::new(SendGridClient::new(&config.email)?);
    tracing::info!(
        base_url = %config.email.base_url,
        timeout_secs = config.email.timeout_secs,
        max_retries = config.email.max_retries,
        "Email client initialized"
    );

    let composer = EmailComposer::new(
        config.email.from_address.clone(),
        config.email.to_address.clone(),
        storage.clone(),
    );

    Ok(Arc::new(AppState {
        storage,
        composer,
        email_sender,
    }))
}
