//! Application state shared by all handlers.

use crate::services::email::{EmailComposer, EmailSender};
use leadrelay_storage::AttachmentStorage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn AttachmentStorage>,
    pub composer: EmailComposer,
    pub email_sender: Arc<dyn EmailSender>,
}
