//! Builds the mail-send payload for a lead.

use super::template::{render_lead_html, PLAIN_TEXT_BODY};
use crate::error::HttpAppError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use leadrelay_core::Lead;
use leadrelay_storage::{AttachmentStorage, StagedFile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personalization {
    pub to: Vec<EmailAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Base64 (standard alphabet, padded) file content
    pub content: String,
    pub filename: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub disposition: String,
}

/// Request body for `POST /v3/mail/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub personalizations: Vec<Personalization>,
    pub from: EmailAddress,
    pub subject: String,
    /// `text/plain` first, then `text/html`
    pub content: Vec<Content>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Turns a lead and its optional staged attachment into an [`EmailMessage`].
#[derive(Clone)]
pub struct EmailComposer {
    from: EmailAddress,
    to: EmailAddress,
    storage: Arc<dyn AttachmentStorage>,
}

impl EmailComposer {
    pub fn new(
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        storage: Arc<dyn AttachmentStorage>,
    ) -> Self {
        Self {
            from: EmailAddress::new(from_address),
            to: EmailAddress::new(to_address),
            storage,
        }
    }

    pub async fn compose(
        &self,
        lead: &Lead,
        attachment: Option<&StagedFile>,
    ) -> Result<EmailMessage, HttpAppError> {
        let html = render_lead_html(lead)?;

        let attachments = match attachment {
            Some(staged) => vec![self.attach(staged).await?],
            None => Vec::new(),
        };

        Ok(EmailMessage {
            personalizations: vec![Personalization {
                to: vec![self.to.clone()],
            }],
            from: self.from.clone(),
            subject: lead.subject(),
            content: vec![
                Content {
                    mime_type: "text/plain".to_string(),
                    value: PLAIN_TEXT_BODY.to_string(),
                },
                Content {
                    mime_type: "text/html".to_string(),
                    value: html,
                },
            ],
            attachments,
        })
    }

    /// Re-read the staged file so the email carries exactly what was persisted.
    async fn attach(&self, staged: &StagedFile) -> Result<Attachment, HttpAppError> {
        let data = self.storage.read(&staged.path).await?;

        tracing::debug!(
            file_path = %staged.path.display(),
            size_bytes = data.len(),
            "Attaching staged file"
        );

        Ok(Attachment {
            content: STANDARD.encode(&data),
            filename: attachment_filename(&staged.original_filename),
            mime_type: staged.content_type.clone(),
            disposition: "attachment".to_string(),
        })
    }
}

/// Last path component of the client filename.
fn attachment_filename(original: &str) -> String {
    let name = original.rsplit(['/', '\\']).next().unwrap_or(original).trim();
    if name.is_empty() {
        "attachment".to_string()
    } else {
        name.to_string()
    }
}
