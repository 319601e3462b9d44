//! JSON body returned by `POST /createlead`, for both outcomes.

use leadrelay_core::Lead;
use leadrelay_storage::StagedFile;
use serde::{Deserialize, Serialize};

pub const LEAD_CREATED_MESSAGE: &str = "A lead successfully created";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadResponse {
    /// Mirrors the HTTP status code
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead: Option<Lead>,
    /// Storage path of the attachment, empty when none was uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LeadResponse {
    pub fn created(lead: Lead, attachment: Option<&StagedFile>) -> Self {
        Self {
            status: 200,
            message: LEAD_CREATED_MESSAGE.to_string(),
            lead: Some(lead),
            filepath: Some(
                attachment
                    .map(StagedFile::display_path)
                    .unwrap_or_default(),
            ),
            details: None,
        }
    }

    pub fn failure(status: u16, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status,
            message: message.into(),
            lead: None,
            filepath: None,
            details,
        }
    }
}
