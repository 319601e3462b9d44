//! Delivery of composed messages to the email API.

use super::composer::EmailMessage;
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use leadrelay_core::{AppError, EmailApiConfig, ErrorMetadata};
use rand::Rng;
use reqwest::{header, Client};
use std::time::Duration;

/// Provider response bodies are cut to this many characters in errors and logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Delay before the first retry; doubles with every attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Upper bound for a single backoff delay.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Outcome of an accepted send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
    /// `X-Message-Id` assigned by the provider, when present
    pub message_id: Option<String>,
}

/// Sends a composed lead notification.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, AppError>;
}

/// SendGrid v3 `mail/send` client.
#[derive(Clone)]
pub struct SendGridClient {
    client: Client,
    endpoint: String,
    api_key: String,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl SendGridClient {
    pub fn new(config: &EmailApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/v3/mail/send", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    /// Override the first backoff delay.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(&self, body: Bytes) -> Result<DeliveryReceipt, AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Delivery {
                status: None,
                message: transport_failure(&e),
            })?;

        let status = response.status();
        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let error_text = truncate_chars(&error_text, MAX_ERROR_BODY_CHARS);
            tracing::warn!(
                status = status.as_u16(),
                body = %error_text,
                "Email API rejected message"
            );
            return Err(AppError::Delivery {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        tracing::info!(
            status = status.as_u16(),
            message_id = message_id.as_deref().unwrap_or("-"),
            "Email API accepted message"
        );

        Ok(DeliveryReceipt {
            status: status.as_u16(),
            message_id,
        })
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self
            .retry_base_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
            .min(MAX_RETRY_DELAY);
        let jitter_ms = rand::rng().random_range(0..=(base.as_millis() as u64 / 2));
        base + Duration::from_millis(jitter_ms)
    }
}

#[async_trait]
impl EmailSender for SendGridClient {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, AppError> {
        let body = Bytes::from(serde_json::to_vec(message)?);
        let mut attempt = 0;

        loop {
            match self.send_once(body.clone()).await {
                Ok(receipt) => return Ok(receipt),
                Err(err) if attempt < self.max_retries && err.is_recoverable() => {
                    let delay = self.backoff_delay(attempt);
                    attempt += 1;
                    tracing::warn!(
                        error = %err,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Email delivery failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn transport_failure(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        format!("request failed: {}", err)
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
