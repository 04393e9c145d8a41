//! Outgoing email
//!
//! Password reset mail goes through the [`Mailer`] trait. [`HttpMailer`]
//! posts to a transactional mail API; [`LogMailer`] only records the
//! message and is used when no API is configured.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::config::MailerConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Build the mailer named by the configuration
pub fn from_config(config: &MailerConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match &config.api_url {
        Some(_) => Ok(Arc::new(HttpMailer::new(config)?)),
        None => {
            tracing::warn!("MAIL_API_URL is not set - outgoing mail will only be logged");
            Ok(Arc::new(LogMailer))
        },
    }
}

/// Mailer that posts JSON to an HTTP mail API
pub struct HttpMailer {
    client: Client,
    url: String,
    api_key: Option<String>,
    from: Address,
}

#[derive(Debug, Clone, Serialize)]
struct Address {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a Address,
    to: Vec<Address>,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    pub fn new(config: &MailerConfig) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            url: config.api_url.clone().unwrap_or_default(),
            api_key: config.api_key.clone(),
            from: Address {
                email: config.from_email.clone(),
                name: Some(config.from_name.clone()),
            },
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    #[tracing::instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let body = SendRequest {
            from: &self.from,
            to: vec![Address {
                email: message.to.clone(),
                name: None,
            }],
            subject: &message.subject,
            text: &message.text,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        request.send().await?.error_for_status()?;

        tracing::info!("Email sent");
        Ok(())
    }
}

/// Mailer that only logs what would have been sent
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text,
            "Email delivery is not configured; message logged instead"
        );
        Ok(())
    }
}
