//! # Email Channels
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EmailNotifier (implements Notifier)                                    │
//! │     │                                                                   │
//! │     ├── primary  : HttpApiProvider  POST {base}/emails (bearer key)     │
//! │     │                                                                   │
//! │     └── fallback : SmtpProvider     STARTTLS relay via lettre           │
//! │                                                                         │
//! │  Both render the same message from template::order_confirmation.        │
//! │  A disabled channel answers NotEnabled without touching the network.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dokan_core::Order;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::template::{order_confirmation, EmailMessage};
use crate::error::NotifyError;
use crate::ports::Notifier;

// =============================================================================
// Configuration
// =============================================================================

/// Transactional email HTTP API settings (Resend-compatible).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpApiConfig {
    pub enabled: bool,
    pub api_base_url: String,
    pub api_key: String,
    /// `Name <address>` used as the sender.
    pub from: String,
    pub timeout_secs: u64,
}

impl Default for HttpApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base_url: "https://api.resend.com".to_string(),
            api_key: String::new(),
            from: "Dokan <orders@dokan.local>".to_string(),
            timeout_secs: 10,
        }
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "smtp.gmail.com".to_string(),
            port: 587,
            user: String::new(),
            password: String::new(),
            from: "Dokan <orders@dokan.local>".to_string(),
            timeout_secs: 10,
        }
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// A single way of delivering an email.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<(), NotifyError>;
    fn is_enabled(&self) -> bool;
    fn name(&self) -> &'static str;
}

// =============================================================================
// HTTP API Provider
// =============================================================================

pub struct HttpApiProvider {
    config: HttpApiConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    #[serde(default)]
    id: Option<String>,
}

impl HttpApiProvider {
    pub fn new(config: HttpApiConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl EmailProvider for HttpApiProvider {
    async fn send(&self, email: &EmailMessage) -> Result<(), NotifyError> {
        if !self.config.enabled {
            return Err(NotifyError::NotEnabled(
                "HTTP email API is not enabled".to_string(),
            ));
        }

        let request = SendEmailRequest {
            from: &self.config.from,
            to: vec![email.to.as_str()],
            subject: &email.subject,
            html: &email.body_html,
            text: &email.body_text,
        };

        let url = format!("{}/emails", self.config.api_base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::Connection(format!("Failed to reach email API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::SendFailed(format!(
                "Email API returned error status {}: {}",
                status, body
            )));
        }

        let sent: SendEmailResponse = response.json().await.map_err(|e| {
            NotifyError::SendFailed(format!("Failed to parse email API response: {}", e))
        })?;

        info!(
            to = %email.to,
            subject = %email.subject,
            message_id = sent.id.as_deref().unwrap_or("-"),
            "Email sent via HTTP API"
        );

        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn name(&self) -> &'static str {
        "http_api"
    }
}

// =============================================================================
// SMTP Provider
// =============================================================================

pub struct SmtpProvider {
    config: SmtpConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpProvider {
    pub fn new(config: SmtpConfig) -> Result<Self, NotifyError> {
        if !config.enabled {
            return Ok(Self {
                config,
                transport: None,
            });
        }

        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Configuration(format!("Failed to create SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(creds)
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self {
            config,
            transport: Some(transport),
        })
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &EmailMessage) -> Result<(), NotifyError> {
        if !self.config.enabled {
            return Err(NotifyError::NotEnabled(
                "SMTP email provider is not enabled".to_string(),
            ));
        }

        let transport = self.transport.as_ref().ok_or_else(|| {
            NotifyError::Configuration("SMTP transport not initialized".to_string())
        })?;

        let from: Mailbox = self
            .config
            .from
            .parse()
            .map_err(|e| NotifyError::Configuration(format!("Invalid from address: {}", e)))?;

        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| NotifyError::InvalidRecipient(format!("Invalid recipient: {}", e)))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.body_text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.body_html.clone()),
                    ),
            )
            .map_err(|e| NotifyError::SendFailed(format!("Failed to build message: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| NotifyError::SendFailed(format!("Failed to send email: {}", e)))?;

        info!(to = %email.to, subject = %email.subject, "Email sent via SMTP");

        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

// =============================================================================
// Mock Provider
// =============================================================================

/// Records sends instead of delivering them. Used by tests and local runs.
pub struct MockEmailProvider {
    succeed: bool,
    send_count: AtomicU64,
}

impl MockEmailProvider {
    /// A provider that accepts every message.
    pub fn new() -> Self {
        Self {
            succeed: true,
            send_count: AtomicU64::new(0),
        }
    }

    /// A provider whose every send fails.
    pub fn failing() -> Self {
        Self {
            succeed: false,
            send_count: AtomicU64::new(0),
        }
    }

    /// Send attempts so far, successful or not.
    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, email: &EmailMessage) -> Result<(), NotifyError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);

        if !self.succeed {
            return Err(NotifyError::SendFailed("mock provider set to fail".to_string()));
        }

        info!(to = %email.to, subject = %email.subject, "[MOCK] Email would be sent");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Sends order confirmations through a primary and a fallback provider.
#[derive(Clone)]
pub struct EmailNotifier {
    primary: Arc<dyn EmailProvider>,
    fallback: Arc<dyn EmailProvider>,
}

impl EmailNotifier {
    pub fn new(primary: Arc<dyn EmailProvider>, fallback: Arc<dyn EmailProvider>) -> Self {
        Self { primary, fallback }
    }

    /// HTTP API first, SMTP second.
    pub fn from_config(api: HttpApiConfig, smtp: SmtpConfig) -> Result<Self, NotifyError> {
        Ok(Self::new(
            Arc::new(HttpApiProvider::new(api)?),
            Arc::new(SmtpProvider::new(smtp)?),
        ))
    }

    /// Names of the channels that are switched on.
    pub fn enabled_channels(&self) -> Vec<&'static str> {
        [&self.primary, &self.fallback]
            .into_iter()
            .filter(|p| p.is_enabled())
            .map(|p| p.name())
            .collect()
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send_order_confirmation(&self, order: &Order) -> Result<(), NotifyError> {
        self.primary.send(&order_confirmation(order)).await
    }

    async fn send_order_confirmation_fallback(&self, order: &Order) -> Result<(), NotifyError> {
        self.fallback.send(&order_confirmation(order)).await
    }
}
