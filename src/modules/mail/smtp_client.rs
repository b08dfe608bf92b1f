//! SMTP mail client
//!
//! Sends HTML reminder emails through an SMTP relay. Uses STARTTLS when
//! `SMTP_TLS` is enabled and a plain connection otherwise (local relays).

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::core::config::MailConfig;
use crate::core::error::{AppError, Result};
use crate::features::notifications::models::EmailMessage;
use crate::features::notifications::ports::Notifier;

/// SMTP-backed notifier
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// Build the transport from configuration
    ///
    /// No connection is opened here; the first send connects to the relay.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| AppError::Mail(format!("SMTP relay configuration error: {}", e)))?
                .port(config.smtp_port)
                .credentials(credentials)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .credentials(credentials)
                .build()
        };

        info!(
            "SMTP transport configured for {}:{} (tls={})",
            config.smtp_host, config.smtp_port, config.use_tls
        );

        Ok(Self {
            transport,
            host: config.smtp_host.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let email = build_message(message)?;

        let response = self.transport.send(email).await.map_err(|e| {
            AppError::Mail(format!(
                "Failed to send email to {} via {}: {}",
                message.to, self.host, e
            ))
        })?;

        debug!(
            "SMTP relay accepted message for {} (code {})",
            message.to,
            response.code()
        );
        Ok(())
    }
}

/// Turn an [`EmailMessage`] into a lettre message with one `To` mailbox per address
fn build_message(message: &EmailMessage) -> Result<Message> {
    let from: Mailbox = message
        .from
        .trim()
        .parse()
        .map_err(|e| AppError::Mail(format!("Invalid from address '{}': {}", message.from, e)))?;

    let mut builder = Message::builder().from(from).subject(message.subject.as_str());

    for recipient in message.recipients() {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid recipient '{}': {}", recipient, e)))?;
        builder = builder.to(to);
    }

    builder
        .header(ContentType::TEXT_HTML)
        .body(message.html_body.clone())
        .map_err(|e| AppError::Mail(format!("Failed to build email body: {}", e)))
}
