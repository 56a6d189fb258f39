//! Email delivery of the chart attachments.
//!
//! Credentials are read from the environment exactly once into a
//! [`MailConfig`], which is then passed to [`compose_message`] and
//! [`SmtpMailer`]. Nothing here re-reads the environment.

use crate::report::Attachments;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

/// SMTP relay the report is sent through.
pub const SMTP_HOST: &str = "smtp.gmail.com";

/// STARTTLS submission port.
pub const SMTP_PORT: u16 = 587;

/// Environment variable holding the sender address.
pub const SENDER_VAR: &str = "EMAIL";

/// Environment variable holding the recipient address.
pub const RECIPIENT_VAR: &str = "RECIPIENT_EMAIL";

/// Environment variable holding the sender's (application) password.
pub const PASSWORD_VAR: &str = "PASSWORD";

/// Errors that can occur while building or sending the report email.
#[derive(Debug, Error)]
pub enum MailError {
    /// A required environment variable is not set.
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),

    /// An address could not be parsed.
    #[error("Invalid email address {value:?}: {source}")]
    Address {
        /// The rejected value
        value: String,
        /// Parse failure
        source: lettre::address::AddressError,
    },

    /// An attachment content type could not be parsed.
    #[error("Invalid content type: {0}")]
    ContentType(String),

    /// The message could not be assembled.
    #[error("Failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    /// Connection, authentication or delivery failed.
    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

fn parse_mailbox(value: &str) -> Result<Mailbox, MailError> {
    value.parse().map_err(|source| MailError::Address {
        value: value.to_string(),
        source,
    })
}

/// Sender, recipient and credential for the report email.
#[derive(Clone)]
pub struct MailConfig {
    sender: Mailbox,
    recipient: Mailbox,
    password: String,
    host: String,
    port: u16,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("sender", &self.sender.to_string())
            .field("recipient", &self.recipient.to_string())
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl MailConfig {
    /// Create a config for the default relay.
    pub fn new(
        sender: &str,
        recipient: &str,
        password: impl Into<String>,
    ) -> Result<Self, MailError> {
        Ok(Self {
            sender: parse_mailbox(sender)?,
            recipient: parse_mailbox(recipient)?,
            password: password.into(),
            host: SMTP_HOST.to_string(),
            port: SMTP_PORT,
        })
    }

    /// Read `EMAIL`, `RECIPIENT_EMAIL` and `PASSWORD` from the process environment.
    pub fn from_env() -> Result<Self, MailError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MailError> {
        let var = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(MailError::MissingVar(key))
        };
        let sender = var(SENDER_VAR)?;
        let recipient = var(RECIPIENT_VAR)?;
        let password = var(PASSWORD_VAR)?;
        Self::new(sender.trim(), recipient.trim(), password)
    }

    /// Sender mailbox.
    pub const fn sender(&self) -> &Mailbox {
        &self.sender
    }

    /// Recipient mailbox.
    pub const fn recipient(&self) -> &Mailbox {
        &self.recipient
    }

    /// SMTP host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// SMTP port.
    pub const fn port(&self) -> u16 {
        self.port
    }
}

/// Subject and body of the report email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl Default for EmailContent {
    fn default() -> Self {
        Self {
            subject: "Daily Industry SMA Analysis".to_string(),
            body: "Please find attached the SMA analysis for different industries".to_string(),
        }
    }
}

/// Build the report email: a plain-text body followed by one PNG per attachment.
pub fn compose_message(
    config: &MailConfig,
    content: &EmailContent,
    attachments: &Attachments,
) -> Result<Message, MailError> {
    let png = ContentType::parse("image/png").map_err(|e| MailError::ContentType(e.to_string()))?;

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(content.body.clone()));
    for (filename, bytes) in attachments {
        parts = parts.singlepart(Attachment::new(filename.clone()).body(bytes.clone(), png.clone()));
    }

    let message = Message::builder()
        .from(config.sender.clone())
        .to(config.recipient.clone())
        .subject(content.subject.as_str())
        .multipart(parts)?;

    Ok(message)
}

/// Authenticated STARTTLS SMTP client.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Create a mailer for the relay and credentials in `config`.
    ///
    /// No connection is made until [`SmtpMailer::send`].
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(config.sender.email.to_string(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(config.host())?
            .port(config.port())
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            host: config.host().to_string(),
            port: config.port(),
        })
    }

    /// Connect, authenticate and deliver `message`. Failures are not retried.
    pub async fn send(&self, message: Message) -> Result<(), MailError> {
        info!(host = %self.host, port = self.port, "Connecting to SMTP server");
        let response = self.transport.send(message).await?;
        info!(code = %response.code(), "Email accepted by SMTP server");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn config() -> MailConfig {
        MailConfig::new("reports@example.com", "me@example.com", "app-password").unwrap()
    }

    #[test]
    fn test_from_lookup() {
        let vars = env(&[
            ("EMAIL", "reports@example.com"),
            ("RECIPIENT_EMAIL", " me@example.com "),
            ("PASSWORD", "secret"),
        ]);
        let config = MailConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();

        assert_eq!(config.sender().email.to_string(), "reports@example.com");
        assert_eq!(config.recipient().email.to_string(), "me@example.com");
        assert_eq!(config.host(), "smtp.gmail.com");
        assert_eq!(config.port(), 587);
    }

    #[test]
    fn test_missing_variable() {
        let vars = env(&[("EMAIL", "reports@example.com"), ("PASSWORD", "secret")]);
        let result = MailConfig::from_lookup(|key| vars.get(key).cloned());
        assert!(matches!(result, Err(MailError::MissingVar("RECIPIENT_EMAIL"))));
    }

    #[test]
    fn test_blank_variable_is_missing() {
        let vars = env(&[
            ("EMAIL", "reports@example.com"),
            ("RECIPIENT_EMAIL", "me@example.com"),
            ("PASSWORD", "  "),
        ]);
        let result = MailConfig::from_lookup(|key| vars.get(key).cloned());
        assert!(matches!(result, Err(MailError::MissingVar("PASSWORD"))));
    }

    #[test]
    fn test_invalid_address() {
        let result = MailConfig::new("not an address", "me@example.com", "secret");
        assert!(matches!(result, Err(MailError::Address { .. })));
    }

    #[test]
    fn test_debug_hides_password() {
        let debug = format!("{:?}", config());
        assert!(!debug.contains("app-password"));
        assert!(debug.contains("smtp.gmail.com"));
    }

    #[test]
    fn test_compose_message() {
        let mut attachments = Attachments::new();
        attachments.insert("Tech_SMA_analysis.png".to_string(), vec![0x89, b'P', b'N', b'G']);
        attachments.insert("Energy_SMA_analysis.png".to_string(), vec![0x89, b'P', b'N', b'G']);

        let message = compose_message(&config(), &EmailContent::default(), &attachments).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();

        assert!(raw.contains("Subject: Daily Industry SMA Analysis"));
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("Tech_SMA_analysis.png"));
        assert!(raw.contains("Energy_SMA_analysis.png"));
        assert!(raw.contains("image/png"));
        assert!(raw.contains("Please find attached the SMA analysis for different industries"));
    }

    #[test]
    fn test_compose_without_attachments() {
        let message =
            compose_message(&config(), &EmailContent::default(), &Attachments::new()).unwrap();
        assert_eq!(message.envelope().to().len(), 1);
    }
}
