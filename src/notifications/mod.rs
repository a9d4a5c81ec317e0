//! OTP delivery channel.
//!
//! The OTP engine does not know how codes reach the customer; it hands
//! them to an injected notifier. Production wires the SMTP notifier from
//! config; without SMTP settings codes are only logged, which is fine for
//! development together with `otp.echo_code`.

use anyhow::Result;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

use crate::config::EmailConfig;

#[async_trait]
pub trait OtpNotifier: Send + Sync {
    /// Deliver `code` to the client owning `phone`/`email`.
    async fn deliver(&self, phone: &str, email: &str, code: &str) -> Result<()>;
}

/// Build the notifier for the current configuration.
pub fn build_notifier(config: &EmailConfig) -> Arc<dyn OtpNotifier> {
    if config.is_configured() {
        Arc::new(EmailNotifier::new(config.clone()))
    } else {
        tracing::warn!("SMTP not configured, OTP codes will only be logged");
        Arc::new(LogNotifier)
    }
}

/// Development notifier: the code goes to the log and nowhere else.
pub struct LogNotifier;

#[async_trait]
impl OtpNotifier for LogNotifier {
    async fn deliver(&self, phone: &str, _email: &str, code: &str) -> Result<()> {
        tracing::info!(phone = %phone, code = %code, "OTP delivery (log only)");
        Ok(())
    }
}

/// SMTP notifier. SMS delivery would slot in here the same way once a
/// gateway account exists.
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl OtpNotifier for EmailNotifier {
    async fn deliver(&self, _phone: &str, email: &str, code: &str) -> Result<()> {
        let smtp_host = self
            .config
            .smtp_host
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("SMTP host not configured"))?;
        let from_address = self
            .config
            .from_address
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("From address not configured"))?;

        let from: Mailbox = format!("{} <{}>", self.config.from_name, from_address).parse()?;
        let to: Mailbox = email.parse()?;

        let body = format!(
            "Your login code is {}. It expires in {} minutes.",
            code,
            crate::otp::OTP_LIFETIME_MINUTES
        );

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject("Your Freightr login code")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        let mailer = if self.config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer
        };

        mailer.build().send(message).await?;

        tracing::info!(to = %email, "OTP email sent");
        Ok(())
    }
}
