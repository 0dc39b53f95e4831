use anyhow::{Context, Result};
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::RelayConfig;

/// One alert email ready for submission to the transport.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Outbound mail-transport collaborator. Returns a delivery identifier on
/// success; failures are absorbed by the dispatcher, never the HTTP layer.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<String>;
}

/// SMTP transport over the configured relay host, authenticated with the
/// operator's address and credential.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let credentials = Credentials::new(
            config.alert_email.clone().unwrap_or_default(),
            config.alert_email_password.clone().unwrap_or_default(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .context("invalid SMTP relay host")?
            .credentials(credentials)
            .build();
        Ok(Self { transport })
    }
}

#[async_trait::async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<String> {
        let message = Message::builder()
            .from(email.from.parse().context("invalid sender address")?)
            .to(email.to.parse().context("invalid recipient address")?)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .context("failed to build mail message")?;
        let response = self
            .transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;
        Ok(response.code().to_string())
    }
}
