//! Shared test doubles for the two outbound collaborators.

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use payment_alert_relay::{
    AlertComposer, AlertDispatcher, AppState, LogBuffer, MailTransport, OutgoingEmail, RelayConfig,
    TextGenerator,
};

/// Generator that always fails, forcing the deterministic fallback content.
pub struct FailingGenerator;

#[async_trait::async_trait]
impl TextGenerator for FailingGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        bail!("enrichment unavailable")
    }
}

/// Transport that records every submitted email instead of sending it.
pub struct RecordingTransport {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<String> {
        if self.fail {
            bail!("smtp connection reset")
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok("250 Ok".to_string())
    }
}

pub fn test_config() -> RelayConfig {
    RelayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        stripe_secret_key: Some("sk_test_123".to_string()),
        openai_api_key: None,
        openai_base_url: "https://api.openai.com/v1".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        alert_email: Some("ops@example.com".to_string()),
        alert_email_password: Some("app-password".to_string()),
        smtp_host: "smtp.gmail.com".to_string(),
    }
}

/// State wired with a failing generator and the given transport.
pub fn build_state(transport: Arc<RecordingTransport>) -> (AppState, LogBuffer) {
    let logs = LogBuffer::new();
    let dispatcher = Arc::new(AlertDispatcher::new(
        AlertComposer::new(Arc::new(FailingGenerator), logs.clone()),
        transport,
        "ops@example.com".to_string(),
        logs.clone(),
    ));
    let state = AppState::new(Arc::new(test_config()), logs.clone(), dispatcher);
    (state, logs)
}
