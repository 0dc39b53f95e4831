use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::log_buffer::{LogBuffer, LogLevel};
use crate::payment::FailedPayment;

const MAX_GENERATED_TOKENS: u32 = 500;

const PLACEHOLDER_UNKNOWN: &str = "Unknown";
const PLACEHOLDER_NOT_PROVIDED: &str = "Not provided";
const PLACEHOLDER_CURRENCY: &str = "USD";

/// Subject/body pair for one alert email. Produced fresh per alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertContent {
    pub subject: String,
    pub body: String,
}

/// Outbound text-generation collaborator.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw generated text for a prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Chat-completions client for the OpenAI API.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = json!({
            "model": self.model,
            "max_tokens": MAX_GENERATED_TOKENS,
            "messages": [{"role": "user", "content": prompt}],
        });
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("text generation request failed")?;
        if !response.status().is_success() {
            bail!("text generation returned status {}", response.status());
        }
        let body: serde_json::Value = response
            .json()
            .await
            .context("text generation response was not valid JSON")?;
        body.pointer("/choices/0/message/content")
            .and_then(|content| content.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("text generation response missing message content"))
    }
}

/// Produces alert content for a failed payment, enriching via the generator
/// when possible and falling back to a deterministic template otherwise.
/// Never fails outward.
pub struct AlertComposer {
    generator: Arc<dyn TextGenerator>,
    logs: LogBuffer,
}

impl AlertComposer {
    pub fn new(generator: Arc<dyn TextGenerator>, logs: LogBuffer) -> Self {
        Self { generator, logs }
    }

    pub async fn compose(&self, payment: &FailedPayment) -> AlertContent {
        let prompt = build_prompt(payment);
        let enriched = self
            .generator
            .complete(&prompt)
            .await
            .and_then(|raw| parse_generated(&raw));
        match enriched {
            Ok(content) => content,
            Err(err) => {
                self.logs.append(
                    LogLevel::Error,
                    "Alert enrichment failed, using fallback content",
                    Some(json!(format!("{err:#}"))),
                );
                fallback_content(payment)
            }
        }
    }
}

/// Renders a minor-unit amount as dollars with two fraction digits.
pub fn format_amount(minor_units: i64) -> String {
    format!("${:.2}", minor_units as f64 / 100.0)
}

fn currency_display(payment: &FailedPayment) -> String {
    payment
        .currency
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_else(|| PLACEHOLDER_CURRENCY.to_string())
}

fn build_prompt(payment: &FailedPayment) -> String {
    format!(
        "A customer payment just failed. Write a short, clear alert email for the \
         operator on call.\n\
         Respond with only a JSON object containing exactly two string fields, \
         \"subject\" and \"body\".\n\n\
         Payment details:\n\
         - Amount: {amount} {currency}\n\
         - Customer name: {name}\n\
         - Customer email: {email}\n\
         - Failure reason: {message}\n\
         - Failure code: {code}\n\
         - Payment method: {method}\n",
        amount = format_amount(payment.amount),
        currency = currency_display(payment),
        name = payment.customer_name().unwrap_or(PLACEHOLDER_UNKNOWN),
        email = payment.customer_email().unwrap_or(PLACEHOLDER_UNKNOWN),
        message = payment.failure_message.as_deref().unwrap_or(PLACEHOLDER_NOT_PROVIDED),
        code = payment.failure_code.as_deref().unwrap_or(PLACEHOLDER_NOT_PROVIDED),
        method = payment.payment_method_type().unwrap_or(PLACEHOLDER_UNKNOWN),
    )
}

fn parse_generated(raw: &str) -> Result<AlertContent> {
    serde_json::from_str(raw.trim()).context("generated text was not a {subject, body} JSON object")
}

/// Offline template used whenever enrichment is unavailable. Built purely from
/// the record's fields so the alerting path never loses an alert.
fn fallback_content(payment: &FailedPayment) -> AlertContent {
    let amount = format_amount(payment.amount);
    let subject = format!(
        "🚨 Payment Failed - {amount} from {}",
        payment.customer_email().unwrap_or("Unknown Customer"),
    );
    let body = format!(
        "A payment failure was detected and needs your attention.\n\
         \n\
         Customer: {name} ({email})\n\
         Amount: {amount} {currency}\n\
         Failure reason: {message}\n\
         Failure code: {code}\n\
         Payment method: {method}\n\
         \n\
         Next steps:\n\
         - Review the customer's payment history\n\
         - Contact the customer to update their payment method\n\
         - Check the payment processor dashboard for full details\n",
        name = payment.customer_name().unwrap_or(PLACEHOLDER_UNKNOWN),
        email = payment.customer_email().unwrap_or(PLACEHOLDER_UNKNOWN),
        currency = currency_display(payment),
        message = payment.failure_message.as_deref().unwrap_or(PLACEHOLDER_NOT_PROVIDED),
        code = payment.failure_code.as_deref().unwrap_or(PLACEHOLDER_NOT_PROVIDED),
        method = payment.payment_method_type().unwrap_or(PLACEHOLDER_UNKNOWN),
    );
    AlertContent { subject, body }
}
