use std::sync::Arc;

use serde_json::json;

use crate::content::AlertComposer;
use crate::log_buffer::{LogBuffer, LogLevel};
use crate::mailer::{MailTransport, OutgoingEmail};
use crate::payment::FailedPayment;

/// Result of one dispatch attempt. Delivery failures are carried here and in
/// the log buffer; they never propagate as HTTP errors.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub delivered: bool,
    pub error: Option<String>,
}

/// Turns a failed payment into alert content and submits it to the mail
/// transport, logging the outcome either way.
pub struct AlertDispatcher {
    composer: AlertComposer,
    transport: Arc<dyn MailTransport>,
    operator_address: String,
    logs: LogBuffer,
}

impl AlertDispatcher {
    pub fn new(
        composer: AlertComposer,
        transport: Arc<dyn MailTransport>,
        operator_address: String,
        logs: LogBuffer,
    ) -> Self {
        Self {
            composer,
            transport,
            operator_address,
            logs,
        }
    }

    pub async fn dispatch(&self, payment: &FailedPayment) -> DispatchOutcome {
        let content = self.composer.compose(payment).await;
        let email = OutgoingEmail {
            from: self.operator_address.clone(),
            to: self.operator_address.clone(),
            subject: content.subject,
            html_body: content.body.replace('\n', "<br>"),
            text_body: content.body,
        };
        match self.transport.deliver(&email).await {
            Ok(delivery_id) => {
                self.logs.append(
                    LogLevel::Info,
                    "Alert email delivered",
                    Some(json!({"delivery_id": delivery_id, "to": email.to})),
                );
                DispatchOutcome {
                    delivered: true,
                    error: None,
                }
            }
            Err(err) => {
                let detail = format!("{err:#}");
                self.logs.append(
                    LogLevel::Error,
                    "Alert email delivery failed",
                    Some(json!(detail)),
                );
                DispatchOutcome {
                    delivered: false,
                    error: Some(detail),
                }
            }
        }
    }
}
