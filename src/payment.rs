use serde::{Deserialize, Serialize};

/// Event types from the payment processor that represent a payment failure
/// and trigger an operator alert.
pub const FAILURE_EVENT_TYPES: [&str; 3] = [
    "payment_intent.payment_failed",
    "charge.failed",
    "invoice.payment_failed",
];

pub fn is_failure_event(event_type: &str) -> bool {
    FAILURE_EVENT_TYPES.contains(&event_type)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodDetails {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Failed-payment record extracted from a webhook event's `data.object`, or
/// synthesized by the manual test endpoint. Lives for one request only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedPayment {
    /// Amount in minor currency units (cents for USD).
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub failure_code: Option<String>,
    #[serde(default)]
    pub failure_message: Option<String>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_details: Option<PaymentMethodDetails>,
}

impl FailedPayment {
    pub fn customer_name(&self) -> Option<&str> {
        self.customer.as_ref().and_then(|c| c.name.as_deref())
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer.as_ref().and_then(|c| c.email.as_deref())
    }

    pub fn payment_method_type(&self) -> Option<&str> {
        self.payment_method_details.as_ref().and_then(|d| d.kind.as_deref())
    }

    /// Canned record used by the manual `/test` trigger.
    pub fn sample() -> Self {
        Self {
            amount: 2999,
            currency: Some("usd".to_string()),
            failure_code: Some("card_declined".to_string()),
            failure_message: Some("Your card was declined.".to_string()),
            customer: Some(Customer {
                name: Some("Test Customer".to_string()),
                email: Some("test@example.com".to_string()),
            }),
            payment_method_details: Some(PaymentMethodDetails {
                kind: Some("card".to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_event_set_is_exact() {
        assert!(is_failure_event("payment_intent.payment_failed"));
        assert!(is_failure_event("charge.failed"));
        assert!(is_failure_event("invoice.payment_failed"));
        assert!(!is_failure_event("payment_intent.succeeded"));
        assert!(!is_failure_event(""));
    }

    #[test]
    fn sparse_object_deserializes_with_defaults() {
        let payment: FailedPayment =
            serde_json::from_value(serde_json::json!({"amount": 500, "currency": "usd"})).unwrap();
        assert_eq!(payment.amount, 500);
        assert_eq!(payment.currency.as_deref(), Some("usd"));
        assert!(payment.customer.is_none());
        assert!(payment.payment_method_type().is_none());
    }

    #[test]
    fn empty_object_deserializes() {
        let payment: FailedPayment = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(payment.amount, 0);
        assert!(payment.failure_code.is_none());
    }
}
