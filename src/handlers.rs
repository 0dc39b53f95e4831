use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::log_buffer::{LogEntry, LogLevel};
use crate::payment::{is_failure_event, FailedPayment};

const SERVICE_NAME: &str = "payment-alert-relay";

/// Number of entries returned by the `/logs` endpoint.
const LOGS_PAGE_SIZE: usize = 50;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_descriptor))
        .route("/health", get(health))
        .route("/logs", get(recent_logs))
        .route("/test", post(trigger_test_alert))
        .route("/webhook", post(receive_webhook))
        .with_state(state)
}

#[derive(Serialize)]
struct ServiceDescriptor {
    status: &'static str,
    service: &'static str,
    endpoints: Vec<&'static str>,
    last_log_at: String,
}

async fn service_descriptor(State(state): State<AppState>) -> Json<ServiceDescriptor> {
    let last_log_at = state
        .logs
        .last_timestamp()
        .map(|ts| ts.to_rfc3339())
        .unwrap_or_else(|| "no logs yet".to_string());
    Json(ServiceDescriptor {
        status: "ok",
        service: SERVICE_NAME,
        endpoints: vec![
            "GET / - service descriptor",
            "GET /health - health and configuration status",
            "GET /logs - recent log entries",
            "POST /test - send a test alert",
            "POST /webhook - payment processor event receiver",
        ],
        last_log_at,
    })
}

#[derive(Serialize)]
struct ConfiguredServices {
    stripe_key_configured: bool,
    openai_key_configured: bool,
    alert_email_configured: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    uptime_seconds: u64,
    config: ConfiguredServices,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        uptime_seconds: state.uptime_seconds(),
        config: ConfiguredServices {
            stripe_key_configured: state.config.stripe_key_configured(),
            openai_key_configured: state.config.openai_key_configured(),
            alert_email_configured: state.config.alert_email_configured(),
        },
    })
}

#[derive(Serialize)]
struct LogsResponse {
    count: usize,
    logs: Vec<LogEntry>,
}

async fn recent_logs(State(state): State<AppState>) -> Json<LogsResponse> {
    Json(LogsResponse {
        count: state.logs.count(),
        logs: state.logs.recent(LOGS_PAGE_SIZE),
    })
}

#[derive(Serialize)]
struct TestAlertResponse {
    success: bool,
    message: String,
    #[serde(rename = "testPayment")]
    test_payment: serde_json::Value,
}

async fn trigger_test_alert(
    State(state): State<AppState>,
) -> Result<Json<TestAlertResponse>, ApiError> {
    state
        .logs
        .append(LogLevel::Info, "Manual test alert triggered", None);
    let payment = FailedPayment::sample();
    let echoed = serde_json::to_value(&payment).map_err(ApiError::internal)?;
    let outcome = state.dispatcher.dispatch(&payment).await;
    let message = if outcome.delivered {
        "Test alert sent".to_string()
    } else {
        "Test alert failed to send, see /logs for details".to_string()
    };
    Ok(Json(TestAlertResponse {
        success: outcome.delivered,
        message,
        test_payment: echoed,
    }))
}

#[derive(Serialize)]
struct WebhookAck {
    received: bool,
}

/// Receives a payment-processor event envelope. Only a body that fails to
/// parse as JSON earns a 400; everything else is acknowledged, and the alert
/// outcome stays decoupled from the acknowledgement.
async fn receive_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let event: serde_json::Value = serde_json::from_slice(&body).map_err(|err| {
        state.logs.append(
            LogLevel::Error,
            "Failed to parse webhook payload",
            Some(json!(err.to_string())),
        );
        ApiError::bad_request("invalid_payload", format!("invalid webhook payload: {err}"))
    })?;

    let event_type = event
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unknown");
    state.logs.append(
        LogLevel::Info,
        format!("Webhook event received: {event_type}"),
        None,
    );

    if is_failure_event(event_type) {
        let object = event
            .pointer("/data/object")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        match serde_json::from_value::<FailedPayment>(object) {
            Ok(payment) => {
                state.logs.append(
                    LogLevel::Warning,
                    "Payment failure event",
                    Some(json!({
                        "event_type": event_type,
                        "amount": payment.amount,
                        "currency": payment.currency,
                        "failure_code": payment.failure_code,
                    })),
                );
                state.dispatcher.dispatch(&payment).await;
            }
            Err(err) => {
                state.logs.append(
                    LogLevel::Error,
                    "Failed to extract payment object from event",
                    Some(json!(err.to_string())),
                );
            }
        }
    }

    Ok(Json(WebhookAck { received: true }))
}
