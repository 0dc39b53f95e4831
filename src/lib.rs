pub mod app_state;
pub mod config;
pub mod content;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod log_buffer;
pub mod mailer;
pub mod payment;

pub use crate::app_state::AppState;
pub use crate::config::RelayConfig;
pub use crate::content::{AlertComposer, AlertContent, OpenAiGenerator, TextGenerator};
pub use crate::dispatcher::{AlertDispatcher, DispatchOutcome};
pub use crate::handlers::router;
pub use crate::log_buffer::{LogBuffer, LogEntry, LogLevel};
pub use crate::mailer::{MailTransport, OutgoingEmail, SmtpMailer};
pub use crate::payment::{FailedPayment, FAILURE_EVENT_TYPES};
