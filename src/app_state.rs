use std::sync::Arc;
use std::time::Instant;

use crate::config::RelayConfig;
use crate::dispatcher::AlertDispatcher;
use crate::log_buffer::LogBuffer;

/// Shared application state, constructed once at startup and handed to the
/// router. Tests build their own with mock collaborators.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub logs: LogBuffer,
    pub dispatcher: Arc<AlertDispatcher>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Arc<RelayConfig>, logs: LogBuffer, dispatcher: Arc<AlertDispatcher>) -> Self {
        Self {
            config,
            logs,
            dispatcher,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
