use reqwest::StatusCode;
use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;

/// Structured log events for one detached notification attempt.
#[derive(Clone, Debug)]
pub struct NotifyTelemetry {
    attempt_id: Uuid,
    endpoint: String,
}

impl NotifyTelemetry {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            endpoint: endpoint.into(),
        }
    }

    pub fn emit_start(&self, time: &str) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            endpoint = %self.endpoint,
            time = %time,
            "notify.start"
        );
    }

    pub fn emit_success(&self, status: StatusCode) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            endpoint = %self.endpoint,
            status = %status,
            "notify.success"
        );
    }

    pub fn emit_failure(&self, error: &Error) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            endpoint = %self.endpoint,
            error = %error,
            "notify.failure"
        );
    }
}
