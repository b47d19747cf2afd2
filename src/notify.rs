use reqwest::Client;
use tracing::{debug, warn};

use crate::config::NotifyConfig;
use crate::errors::Error;
use crate::telemetry::notify::NotifyTelemetry;

pub const CLIENT_KEY_HEADER: &str = "Time-Travel-Client-Key";

/// Best-effort notifier telling a remote environment about the new time.
///
/// Dispatch spawns a detached task; the outcome is only ever logged. Nothing
/// on the clock-query or store-write path waits on it.
pub struct TimeUpdateNotifier {
    client: Client,
    endpoint: Option<String>,
    client_key: String,
}

impl TimeUpdateNotifier {
    pub fn new(config: &NotifyConfig, host: &str) -> Self {
        let endpoint = match &config.update_url {
            Some(url) => Some(url.clone()),
            None => match &config.api_base {
                Some(base) => match derive_update_endpoint(host, base) {
                    Ok(url) => Some(url),
                    Err(err) => {
                        warn!(host = %host, error = %err, "time update notifications disabled");
                        None
                    }
                },
                None => None,
            },
        };
        Self {
            client: Client::new(),
            endpoint,
            client_key: config.client_key.clone(),
        }
    }

    /// A notifier that never sends anything.
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            endpoint: None,
            client_key: String::new(),
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Fires the notification for `time` without blocking the caller.
    /// Requires a tokio runtime; without one the notification is skipped and
    /// logged, leaving local state untouched either way.
    pub fn dispatch(&self, time: &str) {
        let Some(endpoint) = self.endpoint.clone() else {
            debug!("no update endpoint configured; skipping time notification");
            return;
        };
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(endpoint = %endpoint, "no async runtime; skipping time notification");
                return;
            }
        };

        let telemetry = NotifyTelemetry::new(&endpoint);
        let client = self.client.clone();
        let client_key = self.client_key.clone();
        let time = time.to_string();
        handle.spawn(async move {
            telemetry.emit_start(&time);
            match send_update(&client, &endpoint, &client_key, &time).await {
                Ok(status) => telemetry.emit_success(status),
                Err(err) => telemetry.emit_failure(&err),
            }
        });
    }
}

async fn send_update(
    client: &Client,
    endpoint: &str,
    client_key: &str,
    time: &str,
) -> Result<reqwest::StatusCode, Error> {
    let resp = client
        .post(endpoint)
        .header(CLIENT_KEY_HEADER, client_key)
        .json(&serde_json::json!({ "time": time }))
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.status())
}

/// Derives the admin endpoint from the context host: the environment is the
/// second dash-separated token of the first host label, so
/// `app-demo.timetravel.example` notifies `admin-demo.<api_base>`.
pub(crate) fn derive_update_endpoint(host: &str, api_base: &str) -> Result<String, Error> {
    let label = host.split('.').next().unwrap_or_default();
    let environment = label
        .split('-')
        .nth(1)
        .filter(|env| !env.is_empty())
        .ok_or_else(|| Error::Endpoint(format!("no environment token in host '{host}'")))?;
    Ok(format!("https://admin-{environment}.{api_base}/updateTime"))
}
