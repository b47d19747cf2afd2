//! Configuration for the outbound time-update notification.

/// Where and how to send time-update notifications.
///
/// An explicit `update_url` wins; otherwise the endpoint is derived from the
/// context's host and `api_base`. With neither, notifications are disabled.
#[derive(Clone, Debug)]
pub struct NotifyConfig {
    pub update_url: Option<String>,
    pub api_base: Option<String>,
    pub client_key: String,
}

const DEFAULT_CLIENT_KEY: &str = "c_time_travel_demo_app";

impl NotifyConfig {
    pub fn from_values(
        update_url: Option<String>,
        api_base: Option<String>,
        client_key: impl Into<String>,
    ) -> Self {
        Self {
            update_url,
            api_base,
            client_key: client_key.into(),
        }
    }

    /// # ENV Vars
    /// * `TIME_TRAVEL_UPDATE_URL` - Explicit notification endpoint
    /// * `TIME_TRAVEL_API_BASE` - Base domain for host-derived endpoints
    /// * `TIME_TRAVEL_CLIENT_KEY` - Identifying header value
    pub fn from_env() -> Self {
        Self {
            update_url: std::env::var("TIME_TRAVEL_UPDATE_URL").ok(),
            api_base: std::env::var("TIME_TRAVEL_API_BASE").ok(),
            client_key: std::env::var("TIME_TRAVEL_CLIENT_KEY")
                .unwrap_or_else(|_| DEFAULT_CLIENT_KEY.to_string()),
        }
    }

    /// A config that sends nothing; useful where only the local clock state
    /// matters.
    pub fn disabled() -> Self {
        Self {
            update_url: None,
            api_base: None,
            client_key: DEFAULT_CLIENT_KEY.to_string(),
        }
    }
}
