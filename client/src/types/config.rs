use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

/// Console configuration, read from `Config.toml` and `CHAT_DESK_*` variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// URL of the AJAX endpoint.
    pub endpoint: String,

    /// Security token sent with every request.
    pub nonce: String,

    #[serde(default = "default_operator_name")]
    pub operator_name: String,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_dashboard_interval")]
    pub dashboard_interval_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Ring the terminal bell when new pending sessions arrive.
    #[serde(default = "default_sound")]
    pub sound: bool,
}

fn default_operator_name() -> String {
    "Operator".into()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_dashboard_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    15
}

fn default_log_file() -> PathBuf {
    PathBuf::from("chat-desk.log")
}

fn default_sound() -> bool {
    true
}

impl ClientConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn dashboard_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
