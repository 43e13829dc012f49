use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

/// Seconds a notification stays on the status line unless told otherwise.
pub const DEFAULT_HIDE_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    INFO,
    ERROR,
}

/// A transient notification for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: LogLevel,
    pub msg: String,
    /// Zero keeps the message until the next one replaces it.
    pub hide_after: Duration,
}

/// Sending half of the notification channel.
///
/// Cheap to clone; every background task holds one. The terminal loop owns
/// the receiver and shows whatever arrives.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: UnboundedSender<LogMessage>,
}

impl Notifier {
    pub fn channel() -> (Self, UnboundedReceiver<LogMessage>) {
        let (tx, rx) = unbounded_channel();
        (Notifier { tx }, rx)
    }

    pub fn log(&self, level: LogLevel, msg: impl Into<String>, hide_after: u64) {
        let message = LogMessage {
            level,
            msg: msg.into(),
            hide_after: Duration::from_secs(hide_after),
        };

        if self.tx.send(message).is_err() {
            debug!("notification dropped, status line is gone");
        }
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.log(LogLevel::INFO, msg, DEFAULT_HIDE_SECS);
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.log(LogLevel::ERROR, msg, DEFAULT_HIDE_SECS);
    }
}
