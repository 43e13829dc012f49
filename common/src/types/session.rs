use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::utils::de;

pub type SessionId = String;

/// Lifecycle state of a chat session as reported by the backend.
///
/// Statuses the console does not know about are kept verbatim in
/// [`SessionStatus::Other`] so they can still be displayed and sent back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum SessionStatus {
    Pending,
    Active,
    Closed,
    Other(String),
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Active => "active",
            SessionStatus::Closed => "closed",
            SessionStatus::Other(status) => status.as_str(),
        }
    }
}

impl From<String> for SessionStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => SessionStatus::Pending,
            "active" => SessionStatus::Active,
            "closed" => SessionStatus::Closed,
            _ => SessionStatus::Other(value),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SessionStatus::from(s.to_string()))
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single visitor-to-support conversation tracked by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: SessionId,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub phone_number: Option<String>,
    pub status: SessionStatus,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub assigned_admin_name: Option<String>,
    #[serde(deserialize_with = "de::timestamp")]
    pub started_at: DateTime<Utc>,
    #[serde(deserialize_with = "de::timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_online: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_database_shaped_rows() {
        let session: Session = serde_json::from_value(json!({
            "id": 42,
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone_number": "",
            "status": "Pending",
            "assigned_admin_name": null,
            "started_at": "2024-05-01 10:00:00",
            "updated_at": "2024-05-01 10:02:00",
            "is_online": "1"
        }))
        .unwrap();

        assert_eq!(session.id, "42");
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.phone_number, None);
        assert_eq!(session.assigned_admin_name, None);
        assert!(session.is_online);
    }

    #[test]
    fn keeps_unknown_statuses() {
        let status: SessionStatus = "transferred".parse().unwrap();
        assert_eq!(status, SessionStatus::Other("transferred".into()));
        assert_eq!(status.to_string(), "transferred");
    }
}
