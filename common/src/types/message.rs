use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::utils::{de, file::is_image_path};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SenderType {
    Visitor,
    Admin,
}

impl From<String> for SenderType {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            SenderType::Admin
        } else {
            SenderType::Visitor
        }
    }
}

/// A file shared in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    File,
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        if is_image_path(&self.name) || is_image_path(&self.path) {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub sender_type: SenderType,
    #[serde(default)]
    pub sender_name: String,
    #[serde(deserialize_with = "de::timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_file: bool,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(default)]
    pub file: Option<Attachment>,
}

impl Message {
    /// The attachment, if this message carries one.
    pub fn attachment(&self) -> Option<&Attachment> {
        if self.is_file { self.file.as_ref() } else { None }
    }

    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_messages_expose_their_attachment() {
        let msg: Message = serde_json::from_value(json!({
            "sender_type": "visitor",
            "sender_name": "Ada",
            "timestamp": "2024-05-01 10:00:00",
            "is_file": 1,
            "file": { "name": "Receipt.PNG", "path": "https://shop.test/uploads/receipt.png" }
        }))
        .unwrap();

        let attachment = msg.attachment().unwrap();
        assert_eq!(attachment.kind(), AttachmentKind::Image);
        assert_eq!(msg.text(), "");
    }

    #[test]
    fn ignores_file_field_on_text_messages() {
        let msg: Message = serde_json::from_value(json!({
            "sender_type": "ADMIN",
            "sender_name": "Support",
            "timestamp": "2024-05-01T10:00:00Z",
            "is_file": false,
            "message": "Hello!",
            "file": { "name": "stale.pdf", "path": "/stale.pdf" }
        }))
        .unwrap();

        assert_eq!(msg.sender_type, SenderType::Admin);
        assert!(msg.attachment().is_none());
        assert_eq!(msg.text(), "Hello!");
    }
}
