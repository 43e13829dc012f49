//! The boundary between the console and the chat backend.
//!
//! Every operation the console performs against the server goes through
//! [`ChatBackend`]. The production implementation is
//! [`AjaxClient`](crate::utils::net::AjaxClient); tests substitute an
//! in-memory fake.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    types::{Message, Product, Session, SessionStatus},
    utils::file::{file_name_of, resolve_path},
};

/// Notification text for failures that carry no server message.
pub const GENERIC_ERROR: &str = "An error occurred";

/// Action names understood by the AJAX endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GetSession,
    GetMessages,
    SendMessage,
    UploadFile,
    GetAllSessions,
    UpdateSessionStatus,
    AssignSession,
    SearchProducts,
    SendProductLink,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::GetSession => "wplc_get_session",
            Action::GetMessages => "wplc_get_messages",
            Action::SendMessage => "wplc_admin_send_message",
            Action::UploadFile => "wplc_admin_upload_file",
            Action::GetAllSessions => "wplc_get_all_sessions",
            Action::UpdateSessionStatus => "wplc_update_session_status",
            Action::AssignSession => "wplc_assign_session",
            Action::SearchProducts => "wplc_search_products",
            Action::SendProductLink => "wplc_send_product_link",
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never completed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered with something that is not a valid envelope.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered `success: false`.
    #[error("{}", .message.as_deref().unwrap_or("request rejected by server"))]
    Application { message: Option<String> },
}

impl BackendError {
    /// Text to show the operator.
    ///
    /// Application failures use the server's message, or `fallback` when it
    /// sent none. Everything else collapses to [`GENERIC_ERROR`].
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BackendError::Application { message: Some(message) } => message.clone(),
            BackendError::Application { message: None } => fallback.to_string(),
            _ => GENERIC_ERROR.to_string(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// A file staged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Resolves `path` (with `~` expansion) and reads the whole file.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> BackendResult<Self> {
        let path = resolve_path(path)?;
        let bytes = tokio::fs::read(&path).await?;

        Ok(FileUpload {
            file_name: file_name_of(&path),
            bytes,
        })
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn get_session(&self, session_id: &str) -> BackendResult<Session>;

    async fn get_messages(&self, session_id: &str) -> BackendResult<Vec<Message>>;

    async fn send_message(&self, session_id: &str, text: &str) -> BackendResult<()>;

    async fn upload_file(&self, session_id: &str, upload: FileUpload) -> BackendResult<()>;

    async fn get_all_sessions(&self, status: &SessionStatus) -> BackendResult<Vec<Session>>;

    async fn update_session_status(
        &self,
        session_id: &str,
        status: &SessionStatus,
    ) -> BackendResult<()>;

    /// Assigns the session to the operator the nonce belongs to.
    async fn assign_session(&self, session_id: &str) -> BackendResult<()>;

    async fn search_products(&self, term: &str) -> BackendResult<Vec<Product>>;

    async fn send_product_link(&self, session_id: &str, product_id: &str) -> BackendResult<()>;
}
