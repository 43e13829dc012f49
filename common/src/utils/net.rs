//! reqwest-backed implementation of [`ChatBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    net::{Action, BackendError, BackendResult, ChatBackend, FileUpload},
    types::{
        Message, MessagesPayload, Product, ProductsPayload, ServerResponse, Session,
        SessionPayload, SessionStatus, SessionsPayload,
    },
};

/// Client for a WordPress-style `admin-ajax.php` endpoint.
///
/// Each call is a form `POST` carrying `action`, `nonce`, and the
/// action's parameters. The answer is a [`ServerResponse`] envelope.
#[derive(Clone)]
pub struct AjaxClient {
    client: reqwest::Client,
    endpoint: String,
    nonce: String,
}

impl AjaxClient {
    pub fn new(
        endpoint: impl Into<String>,
        nonce: impl Into<String>,
        timeout: Duration,
    ) -> BackendResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(AjaxClient {
            client,
            endpoint: endpoint.into(),
            nonce: nonce.into(),
        })
    }

    async fn post_form(
        &self,
        action: Action,
        params: &[(&str, &str)],
    ) -> BackendResult<ServerResponse> {
        let mut form: Vec<(&str, &str)> =
            vec![("action", action.as_str()), ("nonce", self.nonce.as_str())];
        form.extend_from_slice(params);

        debug!(action = action.as_str(), "posting ajax request");
        let body = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await?
            .text()
            .await?;

        decode_response(action, &body)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        action: Action,
        params: &[(&str, &str)],
    ) -> BackendResult<T> {
        self.post_form(action, params).await?.into_data()
    }

    async fn call_unit(&self, action: Action, params: &[(&str, &str)]) -> BackendResult<()> {
        self.post_form(action, params).await?.into_unit()
    }
}

/// Parses a response body into the envelope, logging bodies that are not JSON.
pub fn decode_response(action: Action, body: &str) -> BackendResult<ServerResponse> {
    serde_json::from_str(body).map_err(|err| {
        let preview: String = body.chars().take(120).collect();
        warn!(action = action.as_str(), %err, body = %preview, "undecodable response");
        BackendError::Decode(err)
    })
}

#[async_trait]
impl ChatBackend for AjaxClient {
    async fn get_session(&self, session_id: &str) -> BackendResult<Session> {
        let payload: SessionPayload = self
            .call(Action::GetSession, &[("session_id", session_id)])
            .await?;
        Ok(payload.session)
    }

    async fn get_messages(&self, session_id: &str) -> BackendResult<Vec<Message>> {
        let payload: MessagesPayload = self
            .call(Action::GetMessages, &[("session_id", session_id)])
            .await?;
        Ok(payload.messages)
    }

    async fn send_message(&self, session_id: &str, text: &str) -> BackendResult<()> {
        self.call_unit(
            Action::SendMessage,
            &[("session_id", session_id), ("message", text)],
        )
        .await
    }

    async fn upload_file(&self, session_id: &str, upload: FileUpload) -> BackendResult<()> {
        let action = Action::UploadFile;
        let part = Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = Form::new()
            .text("action", action.as_str())
            .text("nonce", self.nonce.clone())
            .text("session_id", session_id.to_string())
            .part("file", part);

        debug!(action = action.as_str(), "posting multipart upload");
        let body = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .text()
            .await?;

        decode_response(action, &body)?.into_unit()
    }

    async fn get_all_sessions(&self, status: &SessionStatus) -> BackendResult<Vec<Session>> {
        let payload: SessionsPayload = self
            .call(Action::GetAllSessions, &[("status", status.as_str())])
            .await?;
        Ok(payload.sessions)
    }

    async fn update_session_status(
        &self,
        session_id: &str,
        status: &SessionStatus,
    ) -> BackendResult<()> {
        self.call_unit(
            Action::UpdateSessionStatus,
            &[("session_id", session_id), ("status", status.as_str())],
        )
        .await
    }

    async fn assign_session(&self, session_id: &str) -> BackendResult<()> {
        self.call_unit(Action::AssignSession, &[("session_id", session_id)])
            .await
    }

    async fn search_products(&self, term: &str) -> BackendResult<Vec<Product>> {
        let payload: ProductsPayload = self
            .call(Action::SearchProducts, &[("search_term", term)])
            .await?;
        Ok(payload.products)
    }

    async fn send_product_link(&self, session_id: &str, product_id: &str) -> BackendResult<()> {
        self.call_unit(
            Action::SendProductLink,
            &[("session_id", session_id), ("product_id", product_id)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_error_pages_are_decode_errors() {
        let err =
            decode_response(Action::GetMessages, "<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn wordpress_zero_body_is_a_decode_error() {
        // admin-ajax.php answers a bare `0` for unknown actions.
        let err = decode_response(Action::GetMessages, "0").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn envelope_is_decoded() {
        let res = decode_response(Action::GetSession, r#"{"success":true,"data":{}}"#).unwrap();
        assert!(res.success);
    }
}
