//! Response envelope shared by every backend action.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    net::{BackendError, BackendResult},
    types::{Message, Product, Session},
};

/// `{success: bool, data: {...}}` as returned by the AJAX endpoint.
#[derive(Debug, Deserialize)]
pub struct ServerResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
}

impl ServerResponse {
    /// The server-supplied failure text, from `data.message` or a bare string `data`.
    pub fn error_message(&self) -> Option<String> {
        let message = match &self.data {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("message").and_then(Value::as_str),
            _ => None,
        };

        message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
    }

    /// Checks `success` and discards the payload.
    pub fn into_unit(self) -> BackendResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(BackendError::Application {
                message: self.error_message(),
            })
        }
    }

    /// Checks `success` and decodes `data` into `T`.
    pub fn into_data<T: DeserializeOwned>(self) -> BackendResult<T> {
        if !self.success {
            return Err(BackendError::Application {
                message: self.error_message(),
            });
        }

        Ok(serde_json::from_value(self.data)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionPayload {
    pub session: Session,
}

#[derive(Debug, Deserialize)]
pub struct SessionsPayload {
    #[serde(default)]
    pub sessions: Vec<Session>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesPayload {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct ProductsPayload {
    #[serde(default)]
    pub products: Vec<Product>,
}
