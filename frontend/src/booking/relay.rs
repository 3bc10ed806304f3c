//! Talking to the third-party form relay.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::Deserialize;
use web_sys::FormData;

use crate::error::TransportError;

pub const SUCCESS_MESSAGE: &str = "Thank you. Your request has been sent. We'll be in touch soon.";
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again or contact us by phone.";
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Named form controls in submission order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormPayload(pub Vec<(String, String)>);

impl FormPayload {
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayFieldError {
    #[serde(default)]
    pub message: Option<String>,
}

/// JSON body returned by the relay. Every field is optional and an
/// unparsable body is treated as `{}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayBody {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<RelayFieldError>>,
}

impl RelayBody {
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    /// `error`, else the first entry of `errors`.
    pub fn message(&self) -> Option<&str> {
        let first = self
            .errors
            .as_ref()
            .and_then(|errs| errs.first())
            .and_then(|e| e.message.as_deref());
        self.error
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(first.filter(|m| !m.is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub ok: bool,
    pub status: u16,
    pub body: RelayBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    Failed(String),
}

/// Accepted when the HTTP status is OK and either the body says `ok: true`
/// or the status is exactly 200.
pub fn classify(reply: &RelayReply) -> Outcome {
    if reply.ok && (reply.body.ok == Some(true) || reply.status == 200) {
        return Outcome::Delivered;
    }
    let message = reply.body.message().unwrap_or(FALLBACK_MESSAGE);
    Outcome::Failed(message.to_string())
}

pub fn classify_transport(err: &TransportError) -> Outcome {
    if err.is_network() {
        Outcome::Failed(NETWORK_MESSAGE.to_string())
    } else {
        Outcome::Failed(FALLBACK_MESSAGE.to_string())
    }
}

#[async_trait(?Send)]
pub trait Relay {
    async fn send(&self, payload: &FormPayload) -> Result<RelayReply, TransportError>;
}

/// Posts multipart form data with `fetch`.
pub struct HttpRelay {
    endpoint: String,
}

impl HttpRelay {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait(?Send)]
impl Relay for HttpRelay {
    async fn send(&self, payload: &FormPayload) -> Result<RelayReply, TransportError> {
        let data = FormData::new().map_err(|e| TransportError::Other(crate::error::describe_js(&e)))?;
        for (key, value) in payload.entries() {
            data.append_with_str(key, value)
                .map_err(|e| TransportError::Other(crate::error::describe_js(&e)))?;
        }

        let response = Request::post(&self.endpoint)
            .header("Accept", "application/json")
            .body(data)
            .send()
            .await?;

        let ok = response.ok();
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        log::debug!("relay answered {} ({} bytes)", status, text.len());

        Ok(RelayReply {
            ok,
            status,
            body: RelayBody::parse(&text),
        })
    }
}
