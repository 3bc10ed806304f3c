use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element not found: {0}")]
    MissingElement(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Js(describe_js(&value))
    }
}

/// Failure of the HTTP client before any response arrived.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("{name}: {message}")]
    Js { name: String, message: String },
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// `fetch` rejects with a `TypeError` when the request never reached
    /// the server. Browsers word the message differently.
    pub fn is_network(&self) -> bool {
        match self {
            TransportError::Js { name, message } => {
                name == "TypeError"
                    && (message.contains("fetch")
                        || message.contains("NetworkError")
                        || message.contains("Load failed"))
            }
            TransportError::Other(_) => false,
        }
    }
}

impl From<gloo_net::Error> for TransportError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::JsError(js) => TransportError::Js {
                name: js.name,
                message: js.message,
            },
            other => TransportError::Other(other.to_string()),
        }
    }
}

pub fn describe_js(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return format!("{}: {}", String::from(err.name()), String::from(err.message()));
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
