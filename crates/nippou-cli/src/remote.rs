//! HTTP client for the hosted configuration endpoint.
//!
//! `GET {base}/api/config` answers `{ "source": "blob"|"defaults", "config": {...} }`.
//! `POST {base}/api/config` takes a bearer token and either the document or
//! `{ "reset": true }`.

use nippou_core::store::{ConfigStore, LoadSource, Loaded, StoreError, validate_payload};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct ConfigResponse {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    config: Option<Value>,
}

pub struct HttpStore {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("nippou/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            endpoint: format!("{}/api/config", base_url.trim_end_matches('/')),
            agent,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post(&self, token: &str, body: &Value) -> Result<(), StoreError> {
        let result = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {token}"))
            .send_json(body);

        match result {
            Ok(response) => {
                debug!(status = response.status(), "store accepted write");
                Ok(())
            }
            Err(ureq::Error::Status(401 | 403, _)) => Err(StoreError::Unauthorized),
            Err(ureq::Error::Status(400, response)) => {
                Err(StoreError::InvalidPayload(error_message(response)))
            }
            Err(ureq::Error::Status(code, response)) => Err(StoreError::Transport(format!(
                "HTTP {code} from {}: {}",
                self.endpoint,
                error_message(response)
            ))),
            Err(err) => Err(StoreError::Transport(format!(
                "request to {} failed: {err}",
                self.endpoint
            ))),
        }
    }
}

impl ConfigStore for HttpStore {
    fn load(&self) -> Loaded {
        let response = match self.agent.get(&self.endpoint).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Loaded::fallback(format!("HTTP {code} from {}", self.endpoint));
            }
            Err(err) => {
                return Loaded::fallback(format!("request to {} failed: {err}", self.endpoint));
            }
        };

        let body: ConfigResponse = match response.into_json() {
            Ok(body) => body,
            Err(err) => {
                return Loaded::fallback(format!("invalid response from {}: {err}", self.endpoint));
            }
        };

        match (body.source.as_deref(), body.config) {
            (_, None) => Loaded::fallback(format!("response from {} carried no config", self.endpoint)),
            (Some("blob"), Some(document)) => {
                info!(endpoint = %self.endpoint, "loaded stored configuration");
                Loaded::stored(document)
            }
            (_, Some(document)) => Loaded {
                source: LoadSource::Defaults,
                document,
                warning: None,
            },
        }
    }

    fn save(&self, document: &Value, token: &str) -> Result<(), StoreError> {
        validate_payload(document)?;
        self.post(token, document)
    }

    fn reset(&self, token: &str) -> Result<(), StoreError> {
        self.post(token, &json!({ "reset": true }))
    }
}

/// Pull `{"error": "..."}` out of a failure body, else the raw text.
fn error_message(response: ureq::Response) -> String {
    let text = response.into_string().unwrap_or_default();
    serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(ToString::to_string))
        .unwrap_or(text)
}
