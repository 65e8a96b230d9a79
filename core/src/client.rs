//! Request builder, response validator and local mirror for the counter API.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that validates an `HttpResponse`.
//! Both halves are pure. The dispatched operations (`create`, `get`,
//! `increment`, `decrement`, `set`) glue them together through the client's
//! `Transport` and are the only place the local mirror is written, after
//! validation succeeds and before the result is returned.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorResponse};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::mirror::LocalMirror;
use crate::types::{CounterResponse, CounterValue, MutationResponse};

/// Client for one namespace of the counter service.
///
/// All operations take `&self`; wrap the client in an `Arc` to share it
/// across threads (requires a `Sync` transport).
#[derive(Debug)]
pub struct CounterClient<T> {
    endpoint: String,
    namespace: String,
    transport: T,
    mirror: LocalMirror,
}

#[cfg(feature = "ureq")]
impl CounterClient<crate::http::UreqTransport> {
    /// Client backed by a fresh blocking `ureq` agent.
    pub fn with_ureq(config: ClientConfig) -> Self {
        Self::new(config, crate::http::UreqTransport::new())
    }
}

impl<T> CounterClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            namespace: config.namespace,
            transport,
            mirror: LocalMirror::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Last value the service confirmed for `key`, if any call has seen one.
    pub fn local_value(&self, key: &str) -> Option<i64> {
        self.mirror.get(key)
    }

    pub fn local_values(&self) -> HashMap<String, i64> {
        self.mirror.snapshot()
    }

    fn counter_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.namespace, key)
    }

    fn request(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<CounterValue>,
    ) -> Result<HttpRequest, ApiError> {
        let body = body
            .map(|b| serde_json::to_string(&b))
            .transpose()
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        })
    }

    pub fn build_create(&self, key: &str, initial_value: i64) -> Result<HttpRequest, ApiError> {
        self.request(
            HttpMethod::Post,
            self.counter_url(key),
            Some(CounterValue { current_value: initial_value }),
        )
    }

    pub fn build_get(&self, key: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, self.counter_url(key), None)
    }

    pub fn build_increment(&self, key: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, format!("{}/increment", self.counter_url(key)), None)
    }

    pub fn build_decrement(&self, key: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, format!("{}/decrement", self.counter_url(key)), None)
    }

    pub fn build_set(&self, key: &str, value: i64) -> Result<HttpRequest, ApiError> {
        self.request(
            HttpMethod::Post,
            format!("{}/update", self.counter_url(key)),
            Some(CounterValue { current_value: value }),
        )
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<CounterResponse, ApiError> {
        decode(success_body(response)?)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<CounterResponse, ApiError> {
        decode(success_body(response)?)
    }

    pub fn parse_increment(&self, response: HttpResponse) -> Result<MutationResponse, ApiError> {
        decode(success_body(response)?)
    }

    pub fn parse_decrement(&self, response: HttpResponse) -> Result<MutationResponse, ApiError> {
        decode(success_body(response)?)
    }

    pub fn parse_set(&self, response: HttpResponse) -> Result<MutationResponse, ApiError> {
        decode(success_body(response)?)
    }

    fn remember(&self, key: &str, value: Option<i64>) {
        if let Some(value) = value {
            debug!(namespace = %self.namespace, key, value, "mirror updated");
            self.mirror.record(key, value);
        }
    }
}

impl<T: Transport> CounterClient<T> {
    fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "dispatching request");
        self.transport.execute(&request)
    }

    /// Create `key` with `initial_value`. If the key already exists the
    /// service leaves it unchanged and reports `already_exists: true`.
    pub fn create(&self, key: &str, initial_value: i64) -> Result<CounterResponse, ApiError> {
        let response = self.dispatch(self.build_create(key, initial_value)?)?;
        let parsed = self.parse_create(response)?;
        self.remember(key, parsed.current_value());
        Ok(parsed)
    }

    /// `create` starting from zero.
    pub fn create_default(&self, key: &str) -> Result<CounterResponse, ApiError> {
        self.create(key, 0)
    }

    /// Read `key`. A missing key is `CounterResponse::Absent`, not an error,
    /// and leaves the mirror for that key as it was.
    pub fn get(&self, key: &str) -> Result<CounterResponse, ApiError> {
        let response = self.dispatch(self.build_get(key)?)?;
        let parsed = self.parse_get(response)?;
        self.remember(key, parsed.current_value());
        Ok(parsed)
    }

    pub fn increment(&self, key: &str) -> Result<MutationResponse, ApiError> {
        let response = self.dispatch(self.build_increment(key)?)?;
        let parsed = self.parse_increment(response)?;
        self.remember(key, Some(parsed.current_value));
        Ok(parsed)
    }

    pub fn decrement(&self, key: &str) -> Result<MutationResponse, ApiError> {
        let response = self.dispatch(self.build_decrement(key)?)?;
        let parsed = self.parse_decrement(response)?;
        self.remember(key, Some(parsed.current_value));
        Ok(parsed)
    }

    pub fn set(&self, key: &str, value: i64) -> Result<MutationResponse, ApiError> {
        let response = self.dispatch(self.build_set(key, value)?)?;
        let parsed = self.parse_set(response)?;
        self.remember(key, Some(parsed.current_value));
        Ok(parsed)
    }
}

/// Turn a non-2xx response into `ApiError::Http`, otherwise hand back the body.
fn success_body(response: HttpResponse) -> Result<String, ApiError> {
    if response.is_success() {
        return Ok(response.body);
    }
    warn!(status = response.status, body = %response.body, "service rejected request");
    Err(ApiError::Http(ErrorResponse {
        status: response.status,
        headers: response.headers,
        message: response.body.clone(),
        body: Some(response.body),
    }))
}

fn decode<R: serde::de::DeserializeOwned>(body: String) -> Result<R, ApiError> {
    serde_json::from_str(&body).map_err(|e| {
        warn!(error = %e, body = %body, "response failed schema validation");
        ApiError::DeserializationError(e.to_string())
    })
}
