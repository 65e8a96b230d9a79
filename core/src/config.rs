//! Endpoint and namespace selection for `CounterClient`.
//!
//! The namespace has no default. Two clients sharing a namespace share every
//! counter in it, so each caller must pick one deliberately.

use crate::error::ApiError;

/// Public counter service.
pub const DEFAULT_ENDPOINT: &str = "https://letscountapi.com";

pub const ENDPOINT_ENV: &str = "COUNTAPI_ENDPOINT";
pub const NAMESPACE_ENV: &str = "COUNTAPI_NAMESPACE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub namespace: String,
}

impl ClientConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            namespace: namespace.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Read `COUNTAPI_NAMESPACE` (required) and `COUNTAPI_ENDPOINT`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let namespace = lookup(NAMESPACE_ENV)
            .filter(|ns| !ns.is_empty())
            .ok_or(ApiError::MissingConfig(NAMESPACE_ENV))?;
        let config = Self::new(namespace);
        Ok(match lookup(ENDPOINT_ENV).filter(|e| !e.is_empty()) {
            Some(endpoint) => config.with_endpoint(endpoint),
            None => config,
        })
    }
}
