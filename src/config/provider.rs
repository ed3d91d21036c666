// ABOUTME: Provider endpoint configuration.
// ABOUTME: Builds the HTTP provider with its token and request timeout.

use serde::Deserialize;
use std::time::Duration;

use super::EnvValue;
use crate::error::Result;
use crate::provider::HttpProvider;

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub endpoint: String,

    #[serde(default)]
    pub token: Option<EnvValue>,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

impl ProviderConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            request_timeout: default_request_timeout(),
        }
    }

    pub fn build(&self) -> Result<HttpProvider> {
        let provider = HttpProvider::new(&self.endpoint)?.with_timeout(self.request_timeout);
        match &self.token {
            Some(token) => Ok(provider.with_token(token.resolve()?)),
            None => Ok(provider),
        }
    }
}
