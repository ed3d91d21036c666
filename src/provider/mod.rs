// ABOUTME: Distribution control-plane abstraction and its implementations.
// ABOUTME: Defines DistributionOps plus HTTP and in-memory providers.

mod http;
mod memory;

pub use http::{HttpError, HttpProvider};
pub use memory::{MemoryProvider, Operation, ProviderCalls};

use async_trait::async_trait;
use serde_json::Value;

use crate::distribution::{ConfigSnapshot, InvalidationRequest, StatusSnapshot};
use crate::types::{DistributionId, VersionTag};

/// Operations a CDN control plane exposes for one distribution.
///
/// Implementations perform exactly one remote call per method and never retry.
#[async_trait]
pub trait DistributionOps: Send + Sync {
    /// Read the current configuration and the version tag guarding it.
    async fn get_config(&self, id: &DistributionId) -> Result<ConfigSnapshot, ProviderError>;

    /// Read the current version tag and deployment status.
    async fn get_status(&self, id: &DistributionId) -> Result<StatusSnapshot, ProviderError>;

    /// Replace the configuration if `if_match` is still current.
    /// Returns the version tag of the new configuration.
    async fn update_config(
        &self,
        id: &DistributionId,
        if_match: &VersionTag,
        config: &Value,
    ) -> Result<VersionTag, ProviderError>;

    /// Submit a cache invalidation.
    async fn create_invalidation(
        &self,
        id: &DistributionId,
        request: &InvalidationRequest,
    ) -> Result<(), ProviderError>;
}

/// Errors reported by a provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("distribution not found: {0}")]
    NotFound(DistributionId),

    #[error("version tag {0} is no longer current")]
    PreconditionFailed(VersionTag),

    #[error("caller reference '{0}' was already used with different paths")]
    ReferenceConflict(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("provider request failed: {0}")]
    Transport(String),

    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

impl From<HttpError> for ProviderError {
    fn from(err: HttpError) -> Self {
        ProviderError::Transport(err.to_string())
    }
}
