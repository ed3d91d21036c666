// ABOUTME: State transition methods for promotion orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use crate::distribution::{InvalidationRequest, Repoint, repoint};
use crate::provider::DistributionOps;

use super::Promotion;
use super::error::PromoteError;
use super::state::{Completed, Deployed, Fetched, Repointed, Resolved, Updated};
use super::watch::{WatchConfig, wait_until_deployed};

/// What to do when no origin carries the configured id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Submit the configuration unchanged and carry on.
    #[default]
    PassThrough,
    /// Fail before anything is written.
    Require,
}

// =============================================================================
// Resolved -> Fetched
// =============================================================================

impl Promotion<Resolved> {
    /// Read the distribution's configuration and version tag.
    ///
    /// # Errors
    ///
    /// Returns `PromoteError::ProviderUnavailable` if the read fails or the
    /// distribution does not exist.
    #[must_use = "promotion state must be used"]
    pub async fn fetch<P: DistributionOps>(
        self,
        provider: &P,
    ) -> Result<Promotion<Fetched>, PromoteError> {
        tracing::info!(distribution = %self.distribution(), "fetching distribution config");
        let snapshot = provider.get_config(self.distribution()).await?;
        tracing::debug!(version = %snapshot.version, "fetched config");
        Ok(self.transition(Fetched { snapshot }))
    }
}

// =============================================================================
// Fetched -> Repointed
// =============================================================================

impl Promotion<Fetched> {
    /// Build the new configuration with the origin repointed.
    ///
    /// # Errors
    ///
    /// Returns `PromoteError::OriginNotFound` only under `OriginPolicy::Require`.
    pub fn repoint(self, policy: OriginPolicy) -> Result<Promotion<Repointed>, PromoteError> {
        let Fetched { snapshot } = &self.state;
        let result = repoint(&snapshot.config, &self.origin_id, &self.origin_path);

        let previous_path = match &result {
            Repoint::Changed { previous_path, .. } => {
                tracing::info!(
                    origin = %self.origin_id,
                    old_path = %previous_path,
                    new_path = %self.origin_path,
                    "repointing origin"
                );
                Some(previous_path.clone())
            }
            Repoint::NotFound { .. } if policy == OriginPolicy::Require => {
                return Err(PromoteError::OriginNotFound {
                    distribution: self.distribution().clone(),
                    origin: self.origin_id.clone(),
                });
            }
            Repoint::NotFound { .. } => {
                tracing::debug!(origin = %self.origin_id, "origin not found");
                None
            }
        };

        let if_match = self.state.snapshot.version.clone();
        let mut promotion = self.transition(Repointed {
            config: result.into_config(),
            if_match,
        });
        promotion.previous_path = previous_path;
        Ok(promotion)
    }
}

// =============================================================================
// Repointed -> Updated
// =============================================================================

impl Promotion<Repointed> {
    /// Submit the new configuration conditioned on the fetched version tag.
    ///
    /// # Errors
    ///
    /// Returns `PromoteError::StaleVersion` if another writer got there
    /// first, `PromoteError::ProviderUnavailable` on any other failure.
    #[must_use = "promotion state must be used"]
    pub async fn update<P: DistributionOps>(
        self,
        provider: &P,
    ) -> Result<Promotion<Updated>, PromoteError> {
        let Repointed { config, if_match } = &self.state;
        tracing::info!(
            distribution = %self.distribution(),
            if_match = %if_match,
            "updating distribution"
        );

        let version = provider
            .update_config(self.distribution(), if_match, config)
            .await
            .map_err(|e| PromoteError::from_update(e, self.distribution()))?;

        tracing::info!(version = %version, "distribution update accepted");
        Ok(self.transition(Updated { version }))
    }
}

// =============================================================================
// Updated -> Deployed
// =============================================================================

impl Promotion<Updated> {
    /// Wait for the update to propagate.
    ///
    /// # Errors
    ///
    /// Returns `PromoteError::Conflicted` if the version tag moves,
    /// `PromoteError::TimedOut` when the budget runs out.
    #[must_use = "promotion state must be used"]
    pub async fn await_deployed<P: DistributionOps>(
        self,
        provider: &P,
        config: &WatchConfig,
    ) -> Result<Promotion<Deployed>, PromoteError> {
        let version = self.state.version.clone();
        let polls = wait_until_deployed(provider, self.distribution(), &version, config).await?;
        Ok(self.transition(Deployed { version, polls }))
    }
}

// =============================================================================
// Deployed -> Completed
// =============================================================================

impl Promotion<Deployed> {
    /// Invalidate every cached path, keyed by the release tag.
    ///
    /// # Errors
    ///
    /// Returns `PromoteError::DuplicateReferenceConflict` if the release tag
    /// was already used as a reference for different paths.
    #[must_use = "promotion state must be used"]
    pub async fn invalidate<P: DistributionOps>(
        self,
        provider: &P,
    ) -> Result<Promotion<Completed>, PromoteError> {
        let invalidation = InvalidationRequest::everything(self.release().tag());
        tracing::info!(
            distribution = %self.distribution(),
            caller_reference = %invalidation.caller_reference,
            "invalidating cache"
        );

        provider
            .create_invalidation(self.distribution(), &invalidation)
            .await
            .map_err(PromoteError::from_invalidation)?;

        let Deployed { version, polls } = self.state.clone();
        Ok(self.transition(Completed {
            version,
            polls,
            invalidation,
        }))
    }
}
