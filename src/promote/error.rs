// ABOUTME: Error types for promotion stages.
// ABOUTME: Separates rejected updates from conflicts observed while waiting.

use std::time::Duration;

use crate::provider::ProviderError;
use crate::types::{DistributionId, OriginId, VersionTag};

/// Fatal errors that abort a promotion.
#[derive(Debug, thiserror::Error)]
pub enum PromoteError {
    /// Transport, authorization, or not-found failure from the provider.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(#[source] ProviderError),

    /// The conditional update was rejected because the version tag was stale.
    #[error(
        "update rejected: distribution {distribution} changed after version {version} was read"
    )]
    StaleVersion {
        distribution: DistributionId,
        version: VersionTag,
    },

    /// The update went through, but someone else changed the distribution while waiting.
    #[error(
        "someone else deployed to distribution {distribution} while waiting for it to update \
         (expected version {expected}, found {observed})"
    )]
    Conflicted {
        distribution: DistributionId,
        expected: VersionTag,
        observed: VersionTag,
    },

    /// The distribution did not reach `Deployed` within the wait budget.
    #[error("distribution {distribution} took too long to deploy (waited {}s)", .waited.as_secs())]
    TimedOut {
        distribution: DistributionId,
        waited: Duration,
    },

    /// The caller reference was already used for an invalidation with other paths.
    #[error("invalidation reference '{reference}' was already used with different paths")]
    DuplicateReferenceConflict { reference: String },

    /// No origin carries the configured id and the run requires one.
    #[error("origin {origin} not found in distribution {distribution}")]
    OriginNotFound {
        distribution: DistributionId,
        origin: OriginId,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteErrorKind {
    ProviderUnavailable,
    StaleVersion,
    Conflicted,
    TimedOut,
    DuplicateReferenceConflict,
    OriginNotFound,
}

impl PromoteError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PromoteErrorKind {
        match self {
            PromoteError::ProviderUnavailable(_) => PromoteErrorKind::ProviderUnavailable,
            PromoteError::StaleVersion { .. } => PromoteErrorKind::StaleVersion,
            PromoteError::Conflicted { .. } => PromoteErrorKind::Conflicted,
            PromoteError::TimedOut { .. } => PromoteErrorKind::TimedOut,
            PromoteError::DuplicateReferenceConflict { .. } => {
                PromoteErrorKind::DuplicateReferenceConflict
            }
            PromoteError::OriginNotFound { .. } => PromoteErrorKind::OriginNotFound,
        }
    }

    /// Classify a provider error raised by the conditional update.
    pub(crate) fn from_update(err: ProviderError, distribution: &DistributionId) -> Self {
        match err {
            ProviderError::PreconditionFailed(version) => PromoteError::StaleVersion {
                distribution: distribution.clone(),
                version,
            },
            other => PromoteError::ProviderUnavailable(other),
        }
    }

    /// Classify a provider error raised by the invalidation.
    pub(crate) fn from_invalidation(err: ProviderError) -> Self {
        match err {
            ProviderError::ReferenceConflict(reference) => {
                PromoteError::DuplicateReferenceConflict { reference }
            }
            other => PromoteError::ProviderUnavailable(other),
        }
    }
}

impl From<ProviderError> for PromoteError {
    fn from(err: ProviderError) -> Self {
        PromoteError::ProviderUnavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_failure_on_update_is_stale_version() {
        let err = PromoteError::from_update(
            ProviderError::PreconditionFailed(VersionTag::new("T1")),
            &DistributionId::new("DIST1"),
        );
        assert_eq!(err.kind(), PromoteErrorKind::StaleVersion);
        assert!(err.to_string().contains("update rejected"));
    }

    #[test]
    fn transport_failure_on_update_is_unavailable() {
        let err = PromoteError::from_update(
            ProviderError::Transport("connection reset".to_string()),
            &DistributionId::new("DIST1"),
        );
        assert_eq!(err.kind(), PromoteErrorKind::ProviderUnavailable);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn conflict_and_stale_messages_differ() {
        let stale = PromoteError::StaleVersion {
            distribution: DistributionId::new("D"),
            version: VersionTag::new("T1"),
        };
        let conflicted = PromoteError::Conflicted {
            distribution: DistributionId::new("D"),
            expected: VersionTag::new("T2"),
            observed: VersionTag::new("T3"),
        };
        assert_ne!(stale.to_string(), conflicted.to_string());
        assert!(conflicted.to_string().contains("while waiting"));
    }
}
