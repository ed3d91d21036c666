// ABOUTME: Ref resolver and environment gate for a promotion run.
// ABOUTME: Maps a triggering ref to a distribution, or decides to skip the run.

use std::collections::HashMap;
use std::fmt;

use crate::types::{DistributionId, ReleaseRef};

/// Where a release should be promoted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub release: ReleaseRef,
    pub distribution: DistributionId,
}

/// Why a run ends successfully without touching any distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The ref's environment has no distribution mapped to it.
    EnvironmentNotConfigured { environment: String },
    /// The ref has no environment segment at all.
    MalformedRef { reference: String, reason: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EnvironmentNotConfigured { environment } => {
                write!(f, "no distribution ID defined for '{}'", environment)
            }
            SkipReason::MalformedRef { reference, reason } => {
                write!(f, "malformed ref '{}': {}", reference, reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Promote(Target),
    Skip(SkipReason),
}

/// Resolve a triggering ref against the environment → distribution map.
pub fn resolve(raw_ref: &str, distributions: &HashMap<String, DistributionId>) -> Resolution {
    let release = match ReleaseRef::parse(raw_ref) {
        Ok(release) => release,
        Err(e) => {
            return Resolution::Skip(SkipReason::MalformedRef {
                reference: raw_ref.to_string(),
                reason: e.to_string(),
            });
        }
    };

    match distributions.get(release.environment()) {
        Some(distribution) => Resolution::Promote(Target {
            distribution: distribution.clone(),
            release,
        }),
        None => Resolution::Skip(SkipReason::EnvironmentNotConfigured {
            environment: release.environment().to_string(),
        }),
    }
}
