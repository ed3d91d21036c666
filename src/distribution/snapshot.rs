// ABOUTME: Snapshots of provider-owned distribution state.
// ABOUTME: Pairs each configuration or status read with the version tag it came with.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::types::VersionTag;

/// A distribution configuration exactly as the provider returned it,
/// together with the version tag that guards writes against it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    pub config: Value,
    pub version: VersionTag,
}

/// Propagation state of a distribution's latest configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentStatus {
    /// Change still propagating to edge locations.
    Pending,
    /// Change fully propagated.
    Deployed,
}

impl DeploymentStatus {
    /// Map a provider status string. Anything other than `Deployed`
    /// (e.g. `InProgress`) means the change has not settled yet.
    pub fn from_provider(status: &str) -> Self {
        if status.eq_ignore_ascii_case("deployed") {
            DeploymentStatus::Deployed
        } else {
            DeploymentStatus::Pending
        }
    }

    pub fn is_deployed(&self) -> bool {
        matches!(self, DeploymentStatus::Deployed)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStatus::Pending => f.write_str("Pending"),
            DeploymentStatus::Deployed => f.write_str("Deployed"),
        }
    }
}

/// One observation of a distribution's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub version: VersionTag,
    pub status: DeploymentStatus,
}
