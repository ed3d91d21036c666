// ABOUTME: Generic promotion struct parameterized by state marker.
// ABOUTME: Holds the resolved target and origin path shared by every stage.

use crate::distribution::{InvalidationRequest, release_origin_path};
use crate::release::Target;
use crate::types::{DistributionId, OriginId, ProjectName, ReleaseRef, VersionTag};

use super::state::{Completed, Resolved};

/// A promotion in progress, parameterized by its current state.
#[derive(Debug)]
pub struct Promotion<S> {
    pub(crate) target: Target,
    pub(crate) origin_id: OriginId,
    pub(crate) origin_path: String,
    pub(crate) previous_path: Option<String>,
    pub(crate) state: S,
}

impl Promotion<Resolved> {
    /// Start a promotion of `target` that repoints `origin_id` to
    /// `/<project>/<release tag>`.
    pub fn new(target: Target, project: &ProjectName, origin_id: OriginId) -> Self {
        let origin_path = release_origin_path(project, &target.release);
        Promotion {
            target,
            origin_id,
            origin_path,
            previous_path: None,
            state: Resolved,
        }
    }
}

impl<S> Promotion<S> {
    pub fn distribution(&self) -> &DistributionId {
        &self.target.distribution
    }

    pub fn release(&self) -> &ReleaseRef {
        &self.target.release
    }

    pub fn origin_id(&self) -> &OriginId {
        &self.origin_id
    }

    /// The path the origin is repointed to.
    pub fn origin_path(&self) -> &str {
        &self.origin_path
    }

    /// The origin's path before the promotion; `None` until repointed or
    /// when no origin matched.
    pub fn previous_path(&self) -> Option<&str> {
        self.previous_path.as_deref()
    }

    pub(crate) fn transition<T>(self, state: T) -> Promotion<T> {
        Promotion {
            target: self.target,
            origin_id: self.origin_id,
            origin_path: self.origin_path,
            previous_path: self.previous_path,
            state,
        }
    }
}

/// Summary of a finished promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionReport {
    pub distribution: DistributionId,
    pub release: String,
    pub origin_id: OriginId,
    pub origin_path: String,
    pub previous_path: Option<String>,
    pub version: VersionTag,
    pub polls: u32,
    pub invalidation: InvalidationRequest,
}

impl Promotion<Completed> {
    pub fn finish(self) -> PromotionReport {
        PromotionReport {
            distribution: self.target.distribution,
            release: self.target.release.tag().to_string(),
            origin_id: self.origin_id,
            origin_path: self.origin_path,
            previous_path: self.previous_path,
            version: self.state.version,
            polls: self.state.polls,
            invalidation: self.state.invalidation,
        }
    }
}
