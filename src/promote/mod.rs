// ABOUTME: Release promotion orchestration using the type state pattern.
// ABOUTME: Runs resolve, fetch, repoint, update, watch, and invalidate in order.

mod error;
mod promotion;
mod state;
mod transitions;
mod watch;

pub use error::{PromoteError, PromoteErrorKind};
pub use promotion::{Promotion, PromotionReport};
pub use state::{Completed, Deployed, Fetched, Repointed, Resolved, Updated};
pub use transitions::OriginPolicy;
pub use watch::{WatchConfig, WatchState, wait_until_deployed};

use std::collections::HashMap;

use crate::diagnostics::{Diagnostics, Warning};
use crate::provider::DistributionOps;
use crate::release::{Resolution, SkipReason, resolve};
use crate::types::{DistributionId, OriginId, ProjectName};

/// Everything one promotion run needs besides the provider.
#[derive(Debug, Clone)]
pub struct PromotionRequest {
    pub git_ref: String,
    pub distributions: HashMap<String, DistributionId>,
    pub origin_id: OriginId,
    pub project: ProjectName,
    pub watch: WatchConfig,
    pub origin_policy: OriginPolicy,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do for this ref; no provider calls were made.
    Skipped(SkipReason),
    Promoted(PromotionReport),
}

/// Run a full promotion, stopping at the first failing stage.
///
/// An update that succeeded is never reverted, even if a later stage fails.
pub async fn execute<P: DistributionOps>(
    provider: &P,
    request: &PromotionRequest,
    diag: &mut Diagnostics,
) -> Result<Outcome, PromoteError> {
    let target = match resolve(&request.git_ref, &request.distributions) {
        Resolution::Promote(target) => target,
        Resolution::Skip(reason) => {
            if let SkipReason::MalformedRef { .. } = reason {
                diag.warn(Warning::malformed_ref(reason.to_string()));
            } else {
                tracing::info!("skipping promotion: {}", reason);
            }
            return Ok(Outcome::Skipped(reason));
        }
    };

    let promotion = Promotion::new(target, &request.project, request.origin_id.clone());
    tracing::info!(
        environment = promotion.release().environment(),
        release = promotion.release().tag(),
        origin_path = promotion.origin_path(),
        "promoting release"
    );

    let promotion = promotion
        .fetch(provider)
        .await?
        .repoint(request.origin_policy)?;

    if promotion.previous_path().is_none() {
        diag.warn(Warning::origin_not_found(format!(
            "origin {} not found in distribution {}; configuration submitted unchanged",
            promotion.origin_id(),
            promotion.distribution()
        )));
    }

    let report = promotion
        .update(provider)
        .await?
        .await_deployed(provider, &request.watch)
        .await?
        .invalidate(provider)
        .await?
        .finish();

    Ok(Outcome::Promoted(report))
}
