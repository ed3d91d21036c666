// ABOUTME: Deployment watcher that polls a distribution until it settles.
// ABOUTME: Pure state transitions plus an async driver using tokio's clock.

use std::time::Duration;

use crate::distribution::StatusSnapshot;
use crate::provider::DistributionOps;
use crate::types::{DistributionId, VersionTag};

use super::error::PromoteError;

/// Polling cadence and overall budget for the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(15),
            max_wait: Duration::from_secs(20 * 60),
        }
    }
}

/// State of a watch. Every variant except `Pending` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchState {
    Pending { remaining: Duration, polls: u32 },
    Deployed { polls: u32 },
    Conflicted { observed: VersionTag, polls: u32 },
    TimedOut { polls: u32 },
}

impl WatchState {
    pub fn start(config: &WatchConfig) -> Self {
        WatchState::Pending {
            remaining: config.max_wait,
            polls: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, WatchState::Pending { .. })
    }

    pub fn polls(&self) -> u32 {
        match self {
            WatchState::Pending { polls, .. }
            | WatchState::Deployed { polls }
            | WatchState::Conflicted { polls, .. }
            | WatchState::TimedOut { polls } => *polls,
        }
    }

    /// Apply one poll taken after sleeping `poll_interval`.
    ///
    /// A version tag other than `expected` wins over any reported status.
    /// Terminal states ignore further observations.
    pub fn observe(
        self,
        expected: &VersionTag,
        observation: &StatusSnapshot,
        poll_interval: Duration,
    ) -> Self {
        let WatchState::Pending { remaining, polls } = self else {
            return self;
        };
        let polls = polls + 1;
        let remaining = remaining.saturating_sub(poll_interval);

        if observation.version != *expected {
            WatchState::Conflicted {
                observed: observation.version.clone(),
                polls,
            }
        } else if observation.status.is_deployed() {
            WatchState::Deployed { polls }
        } else if remaining.is_zero() {
            WatchState::TimedOut { polls }
        } else {
            WatchState::Pending { remaining, polls }
        }
    }
}

/// Poll until the distribution reports `Deployed` at `expected`.
///
/// Returns the number of polls taken. Any failed poll aborts the watch.
pub async fn wait_until_deployed<P: DistributionOps>(
    provider: &P,
    distribution: &DistributionId,
    expected: &VersionTag,
    config: &WatchConfig,
) -> Result<u32, PromoteError> {
    let mut state = WatchState::start(config);

    loop {
        tokio::time::sleep(config.poll_interval).await;

        let observation = provider.get_status(distribution).await?;
        state = state.observe(expected, &observation, config.poll_interval);

        match &state {
            WatchState::Pending { remaining, polls } => {
                tracing::info!(
                    %distribution,
                    version = %observation.version,
                    status = %observation.status,
                    polls,
                    remaining_secs = remaining.as_secs(),
                    "distribution still deploying"
                );
            }
            WatchState::Deployed { polls } => {
                tracing::info!(%distribution, polls, "distribution deployed");
                return Ok(*polls);
            }
            WatchState::Conflicted { observed, .. } => {
                return Err(PromoteError::Conflicted {
                    distribution: distribution.clone(),
                    expected: expected.clone(),
                    observed: observed.clone(),
                });
            }
            WatchState::TimedOut { .. } => {
                return Err(PromoteError::TimedOut {
                    distribution: distribution.clone(),
                    waited: config.max_wait,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::DeploymentStatus;

    const INTERVAL: Duration = Duration::from_secs(15);

    fn config(max_wait_secs: u64) -> WatchConfig {
        WatchConfig {
            poll_interval: INTERVAL,
            max_wait: Duration::from_secs(max_wait_secs),
        }
    }

    fn snapshot(tag: &str, status: DeploymentStatus) -> StatusSnapshot {
        StatusSnapshot {
            version: VersionTag::new(tag),
            status,
        }
    }

    #[test]
    fn pending_then_deployed_takes_k_plus_one_polls() {
        let expected = VersionTag::new("T2");
        let mut state = WatchState::start(&config(60));

        for _ in 0..3 {
            state = state.observe(&expected, &snapshot("T2", DeploymentStatus::Pending), INTERVAL);
            assert!(!state.is_terminal());
        }
        state = state.observe(&expected, &snapshot("T2", DeploymentStatus::Deployed), INTERVAL);

        assert_eq!(state, WatchState::Deployed { polls: 4 });
    }

    #[test]
    fn foreign_tag_conflicts_even_when_deployed() {
        let expected = VersionTag::new("T2");
        let state = WatchState::start(&config(60)).observe(
            &expected,
            &snapshot("T3", DeploymentStatus::Deployed),
            INTERVAL,
        );

        assert_eq!(
            state,
            WatchState::Conflicted {
                observed: VersionTag::new("T3"),
                polls: 1
            }
        );
    }

    #[test]
    fn budget_exhaustion_times_out() {
        let expected = VersionTag::new("T2");
        let mut state = WatchState::start(&config(45));
        let pending = snapshot("T2", DeploymentStatus::Pending);

        state = state.observe(&expected, &pending, INTERVAL);
        state = state.observe(&expected, &pending, INTERVAL);
        assert!(!state.is_terminal());
        state = state.observe(&expected, &pending, INTERVAL);

        assert_eq!(state, WatchState::TimedOut { polls: 3 });
    }

    #[test]
    fn deployed_on_last_budgeted_poll_wins_over_timeout() {
        let expected = VersionTag::new("T2");
        let state = WatchState::start(&config(15)).observe(
            &expected,
            &snapshot("T2", DeploymentStatus::Deployed),
            INTERVAL,
        );
        assert_eq!(state, WatchState::Deployed { polls: 1 });
    }

    #[test]
    fn terminal_state_ignores_observations() {
        let expected = VersionTag::new("T2");
        let state = WatchState::TimedOut { polls: 2 };
        let next = state
            .clone()
            .observe(&expected, &snapshot("T2", DeploymentStatus::Deployed), INTERVAL);
        assert_eq!(next, state);
    }

    #[test]
    fn default_budget_allows_eighty_polls() {
        let config = WatchConfig::default();
        assert_eq!(config.max_wait.as_secs() / config.poll_interval.as_secs(), 80);
    }
}
