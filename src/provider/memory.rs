// ABOUTME: In-process distribution store implementing DistributionOps.
// ABOUTME: Supports scripted status polls, foreign writes, and fault injection.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

use super::{DistributionOps, ProviderError};
use crate::distribution::{ConfigSnapshot, DeploymentStatus, InvalidationRequest, StatusSnapshot};
use crate::types::{DistributionId, VersionTag};

/// Number of calls made to each provider operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCalls {
    pub get_config: usize,
    pub get_status: usize,
    pub update_config: usize,
    pub create_invalidation: usize,
}

impl ProviderCalls {
    pub fn total(&self) -> usize {
        self.get_config + self.get_status + self.update_config + self.create_invalidation
    }
}

/// Provider operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetConfig,
    GetStatus,
    UpdateConfig,
    CreateInvalidation,
}

#[derive(Debug, Clone, Copy)]
enum ScriptedPoll {
    Status(DeploymentStatus),
    ForeignWrite,
}

#[derive(Debug)]
struct StoredDistribution {
    config: Value,
    revision: u64,
    polls: VecDeque<ScriptedPoll>,
    invalidations: Vec<InvalidationRequest>,
}

impl StoredDistribution {
    fn version(&self) -> VersionTag {
        VersionTag::new(format!("T{}", self.revision))
    }

    fn write(&mut self, config: Value) {
        self.config = config;
        self.revision += 1;
    }
}

#[derive(Debug, Default)]
struct State {
    distributions: HashMap<DistributionId, StoredDistribution>,
    failures: HashMap<Operation, String>,
    calls: ProviderCalls,
}

/// A distribution control plane held in memory.
///
/// Version tags are `T1`, `T2`, ... and advance on every write. Polls report
/// the scripted statuses in order; with no script left, a poll reports
/// `Deployed` at the current version.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    state: Mutex<State>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deployed distribution at version `T1`.
    pub fn insert(&self, id: &DistributionId, config: Value) {
        self.state.lock().distributions.insert(
            id.clone(),
            StoredDistribution {
                config,
                revision: 1,
                polls: VecDeque::new(),
                invalidations: Vec::new(),
            },
        );
    }

    /// Queue the statuses reported by upcoming `get_status` calls.
    pub fn script_statuses(
        &self,
        id: &DistributionId,
        statuses: impl IntoIterator<Item = DeploymentStatus>,
    ) {
        self.with_distribution(id, |dist| {
            dist.polls
                .extend(statuses.into_iter().map(ScriptedPoll::Status));
        });
    }

    /// Queue a write by another actor. When the poll queue reaches it, the
    /// version tag advances and that poll reports `Pending`.
    pub fn script_foreign_write(&self, id: &DistributionId) {
        self.with_distribution(id, |dist| dist.polls.push_back(ScriptedPoll::ForeignWrite));
    }

    /// Make the next call to `operation` fail with a transport error.
    pub fn fail_next(&self, operation: Operation, message: impl Into<String>) {
        self.state.lock().failures.insert(operation, message.into());
    }

    pub fn calls(&self) -> ProviderCalls {
        self.state.lock().calls
    }

    pub fn config(&self, id: &DistributionId) -> Option<Value> {
        self.state
            .lock()
            .distributions
            .get(id)
            .map(|dist| dist.config.clone())
    }

    pub fn version(&self, id: &DistributionId) -> Option<VersionTag> {
        self.state.lock().distributions.get(id).map(|d| d.version())
    }

    pub fn invalidations(&self, id: &DistributionId) -> Vec<InvalidationRequest> {
        self.state
            .lock()
            .distributions
            .get(id)
            .map(|dist| dist.invalidations.clone())
            .unwrap_or_default()
    }

    fn with_distribution(&self, id: &DistributionId, f: impl FnOnce(&mut StoredDistribution)) {
        if let Some(dist) = self.state.lock().distributions.get_mut(id) {
            f(dist);
        }
    }

    /// Count the call, honour any injected failure, then run `f`.
    fn call<T>(
        &self,
        operation: Operation,
        id: &DistributionId,
        f: impl FnOnce(&mut StoredDistribution) -> Result<T, ProviderError>,
    ) -> Result<T, ProviderError> {
        let mut state = self.state.lock();
        match operation {
            Operation::GetConfig => state.calls.get_config += 1,
            Operation::GetStatus => state.calls.get_status += 1,
            Operation::UpdateConfig => state.calls.update_config += 1,
            Operation::CreateInvalidation => state.calls.create_invalidation += 1,
        }

        if let Some(message) = state.failures.remove(&operation) {
            return Err(ProviderError::Transport(message));
        }

        let dist = state
            .distributions
            .get_mut(id)
            .ok_or_else(|| ProviderError::NotFound(id.clone()))?;
        f(dist)
    }
}

#[async_trait]
impl DistributionOps for MemoryProvider {
    async fn get_config(&self, id: &DistributionId) -> Result<ConfigSnapshot, ProviderError> {
        self.call(Operation::GetConfig, id, |dist| {
            Ok(ConfigSnapshot {
                config: dist.config.clone(),
                version: dist.version(),
            })
        })
    }

    async fn get_status(&self, id: &DistributionId) -> Result<StatusSnapshot, ProviderError> {
        self.call(Operation::GetStatus, id, |dist| {
            let status = match dist.polls.pop_front() {
                Some(ScriptedPoll::Status(status)) => status,
                Some(ScriptedPoll::ForeignWrite) => {
                    let config = dist.config.clone();
                    dist.write(config);
                    DeploymentStatus::Pending
                }
                None => DeploymentStatus::Deployed,
            };
            Ok(StatusSnapshot {
                version: dist.version(),
                status,
            })
        })
    }

    async fn update_config(
        &self,
        id: &DistributionId,
        if_match: &VersionTag,
        config: &Value,
    ) -> Result<VersionTag, ProviderError> {
        self.call(Operation::UpdateConfig, id, |dist| {
            if *if_match != dist.version() {
                return Err(ProviderError::PreconditionFailed(if_match.clone()));
            }
            dist.write(config.clone());
            Ok(dist.version())
        })
    }

    async fn create_invalidation(
        &self,
        id: &DistributionId,
        request: &InvalidationRequest,
    ) -> Result<(), ProviderError> {
        self.call(Operation::CreateInvalidation, id, |dist| {
            let previous = dist
                .invalidations
                .iter()
                .find(|inv| inv.caller_reference == request.caller_reference);
            match previous {
                Some(inv) if inv.paths != request.paths => Err(ProviderError::ReferenceConflict(
                    request.caller_reference.clone(),
                )),
                Some(_) => Ok(()),
                None => {
                    dist.invalidations.push(request.clone());
                    Ok(())
                }
            }
        })
    }
}
