// ABOUTME: Promotion state marker types for the type state pattern.
// ABOUTME: Each state carries the data the next stage consumes.

use serde_json::Value;

use crate::distribution::{ConfigSnapshot, InvalidationRequest};
use crate::types::VersionTag;

/// Initial state: target distribution resolved from the ref.
/// Available actions: `fetch()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolved;

/// Fetched: current configuration and its version tag in hand.
/// Available actions: `repoint()`
#[derive(Debug, Clone)]
pub struct Fetched {
    pub(crate) snapshot: ConfigSnapshot,
}

/// Repointed: new configuration built, guarded by the fetched version tag.
/// Available actions: `update()`
#[derive(Debug, Clone)]
pub struct Repointed {
    pub(crate) config: Value,
    pub(crate) if_match: VersionTag,
}

/// Updated: provider accepted the configuration.
/// Available actions: `await_deployed()`
#[derive(Debug, Clone)]
pub struct Updated {
    pub(crate) version: VersionTag,
}

/// Deployed: the update propagated with no foreign writes observed.
/// Available actions: `invalidate()`
#[derive(Debug, Clone)]
pub struct Deployed {
    pub(crate) version: VersionTag,
    pub(crate) polls: u32,
}

/// Completed: cache invalidation submitted.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) version: VersionTag,
    pub(crate) polls: u32,
    pub(crate) invalidation: InvalidationRequest,
}
