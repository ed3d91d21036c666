// ABOUTME: Distribution configuration, status, and invalidation data types.
// ABOUTME: Exposes the origin mutator that repoints a single origin path.

mod invalidation;
mod origin;
mod snapshot;

pub use invalidation::{InvalidationRequest, WILDCARD_PATH};
pub use origin::{Repoint, release_origin_path, repoint};
pub use snapshot::{ConfigSnapshot, DeploymentStatus, StatusSnapshot};
