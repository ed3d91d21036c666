// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod project;
mod release_ref;

pub use id::{DistributionId, Id, OriginId, VersionTag};
pub use project::{ProjectName, ProjectNameError};
pub use release_ref::{ReleaseRef, ReleaseRefError};
