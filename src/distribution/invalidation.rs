// ABOUTME: Cache invalidation request keyed by a caller reference.
// ABOUTME: Promotions always invalidate every cached path.

use serde::Serialize;

/// Path pattern matching every object behind the distribution.
pub const WILDCARD_PATH: &str = "/*";

/// A set of path patterns plus the idempotency key the provider dedupes on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationRequest {
    pub paths: Vec<String>,
    pub caller_reference: String,
}

impl InvalidationRequest {
    /// Invalidate everything, keyed by `caller_reference`.
    pub fn everything(caller_reference: impl Into<String>) -> Self {
        Self {
            paths: vec![WILDCARD_PATH.to_string()],
            caller_reference: caller_reference.into(),
        }
    }
}
