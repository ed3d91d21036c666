// ABOUTME: Release reference parsed from a version-control ref string.
// ABOUTME: Extracts the environment segment and keeps the full tag as the release path.

use std::fmt;
use thiserror::Error;

const REF_PREFIXES: [&str; 2] = ["refs/heads/", "refs/tags/"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseRefError {
    #[error("ref is empty")]
    Empty,

    #[error("ref '{0}' has no environment segment")]
    MissingEnvironment(String),
}

/// A release identified by a branch or tag such as `deploy/prod/2024.05.01`.
///
/// The environment is the second path segment. The whole tag, namespace
/// included, is the release path suffix and the invalidation reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRef {
    tag: String,
    env_start: usize,
    env_end: usize,
}

impl ReleaseRef {
    /// Parse a ref, stripping a leading `refs/heads/` or `refs/tags/`.
    pub fn parse(raw: &str) -> Result<Self, ReleaseRefError> {
        let tag = REF_PREFIXES
            .iter()
            .find_map(|prefix| raw.strip_prefix(prefix))
            .unwrap_or(raw);

        if tag.is_empty() {
            return Err(ReleaseRefError::Empty);
        }

        let env_start = match tag.find('/') {
            Some(pos) => pos + 1,
            None => return Err(ReleaseRefError::MissingEnvironment(tag.to_string())),
        };
        let env_end = tag[env_start..]
            .find('/')
            .map(|pos| env_start + pos)
            .unwrap_or(tag.len());

        if env_start == env_end {
            return Err(ReleaseRefError::MissingEnvironment(tag.to_string()));
        }

        Ok(Self {
            tag: tag.to_string(),
            env_start,
            env_end,
        })
    }

    /// The ref with its `refs/heads/` or `refs/tags/` prefix removed.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn environment(&self) -> &str {
        &self.tag[self.env_start..self.env_end]
    }
}

impl fmt::Display for ReleaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}
