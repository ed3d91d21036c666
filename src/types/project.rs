// ABOUTME: Project name used as the leading origin path segment.
// ABOUTME: Taken verbatim from an explicit override or derived from the repository slug.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectNameError {
    #[error("project name cannot be empty")]
    Empty,
}

/// The storage prefix a project's releases live under.
///
/// An explicit name may span several path segments (`web/app`); it is
/// joined into the origin path unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(value: &str) -> Result<Self, ProjectNameError> {
        if value.is_empty() {
            return Err(ProjectNameError::Empty);
        }
        Ok(Self(value.to_string()))
    }

    /// Take the repository part of an `owner/repo` slug.
    /// A slug without an owner is used as-is.
    pub fn from_repository(slug: &str) -> Result<Self, ProjectNameError> {
        let repo = slug.rsplit('/').next().unwrap_or(slug);
        Self::new(repo)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
