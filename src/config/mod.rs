// ABOUTME: Configuration types and parsing for edgeflip.yml.
// ABOUTME: Merges the optional config file with pipeline inputs and CLI overrides.

mod env_value;
mod provider;
mod watch;

pub use env_value::EnvValue;
pub use provider::ProviderConfig;
pub use watch::WatchSettings;

use crate::error::{Error, Result};
use crate::promote::{OriginPolicy, PromotionRequest};
use crate::types::{DistributionId, OriginId, ProjectName};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "edgeflip.yml";
pub const CONFIG_FILENAME_ALT: &str = "edgeflip.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".edgeflip/config.yml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub distributions: HashMap<String, DistributionId>,

    #[serde(default)]
    pub origin_id: Option<OriginId>,

    #[serde(default)]
    pub project: Option<String>,

    #[serde(default)]
    pub provider: Option<ProviderConfig>,

    #[serde(default)]
    pub watch: WatchSettings,

    #[serde(default)]
    pub strict_origin: bool,
}

/// Values supplied on the command line or by the pipeline environment.
/// Each one set here replaces the config file's value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Environment → distribution map as JSON or YAML text.
    pub distributions: Option<String>,
    pub origin_id: Option<String>,
    pub project: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub poll_interval: Option<Duration>,
    pub max_wait: Option<Duration>,
    pub strict_origin: bool,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`. The file is optional:
    /// with none present every value must come from overrides.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("loading config from {}", path.display());
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(text) = overrides.distributions.filter(|t| !t.trim().is_empty()) {
            self.distributions = parse_distributions(&text)?;
        }

        if let Some(origin_id) = overrides.origin_id.filter(|s| !s.is_empty()) {
            self.origin_id = Some(OriginId::new(origin_id));
        }

        if let Some(project) = overrides.project.filter(|s| !s.is_empty()) {
            self.project = Some(project);
        }

        if let Some(endpoint) = overrides.endpoint {
            let mut provider = self
                .provider
                .take()
                .unwrap_or_else(|| ProviderConfig::new(endpoint.clone()));
            provider.endpoint = endpoint;
            self.provider = Some(provider);
        }

        if let Some(token) = overrides.token {
            let provider = self.provider.as_mut().ok_or(Error::MissingInput("endpoint"))?;
            provider.token = Some(EnvValue::Literal(token));
        }

        if let Some(poll_interval) = overrides.poll_interval {
            self.watch.poll_interval = poll_interval;
        }

        if let Some(max_wait) = overrides.max_wait {
            self.watch.max_wait = max_wait;
        }

        self.strict_origin |= overrides.strict_origin;

        Ok(self)
    }

    /// The project name: the explicit setting, else the repository part of
    /// an `owner/repo` slug.
    pub fn project_name(&self, repository: Option<&str>) -> Result<ProjectName> {
        let invalid = |e: crate::types::ProjectNameError| Error::InvalidInput {
            name: "project",
            reason: e.to_string(),
        };

        match (&self.project, repository) {
            (Some(project), _) => ProjectName::new(project).map_err(invalid),
            (None, Some(repository)) => ProjectName::from_repository(repository).map_err(invalid),
            (None, None) => Err(Error::MissingInput("project")),
        }
    }

    pub fn origin_policy(&self) -> OriginPolicy {
        if self.strict_origin {
            OriginPolicy::Require
        } else {
            OriginPolicy::PassThrough
        }
    }

    /// Assemble everything a promotion run needs for `git_ref`.
    pub fn promotion_request(
        &self,
        git_ref: &str,
        repository: Option<&str>,
    ) -> Result<PromotionRequest> {
        let origin_id = self
            .origin_id
            .clone()
            .ok_or(Error::MissingInput("origin-id"))?;

        Ok(PromotionRequest {
            git_ref: git_ref.to_string(),
            distributions: self.distributions.clone(),
            origin_id,
            project: self.project_name(repository)?,
            watch: self.watch.to_watch_config()?,
            origin_policy: self.origin_policy(),
        })
    }

    pub fn provider_config(&self) -> Result<&ProviderConfig> {
        self.provider.as_ref().ok_or(Error::MissingInput("endpoint"))
    }
}

/// Parse the environment → distribution map. JSON is accepted since it is
/// valid YAML.
pub fn parse_distributions(text: &str) -> Result<HashMap<String, DistributionId>> {
    serde_yaml::from_str(text).map_err(|e| Error::InvalidInput {
        name: "distributions",
        reason: e.to_string(),
    })
}

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, template_yaml())?;
    Ok(())
}

fn template_yaml() -> &'static str {
    r#"# Environment name (second segment of the ref) -> distribution ID
distributions:
  prod: E1EXAMPLE
  staging: E2EXAMPLE
origin_id: S3-site
# project: my-site   # defaults to the repository name
provider:
  endpoint: http://127.0.0.1:8080
  token:
    env: EDGEFLIP_TOKEN
watch:
  poll_interval: 15s
  max_wait: 20m
strict_origin: false
"#
}
