// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Pipeline inputs fall back to the CI environment variables that carry them.

use clap::{Args, Parser, Subcommand};
use edgeflip::config::Overrides;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "edgeflip")]
#[command(about = "Promote a static release by repointing a CDN distribution origin")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an edgeflip.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Repoint the origin, wait for deployment, and invalidate the cache
    Promote(PromoteArgs),

    /// Show what a ref would promote without calling the provider
    Resolve(PromoteArgs),

    /// Show a distribution's version tag and deployment status
    Status {
        /// Environment whose distribution to inspect
        #[arg(short, long)]
        environment: String,

        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(Args)]
pub struct PromoteArgs {
    /// Triggering ref, e.g. refs/heads/deploy/prod/2024.05.01
    #[arg(long = "ref", env = "GITHUB_REF")]
    pub git_ref: String,

    /// Repository slug (owner/repo) used to derive the project name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Origin ID to repoint
    #[arg(long, env = "INPUT_ORIGINID")]
    pub origin_id: Option<String>,

    /// Project name, overriding the repository name
    #[arg(long, env = "INPUT_PROJECTKEY")]
    pub project: Option<String>,

    /// Seconds or human duration between status polls (e.g. 15s)
    #[arg(long, value_parser = parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Maximum time to wait for deployment (e.g. 20m)
    #[arg(long, value_parser = parse_duration)]
    pub max_wait: Option<Duration>,

    /// Fail instead of submitting an unchanged config when the origin is missing
    #[arg(long)]
    pub strict_origin: bool,

    #[command(flatten)]
    pub inputs: InputArgs,
}

#[derive(Args)]
pub struct InputArgs {
    /// Environment to distribution ID map, as JSON or YAML
    #[arg(long, env = "INPUT_DISTRIBUTIONS")]
    pub distributions: Option<String>,

    /// Provider gateway base URL
    #[arg(long, env = "EDGEFLIP_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Provider API token
    #[arg(long, env = "EDGEFLIP_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file (defaults to edgeflip.yml in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl PromoteArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            origin_id: self.origin_id.clone(),
            project: self.project.clone(),
            poll_interval: self.poll_interval,
            max_wait: self.max_wait,
            strict_origin: self.strict_origin,
            ..self.inputs.overrides()
        }
    }
}

impl InputArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            distributions: self.distributions.clone(),
            endpoint: self.endpoint.clone(),
            token: self.token.clone(),
            ..Overrides::default()
        }
    }
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    if let Ok(secs) = value.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime_serde::re::humantime::parse_duration(value).map_err(|e| e.to_string())
}
