// ABOUTME: Status command implementation.
// ABOUTME: Reads one distribution's version tag and deployment status.

use edgeflip::config::Config;
use edgeflip::error::{Error, Result};
use edgeflip::output::Output;
use edgeflip::promote::PromoteError;
use edgeflip::provider::DistributionOps;

pub async fn status(config: &Config, environment: &str, output: &Output) -> Result<()> {
    let distribution = config
        .distributions
        .get(environment)
        .ok_or_else(|| Error::InvalidInput {
            name: "environment",
            reason: format!("no distribution ID defined for '{}'", environment),
        })?;

    let provider = config.provider_config()?.build()?;
    let snapshot = provider
        .get_status(distribution)
        .await
        .map_err(PromoteError::from)?;

    output.progress(&format!("Distribution: {}", distribution));
    output.progress(&format!("Version:      {}", snapshot.version));
    output.success(&format!("Status: {}", snapshot.status));
    Ok(())
}
