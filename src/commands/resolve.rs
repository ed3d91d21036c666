// ABOUTME: Resolve command implementation.
// ABOUTME: Shows what a ref would promote without contacting the provider.

use edgeflip::config::Config;
use edgeflip::distribution::release_origin_path;
use edgeflip::error::Result;
use edgeflip::output::Output;
use edgeflip::release::{self, Resolution};

pub fn resolve(
    config: &Config,
    git_ref: &str,
    repository: Option<&str>,
    output: &Output,
) -> Result<()> {
    let target = match release::resolve(git_ref, &config.distributions) {
        Resolution::Promote(target) => target,
        Resolution::Skip(reason) => {
            output.success(&format!("Nothing to promote: {}", reason));
            return Ok(());
        }
    };

    let project = config.project_name(repository)?;

    output.progress(&format!("Environment:      {}", target.release.environment()));
    output.progress(&format!("Distribution:     {}", target.distribution));
    if let Some(origin_id) = &config.origin_id {
        output.progress(&format!("Origin:           {}", origin_id));
    }
    output.progress(&format!(
        "Origin path:      {}",
        release_origin_path(&project, &target.release)
    ));
    output.progress(&format!("Caller reference: {}", target.release.tag()));
    output.success(&format!(
        "Would promote {} to {}",
        target.release, target.distribution
    ));
    Ok(())
}
