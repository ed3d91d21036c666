// ABOUTME: Promote command implementation.
// ABOUTME: Runs the full promotion against the configured provider and reports the outcome.

use edgeflip::config::Config;
use edgeflip::diagnostics::Diagnostics;
use edgeflip::error::Result;
use edgeflip::output::Output;
use edgeflip::promote::{self, Outcome};
use edgeflip::release::{self, Resolution, SkipReason};

/// Promote the release named by `git_ref`.
///
/// A ref that resolves to no distribution ends the run before origin,
/// project, or provider settings are looked at.
pub async fn promote(
    config: &Config,
    git_ref: &str,
    repository: Option<&str>,
    output: &mut Output,
) -> Result<()> {
    output.start_timer();
    if let Resolution::Skip(reason) = release::resolve(git_ref, &config.distributions) {
        report_skip(&reason, output);
        return Ok(());
    }

    let request = config.promotion_request(git_ref, repository)?;
    let provider = config.provider_config()?.build()?;
    let mut diag = Diagnostics::default();

    let outcome = promote::execute(&provider, &request, &mut diag).await;

    // Emit collected warnings before the result, even on failure
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    match outcome? {
        Outcome::Skipped(reason) => report_skip(&reason, output),
        Outcome::Promoted(report) => {
            output.progress(&format!(
                "  → Distribution: {} ({})",
                report.distribution, report.release
            ));
            if let Some(previous) = &report.previous_path {
                output.progress(&format!("  → Old origin path: {}", previous));
                output.progress(&format!("  → New origin path: {}", report.origin_path));
            }
            output.progress(&format!(
                "  → Deployed version {} after {} poll(s)",
                report.version, report.polls
            ));
            output.progress(&format!(
                "  → Invalidated {} (reference {})",
                report.invalidation.paths.join(", "),
                report.invalidation.caller_reference
            ));
            output.success("Done!");
        }
    }

    Ok(())
}

fn report_skip(reason: &SkipReason, output: &Output) {
    if let SkipReason::MalformedRef { .. } = reason {
        output.warning(&reason.to_string());
    }
    output.success(&format!("Exiting. Nothing to promote: {}", reason));
}
