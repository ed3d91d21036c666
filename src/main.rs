// ABOUTME: Entry point for the edgeflip CLI application.
// ABOUTME: Parses arguments, sets up logging, and awaits the selected command to completion.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, InputArgs};
use edgeflip::config::{self, Config};
use edgeflip::error::Result;
use edgeflip::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise stage logs at info, or debug with --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else if cli.quiet || cli.json {
            EnvFilter::new("warn")
        } else {
            EnvFilter::new("edgeflip=info,warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let in_actions = env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");
    let mut output = Output::new(OutputMode::select(cli.quiet, cli.json, in_actions));

    if let Err(e) = run(cli.command, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, output: &mut Output) -> Result<()> {
    match command {
        Commands::Init { force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Promote(args) => {
            let config = load_config(&args.inputs)?.with_overrides(args.overrides())?;
            commands::promote(&config, &args.git_ref, args.repository.as_deref(), output).await
        }
        Commands::Resolve(args) => {
            let config = load_config(&args.inputs)?.with_overrides(args.overrides())?;
            commands::resolve(&config, &args.git_ref, args.repository.as_deref(), output)
        }
        Commands::Status {
            environment,
            inputs,
        } => {
            let config = load_config(&inputs)?.with_overrides(inputs.overrides())?;
            commands::status(&config, &environment, output).await
        }
    }
}

/// Load the explicit config file, or discover one in the working directory.
fn load_config(inputs: &InputArgs) -> Result<Config> {
    match &inputs.config {
        Some(path) => Config::load(path),
        None => Config::discover(&env::current_dir()?),
    }
}
