//! bizfly-install - verified installer for bizflyctl

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bizfly_cli::ui::Output;
use bizfly_cli::{Cli, Commands, cmd};
use bizfly_core::InstallError;
use bizfly_schema::BIZFLYCTL;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(cli.quiet);

    match run(cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let stage = err.downcast_ref::<InstallError>().map(InstallError::stage);
            output.error(stage, &format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let formula = &BIZFLYCTL;

    match cli.command {
        None => cmd::install::install(formula, &cli.install, output).await,
        Some(Commands::Install(args)) => cmd::install::install(formula, &args, output).await,
        Some(Commands::Resolve { platform, json }) => {
            cmd::resolve::resolve(formula, &platform, json)
        }
        Some(Commands::Platforms { json }) => cmd::platforms::platforms(formula, json),
        Some(Commands::Info) => cmd::info::info(formula),
        Some(Commands::Hash { files }) => cmd::hash::hash(&files),
    }
}
