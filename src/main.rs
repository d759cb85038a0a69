use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    algodash::logging::init().context("init logging")?;

    let cli = algodash::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        algodash::cli::Command::Serve(args) => {
            algodash::app::run(args).await.context("serve")?;
        }
        algodash::cli::Command::Render(args) => {
            algodash::page::run(args).await.context("render")?;
        }
    }

    Ok(())
}
