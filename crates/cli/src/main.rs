use clap::Parser;
use std::path::PathBuf;

mod commands;
mod execute;
mod logging;

use commands::Commands;

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(
    about = "Run containerized pipeline tasks with injected connection environments",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Manifest path (defaults to discovering dockhand.toml upwards from the
    /// working directory, or the DOCKHAND_MANIFEST variable)
    #[arg(long, global = true, value_name = "PATH")]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init().map_err(|e| anyhow::anyhow!(e))?;

    let cli = Cli::parse();
    execute::execute_command(cli.command, cli.manifest).await
}
