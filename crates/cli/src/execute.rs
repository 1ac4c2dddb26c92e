use crate::commands::Commands;
use clap::CommandFactory;
use dockhand_config::{Config, ConfigLoader};
use dockhand_core::{Error, Result, DOCKHAND_MANIFEST_VAR};
use std::path::PathBuf;

/// Dispatch a parsed subcommand
pub async fn execute_command(
    command: Commands,
    manifest: Option<PathBuf>,
) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            task,
            args,
            interval_start,
            interval_end,
            run_id,
            dry_run,
        } => {
            let config = load_config(manifest, true).await?;
            crate::commands::run::execute(
                config,
                task,
                args,
                interval_start,
                interval_end,
                run_id,
                dry_run,
            )
            .await?;
        }
        Commands::List { verbose } => {
            let config = load_config(manifest, true).await?;
            crate::commands::list::execute(&config, verbose)?;
        }
        Commands::Env { task, show_secrets } => {
            let config = load_config(manifest, true).await?;
            crate::commands::env::execute(&config, &task, show_secrets)?;
        }
        Commands::Check => {
            let config = load_config(manifest, false).await?;
            crate::commands::check::execute(&config)?;
        }
        Commands::Init { force } => {
            crate::commands::init::execute(force).await?;
        }
        Commands::Completion { shell } => {
            let mut cmd = crate::Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }
    Ok(())
}

/// Load configuration, honoring the --manifest flag and DOCKHAND_MANIFEST
async fn load_config(manifest: Option<PathBuf>, validate: bool) -> Result<Config> {
    let manifest = manifest.or_else(|| std::env::var(DOCKHAND_MANIFEST_VAR).ok().map(PathBuf::from));

    let mut loader = ConfigLoader::new().validate(validate);
    if let Some(path) = manifest {
        loader = loader.manifest_path(path);
    }
    let config = loader.load().await?;

    if !config.has_manifest() {
        return Err(Error::configuration(
            "no dockhand.toml found; run 'dockhand init' to create one",
        ));
    }
    Ok(config)
}
