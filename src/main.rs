mod cli;
mod commands;
mod export;
mod mcp;
mod page_range;
mod pdf;
mod settings;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use settings::SettingsStore;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Split {
            path,
            pages,
            output_dir,
        } => {
            let mut store = SettingsStore::open_default();
            commands::split::run(&path, &pages, output_dir.as_deref(), &mut store)?;
        }
        Commands::Merge { inputs, output_dir } => {
            let mut store = SettingsStore::open_default();
            commands::merge::run(&inputs, output_dir.as_deref(), &mut store)?;
        }
        Commands::Rotate {
            path,
            degrees,
            pages,
            output_dir,
        } => {
            let mut store = SettingsStore::open_default();
            commands::rotate::run(
                &path,
                degrees,
                pages.as_deref(),
                output_dir.as_deref(),
                &mut store,
            )?;
        }
        Commands::Config { action } => {
            let mut store = SettingsStore::open_default();
            commands::config::run(&action, &mut store)?;
        }
    }

    Ok(())
}
