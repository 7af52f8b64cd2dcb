mod export;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::export::ExportArgs;

#[derive(Debug, Parser)]
#[command(name = "sdash")]
#[command(about = "Social dashboard report exporter")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a report and write it to disk
    Export {
        #[command(flatten)]
        args: ExportArgs,
        /// Directory to write the report into (defaults to `SDASH_OUTPUT_DIR`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a report in memory and print a summary instead of saving it
    Preview {
        #[command(flatten)]
        args: ExportArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("sdash: nothing to do, see `sdash --help`");
        return Ok(());
    };

    let config = sdash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Export { args, out } => {
            export::run_export_command(&config, &args, out.as_deref()).await
        }
        Commands::Preview { args } => export::run_preview_command(&config, &args).await,
    }
}

#[cfg(test)]
mod tests;
