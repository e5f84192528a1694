mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loom")]
#[command(about = "Declare and synthesize the platform deployment stack", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the deployment configuration
    Validate {
        /// Deployment file (skips discovery)
        #[arg(short, long, env = "CLOUDLOOM_CONFIG_PATH")]
        config: Option<PathBuf>,
    },
    /// Synthesize the deployment manifest
    Synth {
        /// Deployment file (skips discovery)
        #[arg(short, long, env = "CLOUDLOOM_CONFIG_PATH")]
        config: Option<PathBuf>,
        /// Manifest output path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the version
    Version,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Version => {
            println!("cloudloom {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Validate { config } => commands::validate::handle(config.as_deref()),
        Commands::Synth { config, out } => {
            commands::synth::handle(config.as_deref(), out.as_deref())
        }
    }
}
