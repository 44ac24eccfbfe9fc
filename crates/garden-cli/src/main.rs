use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "garden")]
#[command(about = "Causality garden - grow, cluster and reflect on causal trees", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bundled sample session as export JSON
    Sample {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a session's tree with cluster labels
    Tree {
        /// Exported session JSON
        file: PathBuf,
    },
    /// Print a session's statistics and cluster sizes
    Stats {
        file: PathBuf,
        /// Leaves shallower than this count as shallow
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Analyse a participant response without adding it
    Analyse {
        /// The response text
        response: String,
    },
    /// Ask for cluster suggestions and apply them
    Cluster {
        file: PathBuf,
        /// Write the updated session here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate the closing reflection
    Reflect {
        file: PathBuf,
        /// Write the updated session here
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_env("GARDEN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Sample { out } => commands::sample::run(out.as_deref())?,
        Commands::Tree { file } => commands::tree::run(config, &file).await?,
        Commands::Stats { file, depth } => commands::stats::run(config, &file, depth).await?,
        Commands::Analyse { response } => commands::analyse::run(config, &response).await?,
        Commands::Cluster { file, out } => {
            commands::cluster::run(config, &file, out.as_deref()).await?
        }
        Commands::Reflect { file, out } => {
            commands::reflect::run(config, &file, out.as_deref()).await?
        }
    }

    Ok(())
}
