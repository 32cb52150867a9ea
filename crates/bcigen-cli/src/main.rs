mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bcigen", about = "Write the build recipes of BCI container images")]
#[command(version)]
struct Cli {
    /// Additional image definitions (TOML file with [[image]] tables)
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write all files required to build an image into a directory
    Write {
        /// Catalog key of the image, e.g. python-3.11-sp6
        image: String,
        /// Directory the files are written to
        destination: PathBuf,
    },
    /// List all image keys, grouped by OS version
    List,
    /// Show the derived properties of an image as JSON
    Show {
        /// Catalog key of the image
        image: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let catalog = cli.catalog.as_deref();

    match cli.command {
        Commands::Write { image, destination } => {
            commands::write(catalog, &image, &destination).await?
        }
        Commands::List => commands::list(catalog)?,
        Commands::Show { image } => commands::show(catalog, &image)?,
    }

    Ok(())
}
