//! # HerbTrace CLI (`herbtrace`)
//!
//! ## Usage
//!
//! ```bash
//! herbtrace --config ./config/herbtrace.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `herbtrace init` | Create the SQLite database and schema |
//! | `herbtrace get <package_id>` | Print the provenance tree for a package |
//! | `herbtrace serve` | Start the HTTP server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use herbtrace::{config, get, logging, migrate, server};

/// HerbTrace — trace an Ayurvedic product from package back to farm.
#[derive(Parser)]
#[command(
    name = "herbtrace",
    about = "HerbTrace — Ayurvedic herb traceability service",
    version,
    long_about = "HerbTrace joins packaging, retailer, farm batch, herb and processing records \
    by business key and serves the resulting provenance tree over HTTP."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/herbtrace.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file, the `documents` table and the
    /// business-key indexes. Safe to run repeatedly.
    Init,

    /// Resolve a package and print its provenance tree as JSON.
    ///
    /// Exits with status 1 if the package does not exist.
    Get {
        /// Package identifier (e.g. `PKG001`).
        package_id: String,
    },

    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves `GET /get_package/{package_id}`
    /// and `GET /health` until interrupted.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init()?;

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Get { package_id } => {
            get::run_get(&cfg, &package_id).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
