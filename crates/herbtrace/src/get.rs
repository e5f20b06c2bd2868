//! Package provenance lookup from the command line.
//!
//! `herbtrace get <package_id>` runs the same resolver as
//! `GET /get_package/{package_id}` and prints the JSON tree to stdout.

use anyhow::Result;

use herbtrace_core::{resolve, ProvenanceResult};

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// Resolve a package against the configured database.
///
/// Returns `Ok(None)` if the package does not exist.
pub async fn get_package(config: &Config, package_id: &str) -> Result<Option<ProvenanceResult>> {
    let store = SqliteStore::new(db::connect(config).await?);
    let result = resolve(&store, package_id).await;
    store.close().await;
    result
}

/// CLI entry point — resolves the package and prints it as pretty JSON.
pub async fn run_get(config: &Config, package_id: &str) -> Result<()> {
    let provenance = match get_package(config, package_id).await? {
        Some(p) => p,
        None => {
            eprintln!("Error: Package not found: {}", package_id);
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&provenance)?);
    Ok(())
}
