//! `tracing` subscriber setup.
//!
//! Events go to stderr so stdout stays clean for command output such as
//! `herbtrace get`. The filter comes from `RUST_LOG`; when it is unset,
//! both HerbTrace crates log at `info`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "herbtrace=info,herbtrace_core=info";

pub fn init() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(())
}
