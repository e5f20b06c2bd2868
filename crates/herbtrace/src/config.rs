//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/herbtrace.sqlite"
//! max_connections = 5
//!
//! [server]
//! bind = "0.0.0.0:8001"
//! allowed_origins = ["*"]
//!
//! [api]
//! title = "HerbTrace API"
//! description = "Ayurvedic Herb Traceability System"
//! version = "1.0.0"
//! ```
//!
//! Only `[db].path` and `[server].bind` are required.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    /// CORS origins. `"*"` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl ServerConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Service metadata reported by `GET /health` and the startup log.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            version: default_version(),
        }
    }
}

fn default_title() -> String {
    "HerbTrace API".to_string()
}
fn default_description() -> String {
    "Ayurvedic Herb Traceability System".to_string()
}
fn default_version() -> String {
    "1.0.0".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.db.max_connections == 0 {
        anyhow::bail!("db.max_connections must be >= 1");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if config.server.allowed_origins.is_empty() {
        anyhow::bail!("server.allowed_origins must not be empty (use [\"*\"] to allow any origin)");
    }

    for origin in &config.server.allowed_origins {
        if origin != "*" && axum::http::HeaderValue::from_str(origin).is_err() {
            anyhow::bail!("server.allowed_origins contains an invalid origin: '{}'", origin);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn test_minimal_config_defaults() {
        let cfg = parse(
            r#"
[db]
path = "/tmp/h.sqlite"

[server]
bind = "127.0.0.1:8001"
"#,
        )
        .unwrap();
        assert_eq!(cfg.db.max_connections, 5);
        assert!(cfg.server.allows_any_origin());
        assert_eq!(cfg.api.title, "HerbTrace API");
        assert_eq!(cfg.api.version, "1.0.0");
    }

    #[test]
    fn test_explicit_origins() {
        let cfg = parse(
            r#"
[db]
path = "/tmp/h.sqlite"

[server]
bind = "127.0.0.1:8001"
allowed_origins = ["http://localhost:19006", "https://herbtrace.example"]

[api]
title = "Trace"
"#,
        )
        .unwrap();
        assert!(!cfg.server.allows_any_origin());
        assert_eq!(cfg.server.allowed_origins.len(), 2);
        assert_eq!(cfg.api.title, "Trace");
        assert_eq!(cfg.api.description, "Ayurvedic Herb Traceability System");
    }

    #[test]
    fn test_rejects_zero_connections() {
        let err = parse(
            r#"
[db]
path = "/tmp/h.sqlite"
max_connections = 0

[server]
bind = "127.0.0.1:8001"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("max_connections"));
    }

    #[test]
    fn test_rejects_empty_origins() {
        let err = parse(
            r#"
[db]
path = "/tmp/h.sqlite"

[server]
bind = "127.0.0.1:8001"
allowed_origins = []
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("allowed_origins"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/herbtrace.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
