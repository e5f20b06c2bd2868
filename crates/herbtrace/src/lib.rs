//! # HerbTrace
//!
//! **Ayurvedic herb traceability: from retail package back to the farm.**
//!
//! HerbTrace answers one question over HTTP: given a package identifier,
//! where did everything in it come from? It joins five document
//! collections by business key and returns a single provenance tree.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────────┐   ┌─────────────┐
//! │ HTTP / CLI   │──▶│ Provenance resolver │──▶│ SQLite JSON │
//! │ (axum, clap) │   │ (herbtrace-core)    │   │ documents   │
//! └──────────────┘   └────────────────────┘   └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! herbtrace init                 # create database schema
//! herbtrace get PKG001           # print provenance JSON
//! herbtrace serve                # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Database schema (idempotent) |
//! | [`sqlite_store`] | SQLite-backed `DocumentStore` |
//! | [`get`] | `herbtrace get` command |
//! | [`server`] | HTTP server (Axum) with CORS |
//! | [`logging`] | `tracing` subscriber setup |

pub mod config;
pub mod db;
pub mod get;
pub mod logging;
pub mod migrate;
pub mod server;
pub mod sqlite_store;

pub use herbtrace_core::{label, models, provenance, store};
