//! ecobee Prometheus Exporter
//!
//! A Prometheus metrics exporter for a single ecobee thermostat.
//!
//! # Overview
//!
//! This exporter polls the ecobee cloud API on a cron schedule (or once at
//! startup), copies equipment state, setpoints, temperatures and remote sensor
//! readings into Prometheus gauges, and serves them for scraping.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐       HTTPS          ┌──────────────┐
//! │   ecobee    │ ◄─────────────────►  │   Exporter   │
//! │  cloud API  │   JSON selection     │              │
//! └─────────────┘                      │  ┌────────┐  │      HTTP      ┌────────────┐
//!                                      │  │Schedule│  │ ◄────────────► │ Prometheus │
//!                                      │  └────────┘  │   /metrics     └────────────┘
//!                                      │  ┌────────┐  │
//!                                      │  │Metrics │  │
//!                                      │  └────────┘  │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`ecobee`] - HTTP client and API type definitions
//! - [`collectors`] - Mapping from API records to metrics
//! - [`metrics`] - Prometheus metric definitions
//! - [`schedule`] - Cron expressions and the collection timer
//! - [`server`] - HTTP server and startup sequence
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use ecobee_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Failure Model
//!
//! Every upstream or startup failure is fatal. The exporter expects a process
//! supervisor to restart it.

pub mod collectors;
pub mod config;
pub mod ecobee;
pub mod error;
pub mod metrics;
pub mod schedule;
pub mod server;
