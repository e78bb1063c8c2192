//! HTTP Server and Metrics Collection
//!
//! This module implements the Prometheus exporter HTTP server and wires the
//! collector to the configured schedule.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server exposing `/metrics`
//! - **Collection**: either one cycle before the server starts, or a cron-driven
//!   loop running alongside the server
//! - **State Management**: the `MetricsCollector` is shared with the handler;
//!   its gauges are atomics, so scrapes never wait on a collection
//!
//! # Endpoints
//!
//! - `GET /metrics` - Prometheus metrics in text format
//!
//! # Error Handling
//!
//! Nothing is retried. A failed collection, an address that can't be bound, or
//! a server error ends `start` with an error and the process exits.

use crate::collectors::{self, CollectionContext};
use crate::config::Config;
use crate::ecobee::{EcobeeClient, ThermostatApi};
use crate::error::ExporterError;
use crate::metrics::MetricsCollector;
use crate::schedule::{self, Schedule};
use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::IntoFuture;
use tokio::net::TcpListener;
use tracing::{error, info};

pub async fn start(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let client = EcobeeClient::new(&config.ecobee)?;
    run(config, &client).await
}

/// Runs the exporter against any [`ThermostatApi`] implementation.
pub async fn run(config: Config, client: &dyn ThermostatApi) -> anyhow::Result<()> {
    config.validate()?;
    let schedule = config.schedule.schedule()?;
    let addr = config.server.bind_addr()?;
    let metrics = MetricsCollector::new(&config.server.namespace)
        .context("Failed to register metrics")?;

    let ctx = CollectionContext {
        client,
        metrics: &metrics,
        thermostat: &config.ecobee.thermostat,
    };

    match schedule {
        Schedule::Once => {
            collectors::collect_metrics(&ctx)
                .await
                .context("Failed to collect metrics")?;

            let listener = bind(&addr).await?;
            serve(listener, metrics.clone()).await?;
        }
        Schedule::Cron(cron) => {
            let listener = bind(&addr).await?;
            info!("Collecting metrics on schedule \"{}\"", cron);

            let collection =
                schedule::run_on_schedule(&cron, || collectors::collect_metrics(&ctx));

            tokio::select! {
                result = serve(listener, metrics.clone()) => result?,
                result = collection => result.context("Failed to collect metrics")?,
            }
        }
    }

    Ok(())
}

async fn bind(addr: &str) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ExporterError::Server(format!("failed to bind {}: {}", addr, e)))?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);
    Ok(listener)
}

/// Builds the exporter's router
pub fn router(metrics: MetricsCollector) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

/// Serves `/metrics` on `listener` until the server fails
pub async fn serve(listener: TcpListener, metrics: MetricsCollector) -> anyhow::Result<()> {
    axum::serve(listener, router(metrics))
        .into_future()
        .await
        .context("HTTP server failed")
}

async fn metrics_handler(State(metrics): State<MetricsCollector>) -> Response {
    match metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}
