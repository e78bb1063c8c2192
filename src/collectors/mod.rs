//! Metrics Collectors
//!
//! One collection cycle: fetch the thermostat summary and detail records from
//! the ecobee API and copy the fields the exporter knows about into gauges.
//!
//! # Architecture
//!
//! - [`collect_metrics`] does both API calls, then hands the records to the
//!   per-category update functions
//! - [`equipment`], [`runtime`] and [`sensor`] map one record type each onto
//!   the gauges and never touch the network
//!
//! # Error Handling
//!
//! Every API failure, and a summary that does not contain the configured
//! thermostat, is returned to the caller, which treats it as fatal. Sensor
//! readings that fail to parse are skipped and leave the previous value in place.

use crate::ecobee::{Selection, ThermostatApi};
use crate::error::{ExporterError, Result};
use crate::metrics::MetricsCollector;
use tracing::info;

/// Shared context passed to the collectors
#[derive(Clone, Copy)]
pub struct CollectionContext<'a> {
    /// ecobee API client for querying endpoints
    pub client: &'a dyn ThermostatApi,
    /// Metrics collector for updating Prometheus metrics
    pub metrics: &'a MetricsCollector,
    /// Identifier of the thermostat to collect
    pub thermostat: &'a str,
}

/// Runs one collection cycle against the configured thermostat
///
/// # Errors
///
/// * [`ExporterError::MissingThermostat`] - the summary has no entry for the thermostat
/// * any error from the API client
pub async fn collect_metrics(ctx: &CollectionContext<'_>) -> Result<()> {
    let selection = Selection::thermostat(ctx.thermostat).with_equipment_status();
    let mut summaries = ctx.client.thermostat_summary(&selection).await?;
    let summary = summaries
        .remove(ctx.thermostat)
        .ok_or_else(|| ExporterError::MissingThermostat(ctx.thermostat.to_string()))?;

    let thermostat = ctx.client.thermostat(ctx.thermostat).await?;

    sensor::update_sensor_metrics(ctx.metrics, &thermostat.remote_sensors);
    equipment::update_equipment_metrics(ctx.metrics, &summary.equipment_status);
    runtime::update_runtime_metrics(ctx.metrics, &thermostat.runtime);

    info!(
        "Collected metrics for thermostat {} ({} sensors)",
        ctx.thermostat,
        thermostat.remote_sensors.len()
    );
    Ok(())
}

/// Converts a tenths-of-a-degree reading into degrees
pub fn tenths_to_degrees(tenths: i64) -> f64 {
    tenths as f64 / 10.0
}

// Collector modules
pub mod equipment;
pub mod runtime;
pub mod sensor;

pub use equipment::update_equipment_metrics;
pub use runtime::update_runtime_metrics;
pub use sensor::update_sensor_metrics;
