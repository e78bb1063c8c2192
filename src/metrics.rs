//! Prometheus Metrics Definitions
//!
//! This module defines all Prometheus metrics exposed by the ecobee exporter.
//!
//! # Metric Categories
//!
//! ## Equipment
//! - Fan, cooling stages 1-2 and auxiliary heat stages 1-3 (1=running, 0=off)
//!
//! ## Runtime
//! - Desired heat and cool setpoints and the thermostat's own temperature, in degrees
//!
//! ## Remote Sensors
//! - Temperature, humidity and occupancy, labeled by sensor name
//!
//! # Metric Types
//!
//! - **Gauge**: Current value (e.g., fan state, temperature)
//! - **GaugeVec**: Gauge with labels (e.g., sensor temperature labeled by sensor name)
//!
//! All metrics use a configurable namespace prefix, `ecobee_` by default.

use crate::error::Result;
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Metrics collector for a single ecobee thermostat
///
/// Clones share the same registry and gauges.
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,

    // Equipment metrics
    pub fan: Arc<Gauge>,
    pub comp_cool1: Arc<Gauge>,
    pub comp_cool2: Arc<Gauge>,
    pub aux_heat1: Arc<Gauge>,
    pub aux_heat2: Arc<Gauge>,
    pub aux_heat3: Arc<Gauge>,

    // Runtime metrics
    pub desired_heat: Arc<Gauge>,
    pub desired_cool: Arc<Gauge>,
    pub temperature: Arc<Gauge>,

    // Remote sensor metrics
    pub sensor_temperature: Arc<GaugeVec>,
    pub sensor_occupied: Arc<GaugeVec>,
    pub sensor_humidity: Arc<GaugeVec>,
}

impl MetricsCollector {
    /// Creates the metrics on a fresh registry under `namespace`
    pub fn new(namespace: &str) -> Result<Self> {
        Self::with_registry(Registry::new(), namespace)
    }

    /// Creates the metrics and registers them on `registry`.
    ///
    /// Fails if any of the names is already registered there.
    pub fn with_registry(registry: Registry, namespace: &str) -> Result<Self> {
        let gauge =
            |name: &str, help: &str| Gauge::with_opts(Opts::new(name, help).namespace(namespace));
        let sensor_gauge = |name: &str, help: &str| {
            GaugeVec::new(Opts::new(name, help).namespace(namespace), &["name"])
        };

        // Equipment metrics
        let fan = gauge("fan", "Whether the fan is running (1=on, 0=off)")?;
        let comp_cool1 = gauge(
            "comp_cool1",
            "Whether cooling stage 1 is running (1=on, 0=off)",
        )?;
        let comp_cool2 = gauge(
            "comp_cool2",
            "Whether cooling stage 2 is running (1=on, 0=off)",
        )?;
        let aux_heat1 = gauge(
            "aux_heat1",
            "Whether auxiliary heat stage 1 is running (1=on, 0=off)",
        )?;
        let aux_heat2 = gauge(
            "aux_heat2",
            "Whether auxiliary heat stage 2 is running (1=on, 0=off)",
        )?;
        let aux_heat3 = gauge(
            "aux_heat3",
            "Whether auxiliary heat stage 3 is running (1=on, 0=off)",
        )?;

        // Runtime metrics
        let desired_heat = gauge("desired_heat", "Desired heat setpoint in degrees")?;
        let desired_cool = gauge("desired_cool", "Desired cool setpoint in degrees")?;
        let temperature = gauge("temperature", "Thermostat temperature in degrees")?;

        // Remote sensor metrics
        let sensor_temperature =
            sensor_gauge("sensor_temperature", "Remote sensor temperature in degrees")?;
        let sensor_occupied = sensor_gauge(
            "sensor_occupied",
            "Whether the remote sensor detects presence (1=occupied, 0=empty)",
        )?;
        let sensor_humidity = sensor_gauge(
            "sensor_humidity",
            "Remote sensor relative humidity in percent",
        )?;

        // Register all metrics
        registry.register(Box::new(fan.clone()))?;
        registry.register(Box::new(comp_cool1.clone()))?;
        registry.register(Box::new(comp_cool2.clone()))?;
        registry.register(Box::new(aux_heat1.clone()))?;
        registry.register(Box::new(aux_heat2.clone()))?;
        registry.register(Box::new(aux_heat3.clone()))?;
        registry.register(Box::new(desired_heat.clone()))?;
        registry.register(Box::new(desired_cool.clone()))?;
        registry.register(Box::new(temperature.clone()))?;
        registry.register(Box::new(sensor_temperature.clone()))?;
        registry.register(Box::new(sensor_occupied.clone()))?;
        registry.register(Box::new(sensor_humidity.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            fan: Arc::new(fan),
            comp_cool1: Arc::new(comp_cool1),
            comp_cool2: Arc::new(comp_cool2),
            aux_heat1: Arc::new(aux_heat1),
            aux_heat2: Arc::new(aux_heat2),
            aux_heat3: Arc::new(aux_heat3),
            desired_heat: Arc::new(desired_heat),
            desired_cool: Arc::new(desired_cool),
            temperature: Arc::new(temperature),
            sensor_temperature: Arc::new(sensor_temperature),
            sensor_occupied: Arc::new(sensor_occupied),
            sensor_humidity: Arc::new(sensor_humidity),
        })
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Sets a gauge to 1 for `true` and 0 for `false`
    pub fn set_bool_metric(&self, gauge: &Gauge, value: bool) {
        gauge.set(if value { 1.0 } else { 0.0 });
    }
}
