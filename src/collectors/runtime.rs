//! Runtime Metrics
//!
//! # Metrics Produced
//! - `desired_heat` - Heat setpoint in degrees
//! - `desired_cool` - Cool setpoint in degrees
//! - `temperature` - Temperature at the thermostat in degrees

use super::tenths_to_degrees;
use crate::ecobee::types::Runtime;
use crate::metrics::MetricsCollector;

pub fn update_runtime_metrics(metrics: &MetricsCollector, runtime: &Runtime) {
    metrics
        .desired_heat
        .set(tenths_to_degrees(runtime.desired_heat));
    metrics
        .desired_cool
        .set(tenths_to_degrees(runtime.desired_cool));
    metrics
        .temperature
        .set(tenths_to_degrees(runtime.actual_temperature));
}
