//! Remote Sensor Metrics Collector
//!
//! Fans every capability of every remote sensor out into the gauge vector for
//! its type, labeled by sensor name.
//!
//! # Metrics Produced
//! - `sensor_temperature` - Temperature in degrees (reported in tenths)
//!   - Labels: name
//! - `sensor_humidity` - Relative humidity in percent
//!   - Labels: name
//! - `sensor_occupied` - Presence detected (1=occupied, 0=empty)
//!   - Labels: name
//!
//! Capabilities of any other type are ignored. Temperature and humidity values
//! that don't parse as numbers (ecobee reports `"unknown"` for a sensor that
//! has dropped off) are skipped, so the gauge keeps its last value.

use crate::ecobee::types::{Capability, RemoteSensor};
use crate::metrics::MetricsCollector;
use tracing::debug;

/// Updates the sensor gauge vectors from the thermostat's remote sensors
pub fn update_sensor_metrics(metrics: &MetricsCollector, sensors: &[RemoteSensor]) {
    for sensor in sensors {
        for capability in &sensor.capability {
            update_capability(metrics, &sensor.name, capability);
        }
    }
}

fn update_capability(metrics: &MetricsCollector, sensor: &str, capability: &Capability) {
    match capability.capability_type.as_str() {
        "temperature" => {
            if let Some(value) = parse_reading(&capability.value) {
                metrics
                    .sensor_temperature
                    .with_label_values(&[sensor])
                    .set(value / 10.0);
            } else {
                debug!(
                    "Skipping temperature {:?} from sensor {}",
                    capability.value, sensor
                );
            }
        }
        "humidity" => {
            if let Some(value) = parse_reading(&capability.value) {
                metrics
                    .sensor_humidity
                    .with_label_values(&[sensor])
                    .set(value);
            } else {
                debug!(
                    "Skipping humidity {:?} from sensor {}",
                    capability.value, sensor
                );
            }
        }
        "occupancy" => {
            metrics
                .sensor_occupied
                .with_label_values(&[sensor])
                .set(occupancy_to_float(&capability.value));
        }
        _ => {}
    }
}

/// Parses a string-encoded numeric reading, rejecting anything non-finite.
/// Surrounding whitespace makes the reading unparsable.
fn parse_reading(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|reading| reading.is_finite())
}

/// Maps an occupancy value to 1.0 when it is exactly `"true"`, else 0.0
pub fn occupancy_to_float(value: &str) -> f64 {
    if value == "true" {
        1.0
    } else {
        0.0
    }
}
