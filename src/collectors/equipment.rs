//! Equipment Status Metrics
//!
//! # Metrics Produced
//! - `fan`, `comp_cool1`, `comp_cool2`, `aux_heat1`, `aux_heat2`, `aux_heat3`
//!   (1=running, 0=off)

use crate::ecobee::types::EquipmentStatus;
use crate::metrics::MetricsCollector;

/// Copies the summary's equipment flags into their gauges
pub fn update_equipment_metrics(metrics: &MetricsCollector, status: &EquipmentStatus) {
    metrics.set_bool_metric(&metrics.fan, status.fan);
    metrics.set_bool_metric(&metrics.comp_cool1, status.comp_cool1);
    metrics.set_bool_metric(&metrics.comp_cool2, status.comp_cool2);
    metrics.set_bool_metric(&metrics.aux_heat1, status.aux_heat1);
    metrics.set_bool_metric(&metrics.aux_heat2, status.aux_heat2);
    metrics.set_bool_metric(&metrics.aux_heat3, status.aux_heat3);
}
