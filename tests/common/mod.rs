//! Shared fixtures: an in-memory ecobee API and record builders

#![allow(dead_code)]

use async_trait::async_trait;
use ecobee_exporter::ecobee::types::{
    Capability, EquipmentStatus, RemoteSensor, Runtime, Thermostat, ThermostatSummary,
};
use ecobee_exporter::ecobee::{Selection, ThermostatApi};
use ecobee_exporter::error::{ExporterError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const THERMOSTAT_ID: &str = "311012345678";

/// In-memory stand-in for the ecobee API
///
/// Responses can be swapped between cycles; calls are counted.
pub struct FakeThermostatApi {
    pub summaries: Mutex<HashMap<String, ThermostatSummary>>,
    pub thermostat: Mutex<Thermostat>,
    pub fail_summary: Mutex<bool>,
    pub summary_calls: AtomicUsize,
    pub thermostat_calls: AtomicUsize,
    pub last_selection: Mutex<Option<Selection>>,
}

impl FakeThermostatApi {
    pub fn new(equipment: EquipmentStatus, thermostat: Thermostat) -> Self {
        let mut summaries = HashMap::new();
        summaries.insert(THERMOSTAT_ID.to_string(), summary(equipment));
        Self {
            summaries: Mutex::new(summaries),
            thermostat: Mutex::new(thermostat),
            fail_summary: Mutex::new(false),
            summary_calls: AtomicUsize::new(0),
            thermostat_calls: AtomicUsize::new(0),
            last_selection: Mutex::new(None),
        }
    }

    /// A fake whose summary does not list the configured thermostat
    pub fn without_thermostat() -> Self {
        let fake = Self::new(EquipmentStatus::default(), thermostat(Runtime::default(), vec![]));
        fake.summaries.lock().unwrap().clear();
        fake
    }

    pub fn set_thermostat(&self, thermostat: Thermostat) {
        *self.thermostat.lock().unwrap() = thermostat;
    }
}

#[async_trait]
impl ThermostatApi for FakeThermostatApi {
    async fn thermostat_summary(
        &self,
        selection: &Selection,
    ) -> Result<HashMap<String, ThermostatSummary>> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_selection.lock().unwrap() = Some(selection.clone());
        if *self.fail_summary.lock().unwrap() {
            return Err(ExporterError::EcobeeApi(
                "thermostatSummary returned status 14: Authentication token has expired"
                    .to_string(),
            ));
        }
        Ok(self.summaries.lock().unwrap().clone())
    }

    async fn thermostat(&self, _identifier: &str) -> Result<Thermostat> {
        self.thermostat_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.thermostat.lock().unwrap().clone())
    }
}

pub fn summary(equipment: EquipmentStatus) -> ThermostatSummary {
    ThermostatSummary {
        identifier: THERMOSTAT_ID.to_string(),
        name: "Hallway".to_string(),
        connected: true,
        equipment_status: equipment,
        ..Default::default()
    }
}

pub fn runtime(actual_temperature: i64, desired_heat: i64, desired_cool: i64) -> Runtime {
    Runtime {
        actual_temperature,
        desired_heat,
        desired_cool,
        ..Default::default()
    }
}

pub fn thermostat(runtime: Runtime, remote_sensors: Vec<RemoteSensor>) -> Thermostat {
    Thermostat {
        identifier: THERMOSTAT_ID.to_string(),
        name: "Hallway".to_string(),
        runtime,
        remote_sensors,
        ..Default::default()
    }
}

pub fn sensor(name: &str, capabilities: &[(&str, &str)]) -> RemoteSensor {
    RemoteSensor {
        id: format!("rs:{}", name),
        name: name.to_string(),
        sensor_type: "ecobee3_remote_sensor".to_string(),
        in_use: true,
        capability: capabilities
            .iter()
            .enumerate()
            .map(|(i, (kind, value))| Capability {
                id: i.to_string(),
                capability_type: kind.to_string(),
                value: value.to_string(),
            })
            .collect(),
        ..Default::default()
    }
}
