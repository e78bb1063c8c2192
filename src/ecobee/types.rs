//! ecobee API Type Definitions
//!
//! Request and response types for the two ecobee API calls the exporter makes.
//!
//! # API Endpoints Covered
//!
//! - `GET /thermostatSummary` → [`ThermostatSummaryResponse`], flattened into
//!   [`ThermostatSummary`] records keyed by thermostat identifier
//! - `GET /thermostat` → [`ThermostatResponse`], [`Thermostat`], [`Runtime`],
//!   [`RemoteSensor`], [`Capability`]
//!
//! Both calls take a [`Selection`], sent JSON-encoded in the `json` query
//! parameter wrapped in a [`SelectionRequest`].
//!
//! # Design Notes
//!
//! - Temperatures in [`Runtime`] are integers in tenths of a degree Fahrenheit.
//! - Capability values are always strings, whatever they encode.
//! - `#[serde(default)]` is used on response structs so fields the API omits
//!   deserialize to empty values instead of failing the whole cycle.

#![allow(dead_code)] // Allow unused fields in API structs for completeness
use crate::error::{ExporterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::warn;

/// Which thermostats a selection targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionType {
    /// Every thermostat registered to the account
    Registered,
    /// The comma-separated identifiers in `selectionMatch`
    Thermostats,
}

/// Query filter for thermostat calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selection_type: SelectionType,
    pub selection_match: String,
    #[serde(skip_serializing_if = "is_false")]
    pub include_equipment_status: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub include_runtime: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub include_sensors: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Selection {
    /// Selects a single thermostat by identifier with no optional blocks
    pub fn thermostat(identifier: &str) -> Self {
        Self {
            selection_type: SelectionType::Thermostats,
            selection_match: identifier.to_string(),
            include_equipment_status: false,
            include_runtime: false,
            include_sensors: false,
        }
    }

    pub fn with_equipment_status(mut self) -> Self {
        self.include_equipment_status = true;
        self
    }

    pub fn with_runtime(mut self) -> Self {
        self.include_runtime = true;
        self
    }

    pub fn with_sensors(mut self) -> Self {
        self.include_sensors = true;
        self
    }
}

/// Body of the `json` query parameter
#[derive(Debug, Serialize)]
pub struct SelectionRequest<'a> {
    pub selection: &'a Selection,
}

/// Status block present on every response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Just the status block, for checking error bodies
#[derive(Debug, Deserialize)]
pub struct StatusEnvelope {
    pub status: Status,
}

/// Response of `GET /thermostatSummary`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThermostatSummaryResponse {
    pub thermostat_count: u32,
    pub revision_list: Vec<String>,
    pub status_list: Vec<String>,
    pub status: Status,
}

/// Equipment currently running, from a summary `statusList` entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquipmentStatus {
    pub heat_pump: bool,
    pub heat_pump2: bool,
    pub heat_pump3: bool,
    pub comp_cool1: bool,
    pub comp_cool2: bool,
    pub aux_heat1: bool,
    pub aux_heat2: bool,
    pub aux_heat3: bool,
    pub fan: bool,
    pub humidifier: bool,
    pub dehumidifier: bool,
    pub ventilator: bool,
    pub economizer: bool,
    pub comp_hot_water: bool,
    pub aux_hot_water: bool,
}

impl FromStr for EquipmentStatus {
    type Err = ExporterError;

    /// Parses the comma-separated token list, e.g. `fan,compCool1`.
    ///
    /// An empty list means nothing is running. Unknown tokens are logged and
    /// skipped.
    fn from_str(s: &str) -> Result<Self> {
        let mut status = EquipmentStatus::default();
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token {
                "heatPump" => status.heat_pump = true,
                "heatPump2" => status.heat_pump2 = true,
                "heatPump3" => status.heat_pump3 = true,
                "compCool1" => status.comp_cool1 = true,
                "compCool2" => status.comp_cool2 = true,
                "auxHeat1" => status.aux_heat1 = true,
                "auxHeat2" => status.aux_heat2 = true,
                "auxHeat3" => status.aux_heat3 = true,
                "fan" => status.fan = true,
                "humidifier" => status.humidifier = true,
                "dehumidifier" => status.dehumidifier = true,
                "ventilator" => status.ventilator = true,
                "economizer" => status.economizer = true,
                "compHotWater" => status.comp_hot_water = true,
                "auxHotWater" => status.aux_hot_water = true,
                other => warn!("Ignoring unknown equipment status {:?}", other),
            }
        }
        Ok(status)
    }
}

/// One thermostat's summary: revision data merged with equipment status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThermostatSummary {
    pub identifier: String,
    pub name: String,
    pub connected: bool,
    pub thermostat_revision: String,
    pub alerts_revision: String,
    pub runtime_revision: String,
    pub interval_revision: String,
    pub equipment_status: EquipmentStatus,
}

impl ThermostatSummaryResponse {
    /// Merges `revisionList` and `statusList` into one record per thermostat.
    ///
    /// Revision entries are `id:name:connected:thermostatRev:alertsRev:runtimeRev:intervalRev`,
    /// status entries are `id:token,token,...`.
    pub fn into_summaries(self) -> Result<HashMap<String, ThermostatSummary>> {
        let mut summaries = HashMap::with_capacity(self.revision_list.len());

        for entry in &self.revision_list {
            let malformed =
                || ExporterError::EcobeeApi(format!("malformed revision entry {:?}", entry));
            let (identifier, rest) = entry.split_once(':').ok_or_else(malformed)?;
            // Names may contain ':', so the five fixed fields are taken from the end
            let fields: Vec<&str> = rest.rsplitn(6, ':').collect();
            let [interval, runtime, alerts, thermostat, connected, name] = fields.as_slice()
            else {
                return Err(malformed());
            };
            let summary = ThermostatSummary {
                identifier: identifier.to_string(),
                name: name.to_string(),
                connected: *connected == "true",
                thermostat_revision: thermostat.to_string(),
                alerts_revision: alerts.to_string(),
                runtime_revision: runtime.to_string(),
                interval_revision: interval.to_string(),
                equipment_status: EquipmentStatus::default(),
            };
            summaries.insert(summary.identifier.clone(), summary);
        }

        for entry in &self.status_list {
            let (identifier, equipment) = entry.split_once(':').ok_or_else(|| {
                ExporterError::EcobeeApi(format!("malformed status entry {:?}", entry))
            })?;
            let summary = summaries
                .entry(identifier.to_string())
                .or_insert_with(|| ThermostatSummary {
                    identifier: identifier.to_string(),
                    ..Default::default()
                });
            summary.equipment_status = equipment.parse()?;
        }

        Ok(summaries)
    }
}

/// Response of `GET /thermostat`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThermostatResponse {
    pub thermostat_list: Vec<Thermostat>,
    pub status: Status,
}

/// Thermostat detail record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thermostat {
    pub identifier: String,
    pub name: String,
    pub thermostat_rev: String,
    pub is_registered: bool,
    pub model_number: String,
    pub runtime: Runtime,
    pub remote_sensors: Vec<RemoteSensor>,
}

/// Current runtime state. Temperatures are tenths of a degree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Runtime {
    pub runtime_rev: String,
    pub connected: bool,
    pub actual_temperature: i64,
    pub actual_humidity: i64,
    pub desired_heat: i64,
    pub desired_cool: i64,
    pub desired_humidity: i64,
    pub desired_dehumidity: i64,
    pub desired_fan_mode: String,
}

/// A remote sensor paired with the thermostat (the thermostat's own sensor included)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteSensor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub code: String,
    pub in_use: bool,
    pub capability: Vec<Capability>,
}

/// A single typed sensor reading, value always string-encoded
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Capability {
    pub id: String,
    #[serde(rename = "type")]
    pub capability_type: String,
    pub value: String,
}
