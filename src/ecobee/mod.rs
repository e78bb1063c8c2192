pub mod client;
pub mod types;

pub use client::{EcobeeClient, ThermostatApi};
pub use types::{Selection, Thermostat, ThermostatSummary};
