//! ecobee HTTP API Client
//!
//! Thin client over the two read-only ecobee calls the exporter needs.
//!
//! # Architecture
//!
//! - **Transport**: HTTPS `GET` with the [`Selection`] JSON-encoded in the `json` query parameter
//! - **Authentication**: OAuth bearer token supplied by configuration; this client never refreshes it
//! - **Errors**: a non-zero `status.code` in any response body is an API error, whatever the HTTP status
//!
//! # Example
//!
//! ```no_run
//! use ecobee_exporter::config::EcobeeConfig;
//! use ecobee_exporter::ecobee::{EcobeeClient, Selection, ThermostatApi};
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = EcobeeConfig {
//!     api_url: "https://api.ecobee.com/1".to_string(),
//!     access_token: Some(SecretString::from("your-access-token")),
//!     thermostat: "311012345678".to_string(),
//! };
//!
//! let client = EcobeeClient::new(&config)?;
//! let thermostat = client.thermostat(&config.thermostat).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::EcobeeConfig;
use crate::ecobee::types::*;
use crate::error::{ExporterError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::debug;

/// The thermostat calls the collector depends on
#[async_trait]
pub trait ThermostatApi: Send + Sync {
    /// Summary records for the selected thermostats, keyed by identifier
    async fn thermostat_summary(
        &self,
        selection: &Selection,
    ) -> Result<HashMap<String, ThermostatSummary>>;

    /// Runtime and sensor detail for one thermostat
    async fn thermostat(&self, identifier: &str) -> Result<Thermostat>;
}

/// Client for the ecobee HTTP API
///
/// `Send` and `Sync`; the underlying `reqwest::Client` pools connections.
pub struct EcobeeClient {
    http: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

impl EcobeeClient {
    pub fn new(config: &EcobeeConfig) -> Result<Self> {
        let access_token = config
            .access_token
            .clone()
            .ok_or_else(|| ExporterError::Config("ecobee access token missing".to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("ecobee-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Issues a selection query against `endpoint` and decodes the body.
    async fn execute_query<T>(&self, endpoint: &str, selection: &Selection) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        let body = serde_json::to_string(&SelectionRequest { selection })?;
        debug!("Requesting {} for {}", endpoint, selection.selection_match);

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token.expose_secret())
            .header(CONTENT_TYPE, "application/json;charset=UTF-8")
            .query(&[("json", body)])
            .send()
            .await?;

        let http_status = response.status();
        let text = response.text().await?;
        debug!("{} response received ({})", endpoint, http_status);

        // ecobee reports failures in the body, often alongside a 500
        if let Ok(envelope) = serde_json::from_str::<StatusEnvelope>(&text) {
            if envelope.status.code != 0 {
                return Err(ExporterError::EcobeeApi(format!(
                    "{} returned status {}: {}",
                    endpoint, envelope.status.code, envelope.status.message
                )));
            }
        }

        if !http_status.is_success() {
            return Err(ExporterError::EcobeeApi(format!(
                "{} returned HTTP {}",
                endpoint, http_status
            )));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ThermostatApi for EcobeeClient {
    async fn thermostat_summary(
        &self,
        selection: &Selection,
    ) -> Result<HashMap<String, ThermostatSummary>> {
        let response: ThermostatSummaryResponse =
            self.execute_query("thermostatSummary", selection).await?;
        response.into_summaries()
    }

    async fn thermostat(&self, identifier: &str) -> Result<Thermostat> {
        let selection = Selection::thermostat(identifier)
            .with_runtime()
            .with_sensors();
        let response: ThermostatResponse = self.execute_query("thermostat", &selection).await?;

        let mut thermostats = response.thermostat_list;
        if thermostats.len() != 1 {
            return Err(ExporterError::EcobeeApi(format!(
                "expected 1 thermostat for {}, got {}",
                identifier,
                thermostats.len()
            )));
        }
        Ok(thermostats.remove(0))
    }
}
