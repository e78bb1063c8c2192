use crate::error::{ExporterError, Result};
use crate::schedule::{CronSchedule, Schedule};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub ecobee: EcobeeConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EcobeeConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// OAuth access token; refreshing it is left to whatever supervises the exporter
    #[serde(default)]
    pub access_token: Option<SecretString>,
    /// Identifier of the thermostat to export
    #[serde(default)]
    pub thermostat: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    #[serde(default = "default_cron")]
    pub cron: String,
    #[serde(default)]
    pub run_once: bool,
}

fn default_api_url() -> String {
    "https://api.ecobee.com/1".to_string()
}

fn default_listen() -> String {
    ":9442".to_string()
}

fn default_namespace() -> String {
    "ecobee".to_string()
}

fn default_cron() -> String {
    "30 * * * *".to_string()
}

impl Default for EcobeeConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            access_token: None,
            thermostat: String::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            namespace: default_namespace(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
            run_once: false,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("ECOBEE_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Checks everything that must hold before the exporter touches the network.
    pub fn validate(&self) -> Result<()> {
        self.server.bind_addr()?;

        if self.server.namespace.trim().is_empty() {
            return Err(ExporterError::Config(
                "required flag --namespace missing".to_string(),
            ));
        }
        if self.ecobee.thermostat.trim().is_empty() {
            return Err(ExporterError::Config(
                "required flag --thermostat missing".to_string(),
            ));
        }
        if self.ecobee.access_token.is_none() {
            return Err(ExporterError::Config(
                "required flag --access-token missing".to_string(),
            ));
        }

        self.schedule.schedule()?;
        Ok(())
    }
}

impl ServerConfig {
    /// Resolves the listen address into something `TcpListener::bind` accepts.
    ///
    /// A bare `:port` binds every interface.
    pub fn bind_addr(&self) -> Result<String> {
        let listen = self.listen.trim();
        if listen.is_empty() {
            return Err(ExporterError::Config(
                "required flag --listen missing".to_string(),
            ));
        }

        if listen.starts_with(':') {
            Ok(format!("0.0.0.0{}", listen))
        } else {
            Ok(listen.to_string())
        }
    }
}

impl ScheduleConfig {
    pub fn schedule(&self) -> Result<Schedule> {
        if self.run_once {
            return Ok(Schedule::Once);
        }
        let cron: CronSchedule = self.cron.parse()?;
        Ok(Schedule::Cron(cron))
    }
}
