use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("ecobee API error: {0}")]
    EcobeeApi(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("thermostat {0} missing from thermostat summary")]
    MissingThermostat(String),

    #[error("Schedule error: {0}")]
    Schedule(String),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
