use anyhow::Result;
use clap::Parser;
use ecobee_exporter::{config::Config, server};
use std::ffi::OsString;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Address to listen on for metrics [config default: ":9442"]
    #[arg(long)]
    listen: Option<String>,

    /// Namespace to use in prometheus [config default: "ecobee"]
    #[arg(long)]
    namespace: Option<String>,

    /// Thermostat identifier (overrides config)
    #[arg(long, env = "ECOBEE_THERMOSTAT")]
    thermostat: Option<String>,

    /// ecobee OAuth access token (overrides config)
    #[arg(long, env = "ECOBEE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Cron expression for collection (overrides config)
    #[arg(long)]
    schedule: Option<String>,

    /// Collect once before serving instead of on a schedule
    #[arg(long)]
    once: bool,
}

/// Loads the env file into the process environment, then parses flags so
/// that `env` fallbacks see values from it. `None` searches for `.env`.
fn parse_args<I, T>(env_file: Option<&Path>, argv: I) -> Args
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let _ = match env_file {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(drop),
    };
    Args::parse_from(argv)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting ecobee Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Parse CLI arguments
    let args = parse_args(None, std::env::args_os());

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(namespace) = args.namespace {
        config.server.namespace = namespace;
    }
    if let Some(thermostat) = args.thermostat {
        config.ecobee.thermostat = thermostat;
    }
    if let Some(access_token) = args.access_token {
        config.ecobee.access_token = Some(secrecy::SecretString::new(access_token.into()));
    }
    if let Some(schedule) = args.schedule {
        config.schedule.cron = schedule;
    }
    if args.once {
        config.schedule.run_once = true;
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("Configuration loaded successfully");
    info!("Thermostat: {}", config.ecobee.thermostat);

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Exporter error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
