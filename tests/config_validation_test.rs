//! Configuration validation tests
//!
//! Tests that verify configuration defaults and the startup checks.

use ecobee_exporter::config::{Config, EcobeeConfig, ScheduleConfig, ServerConfig};
use ecobee_exporter::error::ExporterError;
use ecobee_exporter::schedule::Schedule;
use secrecy::SecretString;

fn valid_config() -> Config {
    Config {
        ecobee: EcobeeConfig {
            access_token: Some(SecretString::from("token")),
            thermostat: "311012345678".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_default_server_config() {
    // Given: ServerConfig with default values
    let config = ServerConfig::default();

    // Then: Should match the documented flag defaults
    assert_eq!(config.listen, ":9442");
    assert_eq!(config.namespace, "ecobee");
}

#[test]
fn test_default_ecobee_and_schedule_config() {
    let ecobee = EcobeeConfig::default();
    let schedule = ScheduleConfig::default();

    assert_eq!(ecobee.api_url, "https://api.ecobee.com/1");
    assert!(ecobee.access_token.is_none());
    assert!(ecobee.thermostat.is_empty());
    assert_eq!(schedule.cron, "30 * * * *");
    assert!(!schedule.run_once);
}

#[test]
fn test_valid_config_passes() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn test_bare_port_binds_all_interfaces() {
    let config = ServerConfig::default();
    assert_eq!(config.bind_addr().unwrap(), "0.0.0.0:9442");
}

#[test]
fn test_explicit_host_is_kept() {
    let config = ServerConfig {
        listen: "127.0.0.1:8080".to_string(),
        namespace: "ecobee".to_string(),
    };
    assert_eq!(config.bind_addr().unwrap(), "127.0.0.1:8080");
}

#[test]
fn test_empty_listen_is_a_config_error() {
    // Given: --listen ""
    let mut config = valid_config();
    config.server.listen = String::new();

    // When: Validating
    let err = config.validate().unwrap_err();

    // Then: It's a configuration error mentioning the flag
    assert!(matches!(err, ExporterError::Config(_)));
    assert!(err.to_string().contains("--listen"));
}

#[test]
fn test_missing_thermostat_is_a_config_error() {
    let mut config = valid_config();
    config.ecobee.thermostat = "  ".to_string();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--thermostat"));
}

#[test]
fn test_missing_access_token_is_a_config_error() {
    let mut config = valid_config();
    config.ecobee.access_token = None;

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--access-token"));
}

#[test]
fn test_empty_namespace_is_a_config_error() {
    let mut config = valid_config();
    config.server.namespace = String::new();

    assert!(matches!(config.validate(), Err(ExporterError::Config(_))));
}

#[test]
fn test_bad_cron_is_rejected() {
    let mut config = valid_config();
    config.schedule.cron = "every half hour".to_string();

    assert!(matches!(config.validate(), Err(ExporterError::Schedule(_))));
}

#[test]
fn test_run_once_ignores_cron() {
    // Given: A run-once config with an unparseable cron expression
    let schedule = ScheduleConfig {
        cron: "not cron".to_string(),
        run_once: true,
    };

    // Then: The cron expression is never consulted
    assert_eq!(schedule.schedule().unwrap(), Schedule::Once);
}

#[test]
fn test_default_schedule_is_half_past() {
    match ScheduleConfig::default().schedule().unwrap() {
        Schedule::Cron(cron) => assert_eq!(cron.expression(), "30 * * * *"),
        Schedule::Once => panic!("default schedule should be periodic"),
    }
}
