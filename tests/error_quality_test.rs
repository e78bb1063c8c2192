//! Error message quality tests
//!
//! Tests that verify error messages are helpful and distinguishable.

use ecobee_exporter::error::ExporterError;

#[test]
fn test_missing_thermostat_message_names_identifier() {
    // Given: A summary without the configured thermostat
    let error = ExporterError::MissingThermostat("311012345678".to_string());

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should name the thermostat and where it was missing
    assert!(message.contains("311012345678"));
    assert!(message.contains("thermostat summary"));
}

#[test]
fn test_api_error_message_clarity() {
    // Given: An ecobee API error
    let error = ExporterError::EcobeeApi("thermostat returned status 14".to_string());

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate API issue
    assert!(message.contains("ecobee API error"));
    assert!(message.contains("status 14"));
}

#[test]
fn test_config_error_message_clarity() {
    // Given: A configuration error
    let error = ExporterError::Config("required flag --listen missing".to_string());

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate configuration issue
    assert!(message.contains("Configuration error"));
    assert!(message.contains("--listen"));
}

#[test]
fn test_schedule_error_message_clarity() {
    let error = "61 * * * *"
        .parse::<ecobee_exporter::schedule::CronSchedule>()
        .unwrap_err();

    let message = format!("{}", error);

    assert!(message.contains("Schedule error"));
    assert!(message.contains("minute"));
    assert!(message.contains("61"));
}

#[test]
fn test_json_error_message_clarity() {
    // Given: A JSON parsing error
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let error = ExporterError::Json(json_err);

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate JSON issue
    assert!(message.contains("JSON error"));
}

#[test]
fn test_metrics_error_message_clarity() {
    let error = ExporterError::from(prometheus::Error::AlreadyReg);

    let message = format!("{}", error);

    assert!(message.contains("Metrics registry error"));
    assert!(message.contains("Duplicate"));
}

#[test]
fn test_io_error_conversion() {
    // Given: An IO error
    let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");

    // When: Converting into ExporterError
    let error: ExporterError = io_err.into();

    // Then: Message keeps the cause
    let message = format!("{}", error);
    assert!(message.contains("IO error"));
    assert!(message.contains("address in use"));
}

#[test]
fn test_error_variants_are_distinguishable() {
    let messages = [
        ExporterError::EcobeeApi("x".to_string()).to_string(),
        ExporterError::Config("x".to_string()).to_string(),
        ExporterError::MissingThermostat("x".to_string()).to_string(),
        ExporterError::Schedule("x".to_string()).to_string(),
        ExporterError::Server("x".to_string()).to_string(),
    ];

    for (i, a) in messages.iter().enumerate() {
        for b in messages.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}
