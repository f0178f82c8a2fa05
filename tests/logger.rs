use std::fs;

use chronoform::config::LoggingConfig;
use chronoform::logger;
use log::LevelFilter;

#[test]
fn test_disabled_logging_filters_everything() {
    let config = LoggingConfig::default();
    let (level, _log) = logger::dispatch(&config).unwrap().into_log();
    assert_eq!(level, LevelFilter::Off);
}

#[test]
fn test_enabled_logging_uses_configured_level() {
    let config = LoggingConfig {
        enabled: true,
        level: "debug".to_string(),
        file: None,
    };
    let (level, _log) = logger::dispatch(&config).unwrap().into_log();
    assert_eq!(level, LevelFilter::Debug);
}

#[test]
fn test_invalid_level_is_an_error() {
    let config = LoggingConfig {
        enabled: true,
        level: "loud".to_string(),
        file: None,
    };
    assert!(logger::dispatch(&config).is_err());
}

#[test]
fn test_file_logging_writes_records() {
    let temp_dir = std::env::temp_dir().join("chronoform_test_logger");
    fs::create_dir_all(&temp_dir).unwrap();
    let log_path = temp_dir.join("chronoform.log");
    let _ = fs::remove_file(&log_path);

    let config = LoggingConfig {
        enabled: true,
        level: "info".to_string(),
        file: Some(log_path.clone()),
    };
    let (_level, log) = logger::dispatch(&config).unwrap().into_log();
    log.log(
        &log::Record::builder()
            .level(log::Level::Info)
            .target("chronoform")
            .args(format_args!("Test message with file"))
            .build(),
    );
    log.flush();

    let content = fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("Test message with file"));
    assert!(content.contains("INFO"));

    let _ = fs::remove_dir_all(&temp_dir);
}
