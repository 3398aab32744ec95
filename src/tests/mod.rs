#[cfg(test)]
use crate::prelude::*;

#[test]
fn read_full_settings() {
    let settings = read_settings("src/tests/settings.toml").unwrap();
    assert_eq!(settings.config.iterations, 2048);
    assert_eq!(settings.config.warmup, 16);
    assert_eq!(
        settings.config.workloads,
        vec![Workload::NoEscape, Workload::Escape]
    );
    assert_eq!(settings.log.level, "debug");
    assert_eq!(settings.log.file, "measure.log");
    assert!(!settings.log.stdout);
    assert!(!settings.output.write);
    assert_eq!(settings.output.path, "target/escape-sink-test/");
}

#[test]
fn missing_fields_take_defaults() {
    let settings = read_settings("src/tests/partial.toml").unwrap();
    let defaults = Settings::new();
    assert_eq!(settings.config.iterations, 10);
    assert_eq!(settings.config.warmup, defaults.config.warmup);
    assert_eq!(settings.config.workloads, defaults.config.workloads);
    assert_eq!(settings.log, defaults.log);
    assert_eq!(settings.output, defaults.output);
}

#[test]
fn missing_settings_file_is_an_error() {
    assert!(read_settings("src/tests/does_not_exist.toml").is_err());
}

#[test]
fn validate_rejects_empty_workloads() {
    let mut settings = Settings::new();
    settings.config.workloads.clear();
    assert!(settings.validate().is_err());
}

#[test]
fn validate_rejects_unknown_level() {
    let mut settings = Settings::new();
    settings.log.level = "loud".to_string();
    assert!(settings.validate().is_err());

    settings.log.level = "WARN".to_string();
    assert!(settings.validate().is_ok());
}

#[test]
fn measure_all_follows_configured_order() {
    let mut settings = read_settings("src/tests/settings.toml").unwrap();
    settings.config.iterations = 8;
    settings.config.warmup = 2;

    let report = measure_all(&settings).unwrap();
    let order: Vec<Workload> = report.measurements.iter().map(|m| m.workload).collect();
    assert_eq!(order, vec![Workload::NoEscape, Workload::Escape]);
    assert!(report.measurements.iter().all(|m| m.iterations == 8));

    // Escape runs last, so the sink ends up holding its pointer
    assert_eq!(report.final_value, Some(42));
    assert!(report.final_is_reference);
}

#[test]
fn demonstrate_ends_with_the_value() {
    let sink = demonstrate();
    assert_eq!(sink.value(), Some(99));
    assert!(!sink.is_reference());
    assert_eq!(sink.writes(), 2);
}
