//! Tests for configuration validation

use park_admission::config::ParkConfig;

#[test]
fn test_default_config_is_valid() {
    let cfg = ParkConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.start_hour, 7);
    assert_eq!(cfg.end_hour, 19);
    assert_eq!(cfg.global_max_capacity, 100);
    assert_eq!(cfg.inbound_channel, "PIPE_RECEPTOR");
}

#[test]
fn test_start_hour_bounds() {
    let zero = ParkConfig {
        start_hour: 0,
        ..ParkConfig::default()
    };
    assert!(zero.validate().is_err());

    let late = ParkConfig {
        start_hour: 23,
        end_hour: 24,
        ..ParkConfig::default()
    };
    assert!(late.validate().is_ok());
}

#[test]
fn test_end_hour_must_follow_start() {
    let equal = ParkConfig {
        start_hour: 10,
        end_hour: 10,
        ..ParkConfig::default()
    };
    assert!(equal.validate().is_err());

    let past_midnight = ParkConfig {
        end_hour: 25,
        ..ParkConfig::default()
    };
    assert!(past_midnight.validate().is_err());
}

#[test]
fn test_zero_capacity_and_tick_rejected() {
    let no_capacity = ParkConfig {
        global_max_capacity: 0,
        ..ParkConfig::default()
    };
    assert!(no_capacity.validate().is_err());

    let no_tick = ParkConfig {
        tick_interval_secs: 0,
        ..ParkConfig::default()
    };
    assert!(no_tick.validate().is_err());
}

#[test]
fn test_inbound_channel_length() {
    let empty = ParkConfig {
        inbound_channel: String::new(),
        ..ParkConfig::default()
    };
    assert!(empty.validate().is_err());

    let long = ParkConfig {
        inbound_channel: "p".repeat(256),
        ..ParkConfig::default()
    };
    assert!(long.validate().is_err());
}

#[test]
fn test_from_json_fills_defaults() {
    let cfg = ParkConfig::from_json_str(r#"{"start_hour":8,"end_hour":12,"global_max_capacity":20}"#)
        .expect("valid json config");
    assert_eq!(cfg.start_hour, 8);
    assert_eq!(cfg.end_hour, 12);
    assert_eq!(cfg.global_max_capacity, 20);
    assert_eq!(cfg.tick_interval_secs, 10);
    assert_eq!(cfg.delivery_timeout_ms, 500);
}

#[test]
fn test_from_json_validates() {
    assert!(ParkConfig::from_json_str(r#"{"start_hour":12,"end_hour":9}"#).is_err());
    assert!(ParkConfig::from_json_str("not json").is_err());
}
