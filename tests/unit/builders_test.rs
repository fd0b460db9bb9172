//! Tests for the controller builder

use std::time::Duration;

use park_admission::builders::ControllerBuilder;
use park_admission::config::ParkConfig;
use park_admission::core::ControllerError;

#[test]
fn test_builder_applies_tick_override() {
    let controller = ControllerBuilder::new(ParkConfig::default())
        .with_tick_interval(Duration::from_millis(25))
        .build()
        .expect("valid config");
    assert_eq!(controller.tick_interval(), Duration::from_millis(25));
}

#[test]
fn test_builder_context_reflects_config() {
    let config = ParkConfig {
        start_hour: 9,
        end_hour: 17,
        global_max_capacity: 40,
        ..ParkConfig::default()
    };
    let controller = ControllerBuilder::new(config).build().expect("valid config");
    let ctx = controller.context();
    assert_eq!(ctx.ledger.current_hour(), 9);
    assert_eq!(ctx.ledger.end_hour(), 17);
    assert!(ctx.log.is_empty());
    assert!(ctx.directory.is_empty());
}

#[test]
fn test_builder_rejects_invalid_config() {
    let config = ParkConfig {
        global_max_capacity: 0,
        ..ParkConfig::default()
    };
    assert!(matches!(
        ControllerBuilder::new(config).build(),
        Err(ControllerError::InvalidConfig(_))
    ));
}
