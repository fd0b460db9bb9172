//! Tests for error handling

use std::io;
use std::path::PathBuf;

use park_admission::core::{AppResult, ControllerError};

#[test]
fn test_controller_error_display() {
    let err = ControllerError::InvalidConfig("end_hour must be greater".into());
    assert_eq!(err.to_string(), "invalid configuration: end_hour must be greater");

    let err = ControllerError::ThreadPanicked("clock");
    assert_eq!(err.to_string(), "clock thread panicked");
}

#[test]
fn test_channel_setup_keeps_source() {
    let err = ControllerError::ChannelSetup {
        path: PathBuf::from("/tmp/PIPE_RECEPTOR"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };
    assert!(err.to_string().contains("/tmp/PIPE_RECEPTOR"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_app_result_wraps_controller_error() {
    fn fails() -> AppResult<()> {
        Err(ControllerError::InvalidConfig("bad".into()).into())
    }
    let err = fails().unwrap_err();
    assert!(err.downcast_ref::<ControllerError>().is_some());
}
