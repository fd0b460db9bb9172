//! Tests for shared utilities

use park_admission::util::{init_tracing, now_ms};

#[test]
fn test_now_ms_advances() {
    let a = now_ms();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let b = now_ms();
    assert!(b > a);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
