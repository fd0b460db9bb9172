//! Tests for the agent directory

use std::sync::Arc;
use std::thread;

use park_admission::core::{AgentDirectory, Registration};

#[test]
fn test_register_then_refresh() {
    let directory = AgentDirectory::new();
    assert_eq!(directory.register("A", "c1", 7), Registration::New);
    assert_eq!(
        directory.register("A", "c2", 9),
        Registration::Refreshed {
            previous_channel: "c1".into()
        }
    );

    let record = directory.get("A").expect("registered");
    assert_eq!(record.response_channel_id, "c2");
    assert_eq!(record.registered_at_hour, 9);
    assert_eq!(record.registrations, 2);
    assert_eq!(directory.len(), 1);
}

#[test]
fn test_concurrent_registration_keeps_one_record_per_name() {
    let directory = Arc::new(AgentDirectory::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let directory = Arc::clone(&directory);
            thread::spawn(move || {
                directory.register("shared", &format!("c{i}"), 7);
                directory.register(&format!("agent-{i}"), "c", 7);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }
    assert_eq!(directory.len(), 9);
    assert_eq!(directory.get("shared").map(|a| a.registrations), Some(8));
}
