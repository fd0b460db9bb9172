//! Tests for mailbox backends

use park_admission::core::{Decision, RejectReason};
use park_admission::infra::{DeliveryError, InMemoryMailbox, Mailbox};
use park_admission::protocol::Response;

#[test]
fn test_responses_kept_per_channel_in_order() {
    let handle = InMemoryMailbox::new();
    let mut mailbox = handle.clone();
    mailbox.deliver("a", &Response::CurrentHour(7)).expect("deliver");
    mailbox
        .deliver("a", &Response::Decision(Decision::Accepted { hour: 8, party: 2 }))
        .expect("deliver");
    mailbox
        .deliver(
            "b",
            &Response::Decision(Decision::Rejected {
                reason: RejectReason::Expired,
            }),
        )
        .expect("deliver");

    assert_eq!(
        handle.fetch("a"),
        vec![
            Response::CurrentHour(7),
            Response::Decision(Decision::Accepted { hour: 8, party: 2 })
        ]
    );
    assert_eq!(handle.fetch("b").len(), 1);
    assert_eq!(handle.len(), 3);
}

#[test]
fn test_closed_channel_reports_no_listener() {
    let mut mailbox = InMemoryMailbox::new();
    mailbox.close("gone");
    let err = mailbox.deliver("gone", &Response::CurrentHour(7)).unwrap_err();
    assert!(matches!(err, DeliveryError::NoListener(ref c) if c == "gone"));
    assert!(err.to_string().contains("gone"));
}
