//! Tests for the reservation log

use park_admission::core::{Decision, LogEntry, RejectReason, ReservationLog, ReservationRequest, ReservationStatus};

fn request(family: &str, hour: u32, party: u32) -> ReservationRequest {
    ReservationRequest {
        family: family.into(),
        agent: "agent-1".into(),
        requested_hour: hour,
        party_size: party,
    }
}

#[test]
fn test_ids_are_sequential_from_one() {
    let log = ReservationLog::new();
    let first = log.record_decision(request("Diaz", 7, 2), Decision::Accepted { hour: 7, party: 2 });
    let second = log.record_decision(
        request("Ruiz", 7, 2),
        Decision::Rejected {
            reason: RejectReason::NoAvailability,
        },
    );
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(second.entry_hour, None);
    assert_eq!(second.status, ReservationStatus::Rejected(RejectReason::NoAvailability));
}

#[test]
fn test_rescheduled_records_assigned_hour() {
    let log = ReservationLog::new();
    let reservation = log.record_decision(
        request("Lopez", 8, 3),
        Decision::Rescheduled {
            requested: 8,
            assigned: 11,
            party: 3,
        },
    );
    assert_eq!(reservation.requested_hour, 8);
    assert_eq!(reservation.entry_hour, Some(11));
    assert_eq!(reservation.status, ReservationStatus::Rescheduled);
}

#[test]
fn test_entry_serializes_with_kind_tag() {
    let log = ReservationLog::new();
    log.record_decision(request("Diaz", 7, 2), Decision::Accepted { hour: 7, party: 2 });
    let entries = log.entries();
    let json = serde_json::to_string(&entries[0]).expect("serialize");
    assert!(json.contains(r#""kind":"decision""#));

    let back: LogEntry = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, entries[0]);
}
