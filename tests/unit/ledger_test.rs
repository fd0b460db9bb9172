//! Tests for the capacity ledger

use park_admission::core::CapacityLedger;

fn used(ledger: &CapacityLedger) -> Vec<u32> {
    ledger.snapshot().iter().map(|s| s.capacity_used).collect()
}

#[test]
fn test_window_is_inclusive() {
    let ledger = CapacityLedger::new(7, 19, 100);
    let slots = ledger.snapshot();
    assert_eq!(slots.len(), 13);
    assert_eq!(slots.first().map(|s| s.hour), Some(7));
    assert_eq!(slots.last().map(|s| s.hour), Some(19));
    assert!(slots.iter().all(|s| s.capacity_max == 100 && s.capacity_used == 0));
}

#[test]
fn test_reserve_is_all_or_nothing() {
    let ledger = CapacityLedger::new(7, 10, 10);
    assert!(ledger.try_reserve(8, 7));
    // hour 8 has room for 3, hour 9 has room for 3; 4 fits neither
    assert!(!ledger.try_reserve(7, 4));
    assert_eq!(used(&ledger), vec![0, 7, 7, 0]);
    assert!(ledger.try_reserve(7, 3));
    assert_eq!(used(&ledger), vec![3, 10, 7, 0]);
}

#[test]
fn test_last_hour_cannot_be_entered() {
    let ledger = CapacityLedger::new(7, 10, 10);
    assert!(!ledger.try_reserve(10, 1));
    assert!(!ledger.try_reserve(6, 1));
    assert!(!ledger.try_reserve(42, 1));
    assert_eq!(used(&ledger), vec![0, 0, 0, 0]);
}

#[test]
fn test_exact_fill_is_allowed() {
    let ledger = CapacityLedger::new(7, 9, 5);
    assert!(ledger.try_reserve(7, 5));
    assert!(!ledger.try_reserve(7, 1));
    assert_eq!(ledger.snapshot()[0].headroom(), 0);
}

#[test]
fn test_find_alternative_takes_earliest() {
    let ledger = CapacityLedger::new(7, 12, 10);
    assert!(ledger.try_reserve(8, 8));
    // 7 collides with 8, 8 and 9 are full enough, 10 is the first free pair
    assert_eq!(ledger.find_alternative(7, 5, 12), Some(10));
    assert_eq!(used(&ledger), vec![0, 8, 8, 0, 5, 5]);
}

#[test]
fn test_find_alternative_none_leaves_ledger_unchanged() {
    let ledger = CapacityLedger::new(7, 9, 4);
    assert!(ledger.try_reserve(7, 4));
    let before = ledger.snapshot();
    assert_eq!(ledger.find_alternative(7, 1, 9), None);
    assert_eq!(ledger.snapshot(), before);
}

#[test]
fn test_guard_reads_and_commits_together() {
    let ledger = CapacityLedger::new(7, 10, 10);
    let mut guard = ledger.lock();
    assert_eq!(guard.current_hour(), 7);
    assert!(guard.try_reserve(7, 2));
    assert_eq!(guard.slot(8).map(|s| s.leaving_count), Some(2));
    assert_eq!(guard.slot(7).map(|s| s.entering_count), Some(2));
    assert!(guard.slot(11).is_none());
}
