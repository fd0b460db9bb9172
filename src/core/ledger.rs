//! Hourly capacity ledger.
//!
//! Every stay occupies two consecutive hours: the entry hour and the
//! following one. The ledger owns one [`HourSlot`] per hour of the operating
//! window `[start_hour, end_hour]` together with the simulated clock, all
//! behind a single `parking_lot::Mutex`. Checking headroom and committing the
//! increment always happen while the same guard is held, so no caller can
//! observe `capacity_used > capacity_max`.
//!
//! Capacity is never released: occupancy is cumulative for the whole run.

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use crate::util::serde::{Hour, PartySize};

/// Occupancy counters for one simulated hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourSlot {
    /// The hour this slot covers.
    pub hour: Hour,
    /// Persons admitted whose stay covers this hour.
    pub capacity_used: u32,
    /// Upper bound for `capacity_used`.
    pub capacity_max: u32,
    /// Persons entering at this hour.
    pub entering_count: u32,
    /// Persons leaving at this hour.
    pub leaving_count: u32,
}

impl HourSlot {
    fn new(hour: Hour, capacity_max: u32) -> Self {
        Self {
            hour,
            capacity_used: 0,
            capacity_max,
            entering_count: 0,
            leaving_count: 0,
        }
    }

    /// Whether `party` more persons fit in this hour.
    pub fn fits(&self, party: PartySize) -> bool {
        self.capacity_used
            .checked_add(party)
            .is_some_and(|total| total <= self.capacity_max)
    }

    /// Remaining capacity for this hour.
    pub const fn headroom(&self) -> u32 {
        self.capacity_max - self.capacity_used
    }
}

/// Record of one clock advance, with the entering/leaving tallies the new
/// hour held right before they were reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourAdvance {
    /// Hour before the tick.
    pub from: Hour,
    /// Hour after the tick.
    pub to: Hour,
    /// Persons scheduled to enter at `to`.
    pub entering: u32,
    /// Persons scheduled to leave at `to`.
    pub leaving: u32,
}

struct LedgerState {
    current_hour: Hour,
    slots: Vec<HourSlot>,
}

/// Per-hour capacity counters plus the shared simulated hour.
pub struct CapacityLedger {
    start_hour: Hour,
    end_hour: Hour,
    state: Mutex<LedgerState>,
}

impl CapacityLedger {
    /// Create a ledger for `[start_hour, end_hour]` with the same
    /// `capacity_max` for every hour. The clock starts at `start_hour`.
    pub fn new(start_hour: Hour, end_hour: Hour, capacity_max: u32) -> Self {
        let slots = (start_hour..=end_hour)
            .map(|hour| HourSlot::new(hour, capacity_max))
            .collect();
        Self {
            start_hour,
            end_hour,
            state: Mutex::new(LedgerState {
                current_hour: start_hour,
                slots,
            }),
        }
    }

    /// First hour of the operating window.
    pub const fn start_hour(&self) -> Hour {
        self.start_hour
    }

    /// Last hour of the operating window.
    pub const fn end_hour(&self) -> Hour {
        self.end_hour
    }

    /// Acquire the ledger lock. Everything done through the returned guard
    /// is one critical section.
    pub fn lock(&self) -> LedgerGuard<'_> {
        LedgerGuard {
            start_hour: self.start_hour,
            state: self.state.lock(),
        }
    }

    /// Current simulated hour.
    pub fn current_hour(&self) -> Hour {
        self.state.lock().current_hour
    }

    /// Reserve `party` persons at `start` and `start + 1`, or change nothing.
    pub fn try_reserve(&self, start: Hour, party: PartySize) -> bool {
        self.lock().try_reserve(start, party)
    }

    /// Reserve the earliest hour in `[from, end)` that fits `party`.
    pub fn find_alternative(&self, from: Hour, party: PartySize, end: Hour) -> Option<Hour> {
        self.lock().find_alternative(from, party, end)
    }

    /// Copy of every slot, in hour order.
    pub fn snapshot(&self) -> Vec<HourSlot> {
        self.state.lock().slots.clone()
    }

    /// Advance the simulated hour by one and reset the entering/leaving
    /// tallies of the hour that begins. Returns `None` once the clock already
    /// sits at `end_hour`.
    pub(crate) fn advance_hour(&self) -> Option<HourAdvance> {
        let mut state = self.state.lock();
        if state.current_hour >= self.end_hour {
            return None;
        }
        let from = state.current_hour;
        let to = from + 1;
        state.current_hour = to;

        let (entering, leaving) = match slot_index(self.start_hour, to, state.slots.len()) {
            Some(idx) => {
                let slot = &mut state.slots[idx];
                let tallies = (slot.entering_count, slot.leaving_count);
                slot.entering_count = 0;
                slot.leaving_count = 0;
                tallies
            }
            None => (0, 0),
        };
        drop(state);

        Some(HourAdvance {
            from,
            to,
            entering,
            leaving,
        })
    }
}

fn slot_index(start_hour: Hour, hour: Hour, len: usize) -> Option<usize> {
    let idx = usize::try_from(hour.checked_sub(start_hour)?).ok()?;
    (idx < len).then_some(idx)
}

/// Exclusive access to the ledger for the duration of one decision.
pub struct LedgerGuard<'a> {
    start_hour: Hour,
    state: MutexGuard<'a, LedgerState>,
}

impl LedgerGuard<'_> {
    /// Current simulated hour, read under the ledger lock.
    pub fn current_hour(&self) -> Hour {
        self.state.current_hour
    }

    /// Slot for `hour`, if it lies inside the operating window.
    pub fn slot(&self, hour: Hour) -> Option<&HourSlot> {
        slot_index(self.start_hour, hour, self.state.slots.len()).map(|idx| &self.state.slots[idx])
    }

    /// Reserve `party` persons at `start` and `start + 1`.
    ///
    /// Both hours must exist and have headroom; otherwise nothing changes and
    /// `false` is returned.
    pub fn try_reserve(&mut self, start: Hour, party: PartySize) -> bool {
        let len = self.state.slots.len();
        let Some(first) = slot_index(self.start_hour, start, len) else {
            return false;
        };
        let Some(second) = start
            .checked_add(1)
            .and_then(|next| slot_index(self.start_hour, next, len))
        else {
            return false;
        };

        let slots = &mut self.state.slots;
        if !slots[first].fits(party) || !slots[second].fits(party) {
            return false;
        }

        slots[first].capacity_used += party;
        slots[first].entering_count += party;
        slots[second].capacity_used += party;
        slots[second].leaving_count += party;
        true
    }

    /// Scan `[from, end)` in ascending order and reserve the first hour that
    /// fits `party`. Earliest hour wins.
    pub fn find_alternative(&mut self, from: Hour, party: PartySize, end: Hour) -> Option<Hour> {
        (from..end).find(|&hour| self.try_reserve(hour, party))
    }
}
