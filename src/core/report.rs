//! End-of-run report.
//!
//! Built once at shutdown from read-only snapshots of the ledger and the
//! reservation log.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::audit::{Reservation, ReservationStatus};
use crate::core::clock::StopCause;
use crate::core::context::ControllerContext;
use crate::core::engine::RejectReason;
use crate::core::ledger::{HourAdvance, HourSlot};
use crate::core::stats::GatewayStats;
use crate::util::serde::Hour;

/// Occupancy summary for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourSummary {
    /// The hour.
    pub hour: Hour,
    /// Persons whose stay covers this hour.
    pub capacity_used: u32,
    /// Capacity limit.
    pub capacity_max: u32,
    /// Persons admitted with this entry hour.
    pub entering: u32,
    /// Persons admitted whose stay ends at this hour.
    pub leaving: u32,
}

/// Final run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// First hour of the window.
    pub start_hour: Hour,
    /// Last hour of the window.
    pub end_hour: Hour,
    /// Simulated hour at shutdown.
    pub final_hour: Hour,
    /// Why the run ended.
    pub stop_cause: StopCause,
    /// Requests admitted at the requested hour.
    pub accepted: u64,
    /// Requests admitted at another hour.
    pub rescheduled: u64,
    /// Requests not admitted.
    pub rejected: u64,
    /// Rejections keyed by reason.
    pub rejected_by_reason: BTreeMap<RejectReason, u64>,
    /// Hour(s) with the highest occupancy, ties included.
    pub peak_hours: Vec<Hour>,
    /// Occupancy at the peak hour(s).
    pub peak_occupancy: u32,
    /// Hour(s) with the lowest occupancy, ties included.
    pub quiet_hours: Vec<Hour>,
    /// Occupancy at the quiet hour(s).
    pub quiet_occupancy: u32,
    /// Per-hour summary across the window.
    pub hours: Vec<HourSummary>,
    /// Every clock advance of the run.
    pub hour_advances: Vec<HourAdvance>,
    /// Distinct registered agents.
    pub agents: usize,
    /// Gateway counters, when a gateway ran.
    pub gateway: Option<GatewayStats>,
}

/// Builds the [`Report`].
pub struct ReportGenerator;

impl ReportGenerator {
    /// Aggregate the context into a report.
    pub fn generate(ctx: &ControllerContext, stop_cause: StopCause, gateway: Option<GatewayStats>) -> Report {
        // one lock at a time: ledger, then log, then directory
        let slots = ctx.ledger.snapshot();
        let final_hour = ctx.ledger.current_hour();
        let reservations = ctx.log.reservations();
        let hour_advances = ctx.log.hour_advances();
        let agents = ctx.directory.len();

        let mut accepted = 0;
        let mut rescheduled = 0;
        let mut rejected = 0;
        let mut rejected_by_reason = BTreeMap::new();
        for reservation in &reservations {
            match reservation.status {
                ReservationStatus::Accepted => accepted += 1,
                ReservationStatus::Rescheduled => rescheduled += 1,
                ReservationStatus::Rejected(reason) => {
                    rejected += 1;
                    *rejected_by_reason.entry(reason).or_insert(0) += 1;
                }
            }
        }

        let hours = summarize_hours(&slots, &reservations);
        let (peak_hours, peak_occupancy) = extreme_hours(&slots, Extreme::Max);
        let (quiet_hours, quiet_occupancy) = extreme_hours(&slots, Extreme::Min);

        Report {
            start_hour: ctx.ledger.start_hour(),
            end_hour: ctx.ledger.end_hour(),
            final_hour,
            stop_cause,
            accepted,
            rescheduled,
            rejected,
            rejected_by_reason,
            peak_hours,
            peak_occupancy,
            quiet_hours,
            quiet_occupancy,
            hours,
            hour_advances,
            agents,
            gateway,
        }
    }
}

fn summarize_hours(slots: &[HourSlot], reservations: &[Reservation]) -> Vec<HourSummary> {
    slots
        .iter()
        .map(|slot| {
            let mut entering = 0;
            let mut leaving = 0;
            for reservation in reservations {
                if let Some(entry) = reservation.entry_hour {
                    if entry == slot.hour {
                        entering += reservation.party_size;
                    } else if entry + 1 == slot.hour {
                        leaving += reservation.party_size;
                    }
                }
            }
            HourSummary {
                hour: slot.hour,
                capacity_used: slot.capacity_used,
                capacity_max: slot.capacity_max,
                entering,
                leaving,
            }
        })
        .collect()
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

fn extreme_hours(slots: &[HourSlot], extreme: Extreme) -> (Vec<Hour>, u32) {
    let used = slots.iter().map(|s| s.capacity_used);
    let Some(target) = (match extreme {
        Extreme::Max => used.max(),
        Extreme::Min => used.min(),
    }) else {
        return (Vec::new(), 0);
    };
    let hours = slots
        .iter()
        .filter(|s| s.capacity_used == target)
        .map(|s| s.hour)
        .collect();
    (hours, target)
}

fn join_hours(hours: &[Hour]) -> String {
    hours.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Park report: hours {}-{} ===", self.start_hour, self.end_hour)?;
        let cause = match self.stop_cause {
            StopCause::EndOfDay => "end of day",
            StopCause::Requested => "stop requested",
        };
        writeln!(f, "final hour: {} ({cause})", self.final_hour)?;
        writeln!(f, "accepted: {}", self.accepted)?;
        writeln!(f, "rescheduled: {}", self.rescheduled)?;
        writeln!(f, "rejected: {}", self.rejected)?;
        for (reason, count) in &self.rejected_by_reason {
            writeln!(f, "  {reason}: {count}")?;
        }
        writeln!(
            f,
            "peak hour(s): {} ({} persons)",
            join_hours(&self.peak_hours),
            self.peak_occupancy
        )?;
        writeln!(
            f,
            "quiet hour(s): {} ({} persons)",
            join_hours(&self.quiet_hours),
            self.quiet_occupancy
        )?;
        writeln!(f, "hour  used/max  entering  leaving")?;
        for h in &self.hours {
            writeln!(
                f,
                "{:>4}  {:>4}/{:<4}  {:>8}  {:>7}",
                h.hour, h.capacity_used, h.capacity_max, h.entering, h.leaving
            )?;
        }
        writeln!(f, "hour advances: {}", self.hour_advances.len())?;
        writeln!(f, "agents: {}", self.agents)?;
        if let Some(g) = &self.gateway {
            writeln!(
                f,
                "frames: {} received, {} malformed, {} delivered, {} delivery failures",
                g.received, g.malformed, g.delivered, g.delivery_failures
            )?;
        }
        Ok(())
    }
}
