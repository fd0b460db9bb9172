//! Tests for the end-of-run report

use park_admission::config::ParkConfig;
use park_admission::core::{
    AdmissionEngine, ControllerContext, GatewayStats, ReportGenerator, ReservationRequest, StopCause,
};

fn request(family: &str, hour: u32, party: u32) -> ReservationRequest {
    ReservationRequest {
        family: family.into(),
        agent: "agent-1".into(),
        requested_hour: hour,
        party_size: party,
    }
}

fn context() -> ControllerContext {
    ControllerContext::new(ParkConfig {
        start_hour: 7,
        end_hour: 11,
        global_max_capacity: 8,
        ..ParkConfig::default()
    })
}

#[test]
fn test_empty_run_report() {
    let ctx = context();
    let report = ReportGenerator::generate(&ctx, StopCause::EndOfDay, None);
    assert_eq!(report.accepted + report.rescheduled + report.rejected, 0);
    assert_eq!(report.hours.len(), 5);
    assert_eq!(report.peak_occupancy, 0);
    assert_eq!(report.agents, 0);
    assert!(report.gateway.is_none());
}

#[test]
fn test_report_json_shape() {
    let ctx = context();
    let engine = AdmissionEngine::new(&ctx);
    engine.admit(request("Diaz", 7, 8));
    engine.admit(request("Ruiz", 7, 8));
    engine.admit(request("Mora", 13, 2));
    ctx.directory.register("agent-1", "c1", 7);

    let stats = GatewayStats {
        received: 4,
        registrations: 1,
        reservations: 3,
        ..GatewayStats::default()
    };
    let report = ReportGenerator::generate(&ctx, StopCause::Requested, Some(stats));
    let json: serde_json::Value = serde_json::to_value(&report).expect("serialize");

    assert_eq!(json["stop_cause"], "requested");
    assert_eq!(json["accepted"], 1);
    assert_eq!(json["rescheduled"], 1);
    assert_eq!(json["rejected_by_reason"]["out_of_hours"], 1);
    assert_eq!(json["agents"], 1);
    assert_eq!(json["gateway"]["received"], 4);
}

#[test]
fn test_display_mentions_every_section() {
    let ctx = context();
    let engine = AdmissionEngine::new(&ctx);
    engine.admit(request("Diaz", 8, 5));
    engine.admit(request("Ruiz", 8, 20));

    let text = ReportGenerator::generate(&ctx, StopCause::EndOfDay, Some(GatewayStats::default())).to_string();
    assert!(text.contains("hours 7-11"));
    assert!(text.contains("end of day"));
    assert!(text.contains("accepted: 1"));
    assert!(text.contains("over_capacity: 1"));
    assert!(text.contains("peak hour(s): 8, 9 (5 persons)"));
    assert!(text.contains("quiet hour(s): 7, 10, 11 (0 persons)"));
    assert!(text.contains("frames: 0 received"));
}
