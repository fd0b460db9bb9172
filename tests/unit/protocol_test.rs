//! Tests for frame decoding and response lines

use park_admission::core::{Decision, RejectReason};
use park_admission::protocol::{Message, ProtocolError, Response, MAX_FRAME_LEN};

#[test]
fn test_text_and_json_decode_to_same_message() {
    let text = Message::decode("RESERVE,agent-1,/tmp/r1,Garcia,9,4").expect("text");
    let json = Message::decode(
        r#"{"type":"RESERVE","agentName":"agent-1","responseChannelId":"/tmp/r1","familyName":"Garcia","requestedHour":9,"partySize":4}"#,
    )
    .expect("json");
    assert_eq!(text, json);
    assert_eq!(text.agent_name(), "agent-1");
    assert_eq!(text.response_channel_id(), "/tmp/r1");
}

#[test]
fn test_register_decodes() {
    let message = Message::decode("REGISTER,A,c1\n").expect("register");
    assert!(matches!(message, Message::Register(ref m) if m.agent_name == "A" && m.response_channel_id == "c1"));
}

#[test]
fn test_malformed_frames() {
    assert!(matches!(Message::decode(""), Err(ProtocolError::Empty)));
    assert!(matches!(Message::decode("HELLO,A,c1"), Err(ProtocolError::UnknownKind(_))));
    assert!(matches!(Message::decode("REGISTER,A"), Err(ProtocolError::MissingField(_))));
    assert!(matches!(Message::decode("REGISTER,A,c1,x"), Err(ProtocolError::TrailingField(_))));
    assert!(matches!(
        Message::decode("RESERVE,A,c1,Garcia,nine,4"),
        Err(ProtocolError::InvalidValue { .. })
    ));
    assert!(matches!(
        Message::decode("RESERVE,A,c1,Garcia,9,2.5"),
        Err(ProtocolError::InvalidValue { field: "partySize", .. })
    ));
    assert!(matches!(Message::decode(r#"{"type":"RESERVE"}"#), Err(ProtocolError::Json(_))));
}

#[test]
fn test_out_of_range_numbers_still_decode() {
    for frame in [
        "RESERVE,A,c1,Garcia,-3,2",
        "RESERVE,A,c1,Garcia,5000000000,2",
        "RESERVE,A,c1,Garcia,9,0",
        r#"{"type":"RESERVE","agentName":"A","responseChannelId":"c1","familyName":"Garcia","requestedHour":-1,"partySize":-4}"#,
    ] {
        assert!(matches!(Message::decode(frame), Ok(Message::Reserve(_))), "{frame}");
    }
}

#[test]
fn test_invalid_party_reason_parses() {
    assert_eq!(
        Response::parse("REJECTED reason=invalid_party").expect("parse"),
        Response::Decision(Decision::Rejected {
            reason: RejectReason::InvalidParty
        })
    );
}

#[test]
fn test_field_limits() {
    let long_agent = format!("REGISTER,{},c1", "a".repeat(64));
    assert!(matches!(Message::decode(&long_agent), Err(ProtocolError::FieldTooLong { .. })));

    let oversized = format!("REGISTER,A,{}", "c".repeat(MAX_FRAME_LEN));
    assert!(matches!(Message::decode(&oversized), Err(ProtocolError::Oversized { .. })));
}

#[test]
fn test_response_lines() {
    assert_eq!(Response::CurrentHour(7).to_line(), "7\n");
    assert_eq!(
        Response::Decision(Decision::Rescheduled {
            requested: 7,
            assigned: 9,
            party: 6
        })
        .to_string(),
        "RESCHEDULED requested=7 assigned=9 party=6"
    );
    assert_eq!(
        Response::parse("REJECTED reason=over_capacity\n").expect("parse"),
        Response::Decision(Decision::Rejected {
            reason: RejectReason::OverCapacity
        })
    );
    assert!(Response::parse("MAYBE").is_err());
}
