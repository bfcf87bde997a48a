/// End-to-end direct feed decoding

use pitch_decoder::protocol::{Clear, Decoded, Message, MessageType};
use pitch_decoder::{decode_direct, DecodeError, Pipeline, SessionConfig};
use time::macros::{date, datetime, offset};

fn config() -> SessionConfig {
    SessionConfig::new(date!(2015 - 03 - 23))
}

fn record(ms: u32, code: char, body: &str) -> String {
    format!("\0{:07}{}{}\n", ms, code, body)
}

fn add_order_line(ms: u32) -> String {
    record(ms, 'A', &format!("{:<12}{}{:06}{:<6}{:010}{}", "ORD000000001", "B", 100, "VODl", 15_000_000, "Y"))
}

#[test]
fn test_clear_then_add_order() {
    let mut input = b"\x000000010sAAAAAAAA\n".to_vec();
    input.extend_from_slice(add_order_line(20).as_bytes());

    let decoded: Vec<_> = decode_direct(&input, &config())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(decoded.len(), 2);
    match &decoded[0].message {
        Message::Clear(Clear { symbol: Some(symbol) }) => assert_eq!(*symbol, "AAAAAAAA"),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(decoded[0].timestamp.resolved(), Some(datetime!(2015-03-23 00:00:00.010 UTC)));
    assert_eq!(decoded[1].message_type, MessageType::AddOrder);
    assert_eq!(decoded[1].timestamp.resolved(), Some(datetime!(2015-03-23 00:00:00.020 UTC)));
}

#[test]
fn test_unknown_codes_are_dropped() {
    let mut input = record(5, '?', "whatever").into_bytes();
    input.extend_from_slice(b"\n\n");
    input.extend_from_slice(add_order_line(6).as_bytes());
    input.extend_from_slice(record(7, 'W', "").as_bytes());

    let results: Vec<_> = decode_direct(&input, &config()).collect();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_ok());
}

#[test]
fn test_malformed_record_does_not_stop_stream() {
    let mut input = record(1, 'A', &format!("{:<12}{}{:06}{:<6}{:010}{}", "ORD1", "X", 1, "VODl", 1, "Y")).into_bytes();
    input.extend_from_slice(b"\x0000000xxsAAAAAAAA\n");
    input.extend_from_slice(add_order_line(3).as_bytes());

    let results: Vec<_> = decode_direct(&input, &config()).collect();
    assert_eq!(results.len(), 3);
    assert!(matches!(results[0], Err(DecodeError::MalformedField { field: "side", .. })));
    assert!(matches!(results[1], Err(DecodeError::MalformedField { kind: "record prefix", .. })));
    assert!(results[2].is_ok());
}

#[test]
fn test_crlf_and_missing_final_newline() {
    let mut input = record(1, 's', "AAAAAAAA").replace('\n', "\r\n").into_bytes();
    input.extend_from_slice(b"\x000000002sBBBBBBBB");
    let decoded: Vec<_> = decode_direct(&input, &config()).map(Result::unwrap).collect();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[1].message.symbol().map(|s| s.to_string()), Some("BBBBBBBB".to_string()));
}

#[test]
fn test_utc_offset_applies_to_midnight() {
    let config = config().with_offset(offset!(+1));
    let input = record(3_600_000, 's', "AAAAAAAA");
    let decoded = decode_direct(input.as_bytes(), &config).next().unwrap().unwrap();
    assert_eq!(decoded.timestamp.resolved(), Some(datetime!(2015-03-23 00:00:00 UTC)));
}

#[test]
fn test_pipeline_counts() {
    let mut input = record(1, 's', "AAAAAAAA").into_bytes();
    input.extend_from_slice(record(2, 'A', "short").as_bytes());
    input.extend_from_slice(add_order_line(3).as_bytes());

    let mut pipeline = Pipeline::new(config(), Vec::<Decoded>::new());
    pipeline.run_direct(&input);
    let stats = pipeline.stats();
    assert_eq!(stats.decoded(), 2);
    assert_eq!(stats.truncated(), 1);
    assert_eq!(stats.count(MessageType::AddOrder), 1);
    assert_eq!(stats.total_bytes(), input.len() as u64);

    let forwarded = pipeline.into_sink();
    assert_eq!(forwarded.len(), 2);
    assert_eq!(forwarded[1].message_type, MessageType::AddOrder);
}
