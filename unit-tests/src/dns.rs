//! Wildcard DNS capture codec.

use core::net::Ipv4Addr;

use bin_monitor_core::dns::{
    MAX_RESPONSE_SIZE,
    build_response,
    parse_question,
    should_capture,
};

const CAPTURE: Ipv4Addr = Ipv4Addr::new(10, 100, 1, 1);

/// Build a single-question query for `labels` with the given QTYPE.
fn query(id: u16, labels: &[&str], qtype: u16) -> Vec<u8> {
    let mut packet = Vec::new();
    packet.extend_from_slice(&id.to_be_bytes());
    packet.extend_from_slice(&0x0100_u16.to_be_bytes()); // RD
    packet.extend_from_slice(&1_u16.to_be_bytes()); // QDCOUNT
    packet.extend_from_slice(&[0; 6]); // AN/NS/AR counts
    for label in labels {
        packet.push(label.len() as u8);
        packet.extend_from_slice(label.as_bytes());
    }
    packet.push(0);
    packet.extend_from_slice(&qtype.to_be_bytes());
    packet.extend_from_slice(&1_u16.to_be_bytes()); // IN
    packet
}

#[test]
fn parses_an_a_question() {
    let packet = query(0x1234, &["connectivitycheck", "example", "com"], 1);

    let question = parse_question(&packet).unwrap();
    assert_eq!(question.question_end, packet.len());
    assert_eq!(question.qtype, 1);
    assert!(should_capture(&question));
}

#[test]
fn any_queries_are_captured_but_aaaa_is_not() {
    let any = query(1, &["example", "com"], 255);
    assert!(should_capture(&parse_question(&any).unwrap()));

    let aaaa = query(2, &["example", "com"], 28);
    assert!(!should_capture(&parse_question(&aaaa).unwrap()));
}

#[test]
fn responses_and_malformed_packets_are_dropped() {
    // QR bit set: this is itself a response
    let mut response = query(1, &["example", "com"], 1);
    response[2] |= 0x80;
    assert!(parse_question(&response).is_none());

    // No question
    let mut empty = query(1, &["example", "com"], 1);
    empty[4..6].copy_from_slice(&0_u16.to_be_bytes());
    assert!(parse_question(&empty).is_none());

    // Compression pointer in a question name
    let mut compressed = query(1, &["example", "com"], 1);
    compressed[12] = 0xC0;
    assert!(parse_question(&compressed).is_none());

    // Non-IN class
    let mut chaos = query(1, &["example", "com"], 1);
    let len = chaos.len();
    chaos[len - 2..].copy_from_slice(&3_u16.to_be_bytes());
    assert!(parse_question(&chaos).is_none());

    // Truncated header
    assert!(parse_question(&[0_u8; 11]).is_none());
}

#[test]
fn capture_response_answers_with_the_ap_address() {
    let packet = query(0x1234, &["example", "com"], 1);
    let question = parse_question(&packet).unwrap();
    let mut out = [0_u8; MAX_RESPONSE_SIZE];

    let len = build_response(&packet, &question, CAPTURE, &mut out).unwrap();
    let response = &out[..len];

    // Transaction id is echoed, QR/AA/RD/RA flags are set
    assert_eq!(&response[..2], &0x1234_u16.to_be_bytes());
    assert_eq!(&response[2..4], &0x8580_u16.to_be_bytes());
    assert_eq!(&response[4..6], &1_u16.to_be_bytes());
    assert_eq!(&response[6..8], &1_u16.to_be_bytes());

    // Question section is echoed verbatim
    assert_eq!(&response[12..question.question_end], &packet[12..]);

    // Single A answer via a name pointer, pointing at the capture address
    let answer = &response[question.question_end..];
    assert_eq!(&answer[..2], &0xC00C_u16.to_be_bytes());
    assert_eq!(&answer[2..4], &1_u16.to_be_bytes());
    assert_eq!(&answer[10..12], &4_u16.to_be_bytes());
    assert_eq!(&answer[12..16], &CAPTURE.octets());
}

#[test]
fn build_response_refuses_a_short_buffer() {
    let packet = query(1, &["example", "com"], 1);
    let question = parse_question(&packet).unwrap();
    let mut out = [0_u8; 16];

    assert!(build_response(&packet, &question, CAPTURE, &mut out).is_none());
}
