//! Wildcard DNS capture codec.
//!
//! While the setup AP is active every name query on the subnet resolves to
//! the device's own address, so whatever probe a client OS sends lands on the
//! captive portal. Parsing and response building are pure; the UDP socket
//! work lives in the firmware task.

use core::net::Ipv4Addr;

/// DNS server port
pub const DNS_PORT: u16 = 53;

/// Largest response we ever build: the echoed question plus one A record
pub const MAX_RESPONSE_SIZE: usize = 512;

const HEADER_SIZE: usize = 12;
const QTYPE_A: u16 = 1;
const QTYPE_ANY: u16 = 255;
const CLASS_IN: u16 = 1;
/// Response flags: QR, AA, RD echoed, RA
const RESPONSE_FLAGS: u16 = 0x8580;
const ANSWER_TTL: u32 = 60;

/// A parsed question we intend to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsQuestion {
    /// Offset one past the question section (QNAME + QTYPE + QCLASS)
    pub question_end: usize,
    pub qtype: u16,
}

/// Parse the first question of a query packet.
///
/// Returns `None` for responses, truncated packets, or packets without a
/// question; those are dropped silently.
pub fn parse_question(packet: &[u8]) -> Option<DnsQuestion> {
    if packet.len() < HEADER_SIZE {
        return None;
    }

    let flags = u16::from_be_bytes([packet[2], packet[3]]);
    // QR bit set means this is itself a response
    if flags & 0x8000 != 0 {
        return None;
    }

    let qdcount = u16::from_be_bytes([packet[4], packet[5]]);
    if qdcount == 0 {
        return None;
    }

    // Walk the QNAME labels
    let mut i = HEADER_SIZE;
    loop {
        let len = *packet.get(i)? as usize;
        if len == 0 {
            i += 1;
            break;
        }
        // Compression pointers never appear in a question name
        if len & 0xC0 != 0 {
            return None;
        }
        i += 1 + len;
    }

    let qtype = u16::from_be_bytes([*packet.get(i)?, *packet.get(i + 1)?]);
    let qclass = u16::from_be_bytes([*packet.get(i + 2)?, *packet.get(i + 3)?]);
    if qclass != CLASS_IN {
        return None;
    }

    Some(DnsQuestion {
        question_end: i + 4,
        qtype,
    })
}

/// True if we answer this question with the capture address.
pub fn should_capture(question: &DnsQuestion) -> bool {
    question.qtype == QTYPE_A || question.qtype == QTYPE_ANY
}

/// Build the capture response: the echoed question plus a single A record
/// pointing at `capture_address`.
///
/// Returns the response length, or `None` if the buffers do not fit.
pub fn build_response(
    request: &[u8],
    question: &DnsQuestion,
    capture_address: Ipv4Addr,
    out: &mut [u8],
) -> Option<usize> {
    let echoed = request.get(..question.question_end)?;
    // 16 bytes of answer: name pointer, type, class, ttl, rdlength, rdata
    let total = echoed.len() + 16;
    if out.len() < total {
        return None;
    }

    out[..echoed.len()].copy_from_slice(echoed);
    out[2..4].copy_from_slice(&RESPONSE_FLAGS.to_be_bytes());
    out[4..6].copy_from_slice(&1u16.to_be_bytes()); // QDCOUNT
    out[6..8].copy_from_slice(&1u16.to_be_bytes()); // ANCOUNT
    out[8..12].fill(0); // NSCOUNT, ARCOUNT

    let mut i = echoed.len();
    // Pointer back to the name at offset 12
    out[i..i + 2].copy_from_slice(&0xC00C_u16.to_be_bytes());
    out[i + 2..i + 4].copy_from_slice(&QTYPE_A.to_be_bytes());
    out[i + 4..i + 6].copy_from_slice(&CLASS_IN.to_be_bytes());
    out[i + 6..i + 10].copy_from_slice(&ANSWER_TTL.to_be_bytes());
    out[i + 10..i + 12].copy_from_slice(&4u16.to_be_bytes());
    i += 12;
    out[i..i + 4].copy_from_slice(&capture_address.octets());

    Some(total)
}
