//! SNTP (RFC 4330) packet codec.
//!
//! Only the client request and the server's transmit timestamp matter here;
//! round-trip compensation is pointless next to a whole-second clock.

/// NTP server port
pub const SNTP_PORT: u16 = 123;

/// SNTP packets are exactly 48 bytes
pub const PACKET_SIZE: usize = 48;

/// Seconds between the NTP era (1900) and the Unix epoch (1970)
const UNIX_ERA_OFFSET: u64 = 2_208_988_800;

/// LI = 0, VN = 4, Mode = 3 (client)
const CLIENT_FIRST_BYTE: u8 = 0x23;
const MODE_MASK: u8 = 0x07;
const MODE_SERVER: u8 = 4;

const TRANSMIT_TIMESTAMP_OFFSET: usize = 40;

/// Fill `buf` with a client request.
pub fn build_request(buf: &mut [u8; PACKET_SIZE]) {
    buf.fill(0);
    buf[0] = CLIENT_FIRST_BYTE;
}

/// Extract Unix epoch seconds from a server reply.
///
/// Returns `None` for short packets, non-server responses, kiss-of-death
/// answers (stratum 0), or timestamps before the Unix epoch.
pub fn parse_reply(packet: &[u8]) -> Option<u64> {
    if packet.len() < PACKET_SIZE {
        return None;
    }
    if packet[0] & MODE_MASK != MODE_SERVER {
        return None;
    }
    // Stratum 0 is a kiss-of-death packet
    if packet[1] == 0 {
        return None;
    }

    let secs = u64::from(u32::from_be_bytes([
        packet[TRANSMIT_TIMESTAMP_OFFSET],
        packet[TRANSMIT_TIMESTAMP_OFFSET + 1],
        packet[TRANSMIT_TIMESTAMP_OFFSET + 2],
        packet[TRANSMIT_TIMESTAMP_OFFSET + 3],
    ]));

    secs.checked_sub(UNIX_ERA_OFFSET)
}
