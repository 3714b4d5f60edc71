//! Stateless DHCP responder codec for the setup subnet.
//!
//! Clients joining the setup AP need a lease before the captive portal can
//! catch them. Leases are derived from the client MAC, so the server keeps no
//! table. Socket work lives in the firmware task; everything here is pure.

use core::net::Ipv4Addr;

/// DHCP server and client ports
pub const DHCP_SERVER_PORT: u16 = 67;
pub const DHCP_CLIENT_PORT: u16 = 68;

/// Largest packet we parse or build
pub const MAX_PACKET_SIZE: usize = 576;

pub const MESSAGE_DISCOVER: u8 = 1;
pub const MESSAGE_OFFER: u8 = 2;
pub const MESSAGE_REQUEST: u8 = 3;
pub const MESSAGE_ACK: u8 = 5;

const OPTION_SUBNET_MASK: u8 = 1;
const OPTION_ROUTER: u8 = 3;
const OPTION_DNS: u8 = 6;
const OPTION_LEASE_TIME: u8 = 51;
const OPTION_MESSAGE_TYPE: u8 = 53;
const OPTION_SERVER_ID: u8 = 54;
const OPTION_END: u8 = 255;

const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];
const OPTIONS_OFFSET: usize = 240;

const LEASE_TIME_SECS: u32 = 3600;
const SUBNET_MASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);

/// The parts of a BOOTREQUEST the responder acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhcpRequest {
    pub transaction_id: [u8; 4],
    pub client_mac: [u8; 6],
    pub message_type: u8,
}

impl DhcpRequest {
    /// What we answer with, if anything.
    pub fn reply_type(&self) -> Option<u8> {
        match self.message_type {
            MESSAGE_DISCOVER => Some(MESSAGE_OFFER),
            MESSAGE_REQUEST => Some(MESSAGE_ACK),
            _ => None,
        }
    }
}

/// Parse a DHCP BOOTREQUEST. Returns `None` for anything malformed or not a
/// request; those are ignored.
pub fn parse_request(packet: &[u8]) -> Option<DhcpRequest> {
    if packet.len() < OPTIONS_OFFSET {
        return None;
    }
    // op must be BOOTREQUEST
    if packet[0] != 1 {
        return None;
    }
    if packet[236..240] != MAGIC_COOKIE {
        return None;
    }

    let mut transaction_id = [0u8; 4];
    transaction_id.copy_from_slice(&packet[4..8]);
    let mut client_mac = [0u8; 6];
    client_mac.copy_from_slice(&packet[28..34]);

    let message_type = find_option(&packet[OPTIONS_OFFSET..], OPTION_MESSAGE_TYPE)
        .and_then(|data| data.first().copied())?;

    Some(DhcpRequest {
        transaction_id,
        client_mac,
        message_type,
    })
}

/// Derive a stable lease for a client from its MAC.
///
/// Stays inside `server_ip`'s /24 in the range .2 - .50.
pub fn allocate_address(server_ip: Ipv4Addr, mac: &[u8; 6]) -> Ipv4Addr {
    let [a, b, c, _] = server_ip.octets();
    Ipv4Addr::new(a, b, c, (mac[5] % 49) + 2)
}

/// Build an OFFER or ACK into `buffer`; returns the packet length.
///
/// The server advertises itself as gateway and DNS so every client lookup
/// reaches the capture responder.
pub fn build_reply(
    buffer: &mut [u8],
    request: &DhcpRequest,
    server_ip: Ipv4Addr,
    offered_ip: Ipv4Addr,
    reply_type: u8,
) -> usize {
    buffer.fill(0);

    buffer[0] = 2; // op: BOOTREPLY
    buffer[1] = 1; // htype: Ethernet
    buffer[2] = 6; // hlen
    buffer[4..8].copy_from_slice(&request.transaction_id);
    buffer[10..12].copy_from_slice(&[0x80, 0x00]); // broadcast flag
    buffer[16..20].copy_from_slice(&offered_ip.octets()); // yiaddr
    buffer[20..24].copy_from_slice(&server_ip.octets()); // siaddr
    buffer[28..34].copy_from_slice(&request.client_mac); // chaddr
    buffer[236..240].copy_from_slice(&MAGIC_COOKIE);

    let mut writer = OptionWriter {
        buffer,
        at: OPTIONS_OFFSET,
    };
    writer.put(OPTION_MESSAGE_TYPE, &[reply_type]);
    writer.put(OPTION_SERVER_ID, &server_ip.octets());
    writer.put(OPTION_LEASE_TIME, &LEASE_TIME_SECS.to_be_bytes());
    writer.put(OPTION_SUBNET_MASK, &SUBNET_MASK.octets());
    writer.put(OPTION_ROUTER, &server_ip.octets());
    writer.put(OPTION_DNS, &server_ip.octets());
    writer.end()
}

struct OptionWriter<'a> {
    buffer: &'a mut [u8],
    at: usize,
}

impl OptionWriter<'_> {
    fn put(&mut self, code: u8, data: &[u8]) {
        self.buffer[self.at] = code;
        self.buffer[self.at + 1] = data.len() as u8;
        self.buffer[self.at + 2..self.at + 2 + data.len()].copy_from_slice(data);
        self.at += 2 + data.len();
    }

    fn end(self) -> usize {
        self.buffer[self.at] = OPTION_END;
        self.at + 1
    }
}

fn find_option(options: &[u8], wanted: u8) -> Option<&[u8]> {
    let mut i = 0;
    while i < options.len() {
        let code = options[i];
        if code == OPTION_END {
            break;
        }
        if code == 0 {
            i += 1;
            continue;
        }
        let len = *options.get(i + 1)? as usize;
        let data = options.get(i + 2..i + 2 + len)?;
        if code == wanted {
            return Some(data);
        }
        i += 2 + len;
    }
    None
}
