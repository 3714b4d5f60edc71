//! Stateless DHCP responder codec.

use core::net::Ipv4Addr;

use bin_monitor_core::dhcp::{
    MAX_PACKET_SIZE,
    MESSAGE_ACK,
    MESSAGE_DISCOVER,
    MESSAGE_OFFER,
    MESSAGE_REQUEST,
    allocate_address,
    build_reply,
    parse_request,
};

const SERVER: Ipv4Addr = Ipv4Addr::new(10, 100, 1, 1);
const MAC: [u8; 6] = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x2A];

/// Build a minimal BOOTREQUEST carrying one message-type option.
fn request(message_type: u8) -> Vec<u8> {
    let mut packet = vec![0_u8; 300];
    packet[0] = 1; // BOOTREQUEST
    packet[1] = 1; // Ethernet
    packet[2] = 6;
    packet[4..8].copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
    packet[28..34].copy_from_slice(&MAC);
    packet[236..240].copy_from_slice(&[99, 130, 83, 99]);
    packet[240..243].copy_from_slice(&[53, 1, message_type]);
    packet[243] = 255;
    packet
}

/// Scan the options section of a reply for one option's payload.
fn find_option(reply: &[u8], wanted: u8) -> Option<&[u8]> {
    let mut i = 240;
    while i < reply.len() && reply[i] != 255 {
        let code = reply[i];
        let len = reply[i + 1] as usize;
        if code == wanted {
            return Some(&reply[i + 2..i + 2 + len]);
        }
        i += 2 + len;
    }
    None
}

#[test]
fn discover_parses_and_maps_to_offer() {
    let parsed = parse_request(&request(MESSAGE_DISCOVER)).unwrap();

    assert_eq!(parsed.transaction_id, [0x11, 0x22, 0x33, 0x44]);
    assert_eq!(parsed.client_mac, MAC);
    assert_eq!(parsed.message_type, MESSAGE_DISCOVER);
    assert_eq!(parsed.reply_type(), Some(MESSAGE_OFFER));
}

#[test]
fn request_maps_to_ack_and_others_are_ignored() {
    let parsed = parse_request(&request(MESSAGE_REQUEST)).unwrap();
    assert_eq!(parsed.reply_type(), Some(MESSAGE_ACK));

    // DHCPINFORM gets no reply
    assert_eq!(parse_request(&request(8)).unwrap().reply_type(), None);
}

#[test]
fn malformed_packets_are_dropped() {
    // Not a BOOTREQUEST
    let mut reply_op = request(MESSAGE_DISCOVER);
    reply_op[0] = 2;
    assert!(parse_request(&reply_op).is_none());

    // Missing magic cookie
    let mut no_cookie = request(MESSAGE_DISCOVER);
    no_cookie[236..240].fill(0);
    assert!(parse_request(&no_cookie).is_none());

    // Truncated before the options section
    assert!(parse_request(&request(MESSAGE_DISCOVER)[..200]).is_none());
}

#[test]
fn leases_are_stable_and_inside_the_pool() {
    let first = allocate_address(SERVER, &MAC);
    let second = allocate_address(SERVER, &MAC);
    assert_eq!(first, second, "same MAC always gets the same lease");

    for last_byte in 0..=255_u8 {
        let mut mac = MAC;
        mac[5] = last_byte;
        let lease = allocate_address(SERVER, &mac);
        let octets = lease.octets();
        assert_eq!(&octets[..3], &SERVER.octets()[..3]);
        assert!((2..=50).contains(&octets[3]), "lease {lease} out of pool");
    }
}

#[test]
fn reply_advertises_the_server_as_gateway_and_dns() {
    let parsed = parse_request(&request(MESSAGE_DISCOVER)).unwrap();
    let offered = allocate_address(SERVER, &parsed.client_mac);
    let mut reply = [0_u8; MAX_PACKET_SIZE];

    let len = build_reply(&mut reply, &parsed, SERVER, offered, MESSAGE_OFFER);
    let reply = &reply[..len];

    assert_eq!(reply[0], 2, "BOOTREPLY");
    assert_eq!(&reply[4..8], &parsed.transaction_id);
    assert_eq!(&reply[16..20], &offered.octets());
    assert_eq!(&reply[28..34], &parsed.client_mac);

    assert_eq!(find_option(reply, 53).unwrap(), &[MESSAGE_OFFER]);
    assert_eq!(find_option(reply, 54).unwrap(), &SERVER.octets());
    assert_eq!(find_option(reply, 3).unwrap(), &SERVER.octets());
    assert_eq!(find_option(reply, 6).unwrap(), &SERVER.octets());
    assert_eq!(find_option(reply, 1).unwrap(), &[255, 255, 255, 0]);
    assert_eq!(find_option(reply, 51).unwrap(), &3600_u32.to_be_bytes());
}
