//! SNTP packet codec.

use bin_monitor_core::sntp::{PACKET_SIZE, build_request, parse_reply};

/// Seconds between the NTP era and the Unix epoch.
const ERA_OFFSET: u64 = 2_208_988_800;

fn reply(first_byte: u8, stratum: u8, ntp_secs: u32) -> [u8; PACKET_SIZE] {
    let mut packet = [0_u8; PACKET_SIZE];
    packet[0] = first_byte;
    packet[1] = stratum;
    packet[40..44].copy_from_slice(&ntp_secs.to_be_bytes());
    packet
}

#[test]
fn request_is_a_version_four_client_packet() {
    let mut packet = [0xFF_u8; PACKET_SIZE];
    build_request(&mut packet);

    assert_eq!(packet[0], 0x23, "LI 0, VN 4, mode 3");
    assert!(packet[1..].iter().all(|&byte| byte == 0));
}

#[test]
fn server_reply_converts_to_unix_epoch() {
    let unix = 1_700_000_000_u64;
    let ntp = u32::try_from(unix + ERA_OFFSET).unwrap();

    // LI 0, VN 4, mode 4 (server)
    assert_eq!(parse_reply(&reply(0x24, 2, ntp)), Some(unix));
}

#[test]
fn non_server_replies_are_rejected() {
    let ntp = u32::try_from(1_700_000_000 + ERA_OFFSET).unwrap();

    // Mode 3 is a client packet bounced back
    assert_eq!(parse_reply(&reply(0x23, 2, ntp)), None);
}

#[test]
fn kiss_of_death_is_rejected() {
    let ntp = u32::try_from(1_700_000_000 + ERA_OFFSET).unwrap();
    assert_eq!(parse_reply(&reply(0x24, 0, ntp)), None);
}

#[test]
fn pre_epoch_timestamps_and_short_packets_are_rejected() {
    assert_eq!(parse_reply(&reply(0x24, 2, 1000)), None);
    assert_eq!(parse_reply(&[0x24; 47]), None);
}
