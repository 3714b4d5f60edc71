//! DHCP responder task for the setup access point.
//!
//! Hands out MAC-derived leases on the setup subnet so clients can reach the
//! captive portal. Packet layout lives in `bin_monitor_core::dhcp`; this task
//! only moves datagrams.

use bin_monitor_core::dhcp::{
    DHCP_CLIENT_PORT,
    DHCP_SERVER_PORT,
    MAX_PACKET_SIZE,
    allocate_address,
    build_reply,
    parse_request,
};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{Ipv4Address, Stack};
#[cfg(feature = "log")]
use esp_println::println;

#[embassy_executor::task]
pub async fn dhcp_server_task(stack: Stack<'static>, server_ip: Ipv4Address) {
    let mut rx_meta = [PacketMetadata::EMPTY; 8];
    let mut rx_buffer = [0u8; 1024];
    let mut tx_meta = [PacketMetadata::EMPTY; 8];
    let mut tx_buffer = [0u8; 1024];

    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if socket.bind(DHCP_SERVER_PORT).is_err() {
        #[cfg(feature = "log")]
        println!("dhcp_server: failed to bind port {}", DHCP_SERVER_PORT);
        return;
    }
    #[cfg(feature = "log")]
    println!("dhcp_server: listening on port {}", DHCP_SERVER_PORT);

    let mut packet = [0u8; MAX_PACKET_SIZE];
    let mut reply = [0u8; MAX_PACKET_SIZE];

    loop {
        let Ok((len, _remote)) = socket.recv_from(&mut packet).await else {
            continue;
        };

        // Anything malformed or not DISCOVER/REQUEST is dropped
        let Some(request) = parse_request(&packet[..len]) else {
            continue;
        };
        let Some(reply_type) = request.reply_type() else {
            continue;
        };

        let offered = allocate_address(server_ip, &request.client_mac);
        #[cfg(feature = "log")]
        println!(
            "dhcp_server: type {} from {:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X} -> {}",
            request.message_type,
            request.client_mac[0],
            request.client_mac[1],
            request.client_mac[2],
            request.client_mac[3],
            request.client_mac[4],
            request.client_mac[5],
            offered
        );

        let reply_len = build_reply(&mut reply, &request, server_ip, offered, reply_type);
        let dest = (Ipv4Address::BROADCAST, DHCP_CLIENT_PORT);
        if let Err(_error) = socket.send_to(&reply[..reply_len], dest).await {
            #[cfg(feature = "log")]
            println!("dhcp_server: send error: {:?}", _error);
        }
    }
}
