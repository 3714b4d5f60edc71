//! Wildcard DNS capture task for the setup access point.
//!
//! Every A/ANY query on the setup subnet is answered with the device's own
//! address, which is what routes client connectivity probes to the captive
//! portal.

use bin_monitor_core::dns::{
    DNS_PORT,
    MAX_RESPONSE_SIZE,
    build_response,
    parse_question,
    should_capture,
};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{Ipv4Address, Stack};
#[cfg(feature = "log")]
use esp_println::println;

#[embassy_executor::task]
pub async fn dns_capture_task(stack: Stack<'static>, capture_address: Ipv4Address) {
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

    if socket.bind(DNS_PORT).is_err() {
        #[cfg(feature = "log")]
        println!("dns_capture: failed to bind port {}", DNS_PORT);
        return;
    }
    #[cfg(feature = "log")]
    println!("dns_capture: listening on port {}", DNS_PORT);

    let mut packet = [0u8; MAX_RESPONSE_SIZE];
    let mut response = [0u8; MAX_RESPONSE_SIZE];

    loop {
        let Ok((len, remote)) = socket.recv_from(&mut packet).await else {
            continue;
        };

        let Some(question) = parse_question(&packet[..len]) else {
            continue;
        };
        if !should_capture(&question) {
            continue;
        }

        let Some(response_len) =
            build_response(&packet[..len], &question, capture_address, &mut response)
        else {
            continue;
        };

        if let Err(_error) = socket.send_to(&response[..response_len], remote).await {
            #[cfg(feature = "log")]
            println!("dns_capture: send error: {:?}", _error);
        }
    }
}
