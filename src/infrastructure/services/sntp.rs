//! SNTP client over the active network stack.
//!
//! One request/reply exchange per sync; the packet layout lives in
//! `bin_monitor_core::sntp`. The result is kept as Unix epoch seconds, there
//! is no battery-backed clock to set.

use bin_monitor_core::ports::ClockSync;
use bin_monitor_core::sntp::{PACKET_SIZE, SNTP_PORT, build_request, parse_reply};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, Stack};
use embassy_time::{Duration, with_timeout};
#[cfg(feature = "log")]
use esp_println::println;

use crate::config;
use crate::infrastructure::drivers::active_stack;

const LOCAL_PORT: u16 = 50123;

#[derive(Debug, Default)]
pub struct SntpClock {
    last_epoch: Option<u64>,
}

impl SntpClock {
    pub fn new() -> Self {
        Self::default()
    }

    async fn exchange(stack: Stack<'static>) -> Option<u64> {
        let server = resolve_host(stack, config::NTP_HOST).await?;

        let mut rx_meta = [PacketMetadata::EMPTY; 4];
        let mut rx_buffer = [0u8; 256];
        let mut tx_meta = [PacketMetadata::EMPTY; 4];
        let mut tx_buffer = [0u8; 256];
        let mut socket = UdpSocket::new(
            stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(LOCAL_PORT).ok()?;

        let mut packet = [0u8; PACKET_SIZE];
        build_request(&mut packet);
        socket.send_to(&packet, (server, SNTP_PORT)).await.ok()?;

        let mut reply = [0u8; PACKET_SIZE];
        let (len, _) = socket.recv_from(&mut reply).await.ok()?;
        parse_reply(&reply[..len])
    }
}

impl ClockSync for SntpClock {
    async fn sync(&mut self, timeout: Duration) -> bool {
        let Some(stack) = active_stack() else {
            return false;
        };

        match with_timeout(timeout, Self::exchange(stack)).await {
            Ok(Some(epoch)) => {
                self.last_epoch = Some(epoch);
                true
            }
            Ok(None) => false,
            Err(_) => {
                #[cfg(feature = "log")]
                println!("sntp: no reply from {} within timeout", config::NTP_HOST);
                false
            }
        }
    }

    fn last_sync_epoch(&self) -> Option<u64> {
        self.last_epoch
    }
}

/// Resolve an NTP host, accepting IPv4 literals without a DNS round trip.
async fn resolve_host(stack: Stack<'static>, host: &str) -> Option<IpAddress> {
    if let Ok(ip) = host.parse::<embassy_net::Ipv4Address>() {
        return Some(IpAddress::Ipv4(ip));
    }

    let addresses = stack.dns_query(host, DnsQueryType::A).await.ok()?;
    addresses.first().copied()
}
