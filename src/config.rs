#![allow(clippy::unreadable_literal)]

use embassy_net::Ipv4Address;
use embassy_time::Duration;

pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Address of the setup access point; also the captive portal address
pub const AP_ADDRESS: Ipv4Address = Ipv4Address::new(10, 100, 1, 1);
pub const AP_PREFIX_LEN: u8 = 24;

/// DHCP hostname announced in client mode
pub const HOSTNAME: &str = "bin-monitor";

pub const HTTP_PORT: u16 = 80;

/// Upper bound for a stored-credential join attempt
pub const JOIN_TIMEOUT: Duration = Duration::from_secs(20);

/// Upper bound for the post-connect clock sync
pub const NTP_SYNC_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const NTP_HOST: &str = "pool.ntp.org";

/// Flash partition holding the settings key-value block
pub const SETTINGS_PARTITION_OFFSET: u32 = 0x31_0000;
