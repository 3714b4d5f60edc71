use heapless::String;
use serde::Serialize;

/// Maximum SSID length accepted anywhere in the firmware
pub const SSID_MAX_LEN: usize = 32;
/// Maximum network password length
pub const PASSWORD_MAX_LEN: usize = 64;
/// Enough for a dotted-quad IPv4 address
pub const ADDRESS_MAX_LEN: usize = 16;

/// Stored network credentials.
///
/// Both fields are present or the pair does not exist at all; the credential
/// store never hands out a partially populated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String<SSID_MAX_LEN>,
    pub password: String<PASSWORD_MAX_LEN>,
}

/// Result of a successful network bring-up (AP started or network joined).
///
/// Produced transiently by a connect attempt; consumed by the log narration
/// and by status queries. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOutcome {
    pub ssid: String<SSID_MAX_LEN>,
    pub password: String<PASSWORD_MAX_LEN>,
    pub address: String<ADDRESS_MAX_LEN>,
}

/// Provisioning state of the device.
///
/// Exactly one instance exists, owned and mutated only by the
/// [`Provisioner`](crate::provisioning::Provisioner); everything else
/// observes it read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProvisioningState {
    #[default]
    Uninitialized,
    /// Setup network is (or should be) up, captive portal active
    ApSetup,
    /// Stored credentials found, join in progress
    ClientConnecting,
    /// Joined an existing network
    Connected,
    /// Join failed or timed out; recovery is operator-triggered
    ConnectFailed,
}

/// Clock synchronization status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStatus {
    /// Unix epoch seconds of the most recent completed sync, if any
    pub last_sync_epoch: Option<u64>,
}

impl SyncStatus {
    pub const fn is_synced(self) -> bool {
        self.last_sync_epoch.is_some()
    }
}

/// A resolved property, as the remote schedule collaborator would return it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub address: String<96>,
    pub account_key: String<32>,
}

/// A single collection date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}
