//! Capability ports the core runs against.
//!
//! Each port gets one production adapter in the firmware crate and one
//! in-memory adapter in the unit tests, so the state machine can be exercised
//! without radio or flash hardware.

use embassy_time::Duration;
use heapless::{String, Vec};

use crate::entity::{ADDRESS_MAX_LEN, CollectionDate, PASSWORD_MAX_LEN, Property};
use crate::error::{PlatformError, ScheduleError, StoreError};

/// Durable string-keyed storage surviving power loss.
///
/// Existence is independent of value retrieval: an empty string is a legal
/// stored value and is not the same as an absent key. Every mutating call is
/// synchronously durable before returning.
pub trait KeyValueStore {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn get(&self, key: &str) -> Result<String<PASSWORD_MAX_LEN>, StoreError>;
    /// Removing an absent key succeeds
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    fn contains(&self, key: &str) -> bool;
}

/// Hardware-dependent network primitives.
///
/// `join_network` is the only capability allowed to suspend the caller; it
/// blocks until success, failure, or the timeout elapses. The other methods
/// complete promptly.
#[allow(async_fn_in_trait)]
pub trait Platform {
    /// Stable identifier derived from hardware
    fn unique_id(&self) -> u64;

    /// Bring up the setup access point (and its DNS capture responder)
    async fn start_access_point(
        &mut self,
        ssid: &str,
        password: &str,
    ) -> Result<(), PlatformError>;

    /// Join an existing network as a client, bounded by `timeout`
    async fn join_network(
        &mut self,
        ssid: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<(), PlatformError>;

    /// Local IPv4 address once a network is formed or joined
    fn local_address(&self) -> Option<String<ADDRESS_MAX_LEN>>;
}

/// Leveled diagnostic line sink. No return value, no failure propagation.
pub trait LogSink {
    fn debug(&self, line: &str);
    fn error(&self, line: &str);
}

/// Bounded-time network clock synchronization.
#[allow(async_fn_in_trait)]
pub trait ClockSync {
    /// Request a sync; returns whether it completed within `timeout`
    async fn sync(&mut self, timeout: Duration) -> bool;

    /// Epoch seconds of the most recent completed sync, if any.
    ///
    /// A slow sync that lands after its caller gave up still counts.
    fn last_sync_epoch(&self) -> Option<u64>;
}

/// Remote schedule collaborator boundary (consumed, not implemented here).
pub trait ScheduleSource {
    fn resolve_property(&self, search: &str) -> Result<Property, ScheduleError>;
    fn collection_dates(
        &self,
        account_key: &str,
    ) -> Result<Vec<CollectionDate, 8>, ScheduleError>;
}

/// The only shipped [`ScheduleSource`]: the collaborator has no verified
/// implementation, so every call reports it as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScheduleSource;

impl ScheduleSource for NoScheduleSource {
    fn resolve_property(&self, _search: &str) -> Result<Property, ScheduleError> {
        Err(ScheduleError::Unavailable)
    }

    fn collection_dates(
        &self,
        _account_key: &str,
    ) -> Result<Vec<CollectionDate, 8>, ScheduleError> {
        Err(ScheduleError::Unavailable)
    }
}
