//! Bounded-time network clock synchronization.

use embassy_time::Duration;

use crate::entity::SyncStatus;
use crate::ports::ClockSync;

/// Wraps a [`ClockSync`] capability with the latching sync status the
/// configuration API reports.
#[derive(Debug)]
pub struct TimeSyncService<C: ClockSync> {
    clock: C,
}

impl<C: ClockSync> TimeSyncService<C> {
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Request a sync; returns whether it completed within `timeout`.
    /// Failure is non-fatal, callers tolerate an unsynchronized clock
    /// indefinitely.
    pub async fn sync(&mut self, timeout: Duration) -> bool {
        self.clock.sync(timeout).await
    }

    /// True iff a sync has ever completed since boot. A sync that lands
    /// after its caller's timeout still counts once it lands.
    pub fn is_synced(&self) -> bool {
        self.clock.last_sync_epoch().is_some()
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            last_sync_epoch: self.clock.last_sync_epoch(),
        }
    }
}
