//! Latching sync status.

use bin_monitor_core::TimeSyncService;
use embassy_time::Duration;

use crate::support::{ScriptedClock, block_on};

const TIMEOUT: Duration = Duration::from_secs(10);

#[test]
fn unsynced_until_a_sync_completes() {
    let mut service = TimeSyncService::new(ScriptedClock::broken());

    assert!(!service.is_synced());
    assert!(!block_on(service.sync(TIMEOUT)));
    assert!(!service.is_synced());
    assert_eq!(service.status().last_sync_epoch, None);
}

#[test]
fn is_synced_latches_across_later_failures() {
    let clock = ScriptedClock::scripted(1_700_000_000, &[true, false]);
    let mut service = TimeSyncService::new(clock);

    assert!(block_on(service.sync(TIMEOUT)));
    assert!(service.is_synced());

    // A later failed sync does not un-sync the clock
    assert!(!block_on(service.sync(TIMEOUT)));
    assert!(service.is_synced());
    assert_eq!(service.status().last_sync_epoch, Some(1_700_000_000));
}

#[test]
fn failure_then_success_lands() {
    let clock = ScriptedClock::scripted(1_700_000_000, &[false, true]);
    let mut service = TimeSyncService::new(clock);

    assert!(!block_on(service.sync(TIMEOUT)));
    assert!(!service.is_synced());

    assert!(block_on(service.sync(TIMEOUT)));
    assert_eq!(service.status().last_sync_epoch, Some(1_700_000_000));
}
