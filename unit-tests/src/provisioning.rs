//! Boot sequence and credential submission behavior.

use bin_monitor_core::ProvisioningState;
use bin_monitor_core::error::{PlatformError, StoreError};

use crate::support::{
    FakePlatform,
    MemoryStore,
    RecordingLog,
    ScriptedClock,
    block_on,
    provisioner,
};

const DEVICE_ID: u64 = 0x00AA_BBCC_DDEE_0011;

fn store_with_credentials(ssid: &str, password: &str) -> MemoryStore {
    let store = MemoryStore::default();
    let mut p = provisioner(
        FakePlatform::reachable(DEVICE_ID),
        store.clone(),
        RecordingLog::default(),
        ScriptedClock::working(0),
    );
    p.submit_credentials(ssid, password)
        .expect("seeding credentials must succeed");
    store
}

#[test]
fn boot_without_credentials_enters_ap_setup() {
    let platform = FakePlatform::reachable(DEVICE_ID);
    let calls = platform.calls.clone();
    let log = RecordingLog::default();
    let mut p = provisioner(
        platform,
        MemoryStore::default(),
        log.clone(),
        ScriptedClock::working(1_700_000_000),
    );

    block_on(p.boot());

    assert_eq!(p.state(), ProvisioningState::ApSetup);
    assert_eq!(calls.ap_starts.get(), 1);
    assert_eq!(calls.joins.get(), 0, "setup mode must never attempt a join");
    assert_eq!(calls.last_ap_ssid.borrow().as_str(), "Bin Monitor 255");
    assert!(log.contains("No Wifi credentials set"));
    assert!(log.contains("AP is up, SSID Bin Monitor 255 with password setup8888"));
    assert!(!p.sync_status().is_synced(), "setup mode has no network time");
}

#[test]
fn failed_ap_start_stays_in_ap_setup() {
    let platform = FakePlatform {
        ap_result: Err(PlatformError::Hardware),
        ..FakePlatform::reachable(DEVICE_ID)
    };
    let log = RecordingLog::default();
    let mut p = provisioner(
        platform,
        MemoryStore::default(),
        log.clone(),
        ScriptedClock::working(0),
    );

    block_on(p.boot());

    assert_eq!(p.state(), ProvisioningState::ApSetup);
    assert!(log.contains("Failed to start access point"));
    assert!(p.connection().is_none());
}

#[test]
fn boot_with_credentials_connects_and_syncs_once() {
    let store = store_with_credentials("home-net", "hunter2");
    let platform = FakePlatform::reachable(DEVICE_ID);
    let calls = platform.calls.clone();
    let clock = ScriptedClock::working(1_700_000_000);
    let syncs = clock.syncs.clone();
    let log = RecordingLog::default();
    let mut p = provisioner(platform, store, log.clone(), clock);

    block_on(p.boot());

    assert_eq!(p.state(), ProvisioningState::Connected);
    assert_eq!(calls.joins.get(), 1);
    assert_eq!(calls.ap_starts.get(), 0);
    assert_eq!(calls.last_join_ssid.borrow().as_str(), "home-net");
    assert_eq!(syncs.get(), 1, "the clock is synced exactly once at boot");
    assert_eq!(p.sync_status().last_sync_epoch, Some(1_700_000_000));
    assert!(log.contains("Wifi credentials found, connecting to SSID home-net"));
    assert!(log.contains("Clock synchronized"));

    let connection = p.connection().expect("connected boot records an outcome");
    assert_eq!(connection.ssid.as_str(), "home-net");
    assert_eq!(connection.address.as_str(), "192.168.1.17");
}

#[test]
fn failed_join_sets_connect_failed_and_never_syncs() {
    let store = store_with_credentials("home-net", "hunter2");
    let platform = FakePlatform::unreachable(DEVICE_ID);
    let calls = platform.calls.clone();
    let clock = ScriptedClock::working(1_700_000_000);
    let syncs = clock.syncs.clone();
    let log = RecordingLog::default();
    let mut p = provisioner(platform, store, log.clone(), clock);

    block_on(p.boot());

    assert_eq!(p.state(), ProvisioningState::ConnectFailed);
    assert_eq!(calls.joins.get(), 1, "no automatic retry after a failed join");
    assert_eq!(syncs.get(), 0, "a failed join must not touch the clock");
    assert!(log.contains("Failed to join SSID home-net"));
    assert!(!p.sync_status().is_synced());
}

#[test]
fn clock_sync_failure_does_not_block_connected() {
    let store = store_with_credentials("home-net", "hunter2");
    let log = RecordingLog::default();
    let mut p = provisioner(
        FakePlatform::reachable(DEVICE_ID),
        store,
        log.clone(),
        ScriptedClock::broken(),
    );

    block_on(p.boot());

    assert_eq!(p.state(), ProvisioningState::Connected);
    assert!(!p.sync_status().is_synced());
    assert!(log.contains("Clock sync did not complete"));
}

#[test]
fn submitted_credentials_take_effect_on_next_boot() {
    let store = MemoryStore::default();
    let log = RecordingLog::default();
    let mut first = provisioner(
        FakePlatform::reachable(DEVICE_ID),
        store.clone(),
        log.clone(),
        ScriptedClock::working(0),
    );
    block_on(first.boot());
    assert_eq!(first.state(), ProvisioningState::ApSetup);

    first
        .submit_credentials("home-net", "hunter2")
        .expect("valid credentials must persist");
    // Submission does not change the running state; a reboot applies it
    assert_eq!(first.state(), ProvisioningState::ApSetup);
    assert!(log.contains("Stored credentials for SSID home-net; reboot to apply"));

    let platform = FakePlatform::reachable(DEVICE_ID);
    let calls = platform.calls.clone();
    let mut second = provisioner(
        platform,
        store,
        RecordingLog::default(),
        ScriptedClock::working(0),
    );
    block_on(second.boot());

    assert_eq!(second.state(), ProvisioningState::Connected);
    assert_eq!(calls.last_join_ssid.borrow().as_str(), "home-net");
}

#[test]
fn re_provisioning_overwrites_stored_credentials() {
    let store = store_with_credentials("old-net", "old-pass");
    let platform = FakePlatform::reachable(DEVICE_ID);
    let calls = platform.calls.clone();
    let mut p = provisioner(
        platform,
        store.clone(),
        RecordingLog::default(),
        ScriptedClock::working(0),
    );
    block_on(p.boot());
    assert_eq!(p.state(), ProvisioningState::Connected);

    p.submit_credentials("new-net", "new-pass")
        .expect("re-provisioning is legal in every state");

    assert_eq!(calls.last_join_ssid.borrow().as_str(), "old-net");

    let reboot_platform = FakePlatform::reachable(DEVICE_ID);
    let reboot_calls = reboot_platform.calls.clone();
    let mut rebooted = provisioner(
        reboot_platform,
        store,
        RecordingLog::default(),
        ScriptedClock::working(0),
    );
    block_on(rebooted.boot());
    assert_eq!(rebooted.state(), ProvisioningState::Connected);
    assert_eq!(reboot_calls.last_join_ssid.borrow().as_str(), "new-net");
}

#[test]
fn empty_ssid_is_rejected_and_store_unchanged() {
    let platform = FakePlatform::reachable(DEVICE_ID);
    let mut p = provisioner(
        platform,
        MemoryStore::default(),
        RecordingLog::default(),
        ScriptedClock::working(0),
    );
    block_on(p.boot());

    assert_eq!(p.submit_credentials("", "pw"), Err(StoreError::InvalidInput));
    assert!(!p.has_credentials());
}

#[test]
fn empty_password_joins_open_network() {
    let store = store_with_credentials("open-net", "");
    let platform = FakePlatform::reachable(DEVICE_ID);
    let calls = platform.calls.clone();
    let mut p = provisioner(
        platform,
        store,
        RecordingLog::default(),
        ScriptedClock::working(0),
    );

    block_on(p.boot());

    assert_eq!(p.state(), ProvisioningState::Connected);
    assert_eq!(calls.last_join_ssid.borrow().as_str(), "open-net");
}
