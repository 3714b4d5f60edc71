//! Typed credential accessors over a key-value store.

use bin_monitor_core::CredentialStore;
use bin_monitor_core::credentials::{KEY_WIFI_PASSWORD, KEY_WIFI_SSID};
use bin_monitor_core::error::StoreError;
use bin_monitor_core::ports::KeyValueStore as _;

use crate::support::MemoryStore;

#[test]
fn save_then_load_round_trip() {
    let mut store = CredentialStore::new(MemoryStore::default());

    store.save("home-net", "hunter2").unwrap();

    assert!(store.has_credentials());
    let creds = store.load().unwrap();
    assert_eq!(creds.ssid.as_str(), "home-net");
    assert_eq!(creds.password.as_str(), "hunter2");
}

#[test]
fn empty_password_is_a_legal_stored_value() {
    let mut store = CredentialStore::new(MemoryStore::default());

    store.save("open-net", "").unwrap();

    assert!(store.has_credentials(), "empty value is not an absent key");
    assert_eq!(store.load().unwrap().password.as_str(), "");
}

#[test]
fn load_with_either_key_absent_is_not_found() {
    let mut backing = MemoryStore::default();
    backing.set(KEY_WIFI_SSID, "half-net").unwrap();
    let store = CredentialStore::new(backing.clone());

    assert!(!store.has_credentials());
    assert_eq!(store.load(), Err(StoreError::NotFound));

    backing.remove(KEY_WIFI_SSID).unwrap();
    backing.set(KEY_WIFI_PASSWORD, "orphan").unwrap();
    assert!(!store.has_credentials());
    assert_eq!(store.load(), Err(StoreError::NotFound));
}

#[test]
fn save_rejects_empty_or_oversize_ssid() {
    let mut store = CredentialStore::new(MemoryStore::default());

    assert_eq!(store.save("", "pw"), Err(StoreError::InvalidInput));

    let long = "x".repeat(33);
    assert_eq!(store.save(&long, "pw"), Err(StoreError::InvalidInput));

    assert!(!store.has_credentials());
}

#[test]
fn thirty_two_byte_ssid_is_accepted() {
    let mut store = CredentialStore::new(MemoryStore::default());
    let ssid = "x".repeat(32);

    store.save(&ssid, "pw").unwrap();

    assert_eq!(store.load().unwrap().ssid.as_str(), ssid);
}

#[test]
fn clear_is_idempotent() {
    let mut store = CredentialStore::new(MemoryStore::default());
    store.save("home-net", "hunter2").unwrap();

    store.clear().unwrap();
    assert!(!store.has_credentials());

    store.clear().unwrap();
    assert!(!store.has_credentials());
}
