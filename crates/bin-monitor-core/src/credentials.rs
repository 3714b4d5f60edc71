//! Typed accessors for the persisted network credentials.

use heapless::String;

use crate::entity::{Credentials, SSID_MAX_LEN};
use crate::error::StoreError;
use crate::ports::KeyValueStore;

/// Reserved key for the network name
pub const KEY_WIFI_SSID: &str = "WifiSSID";
/// Reserved key for the network password
pub const KEY_WIFI_PASSWORD: &str = "WifiPassword";

/// Wraps a [`KeyValueStore`] with typed credential accessors.
///
/// This service exclusively owns the serialized representation of
/// [`Credentials`]; nothing else writes the reserved keys.
#[derive(Debug)]
pub struct CredentialStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// True iff both reserved keys exist.
    pub fn has_credentials(&self) -> bool {
        self.store.contains(KEY_WIFI_SSID) && self.store.contains(KEY_WIFI_PASSWORD)
    }

    /// Load the stored pair. Fails with `NotFound` if either key is absent;
    /// never returns a partially populated value.
    pub fn load(&self) -> Result<Credentials, StoreError> {
        let ssid = self.store.get(KEY_WIFI_SSID)?;
        let password = self.store.get(KEY_WIFI_PASSWORD)?;

        let mut short = String::<SSID_MAX_LEN>::new();
        short
            .push_str(ssid.as_str())
            .map_err(|()| StoreError::InvalidInput)?;

        Ok(Credentials {
            ssid: short,
            password,
        })
    }

    /// Persist both keys. Durable before returning, so the caller may reboot
    /// immediately after.
    pub fn save(&mut self, ssid: &str, password: &str) -> Result<(), StoreError> {
        if ssid.is_empty() || ssid.len() > SSID_MAX_LEN {
            return Err(StoreError::InvalidInput);
        }
        self.store.set(KEY_WIFI_SSID, ssid)?;
        self.store.set(KEY_WIFI_PASSWORD, password)
    }

    /// Remove both keys. Idempotent.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.remove(KEY_WIFI_SSID)?;
        self.store.remove(KEY_WIFI_PASSWORD)
    }
}
