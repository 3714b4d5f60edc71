//! Setup network identity.

use core::fmt::Write as _;

use heapless::String;

use crate::entity::SSID_MAX_LEN;

/// Prefix of every setup network name
pub const AP_SSID_BASE: &str = "Bin Monitor ";

/// Fixed password of the setup network.
///
/// A known weakness, kept deliberately: the setup AP is a short-lived
/// bootstrap network, not a security boundary.
pub const AP_PASSWORD: &str = "setup8888";

/// Fold every byte of the device identifier into a single byte.
///
/// Two devices collide with probability ~1/256, acceptable for a
/// human-facing network name.
pub fn xor_fold(id: u64) -> u8 {
    id.to_le_bytes().iter().fold(0, |acc, byte| acc ^ byte)
}

/// Derive the setup AP name from the device identifier.
pub fn ap_ssid(id: u64) -> String<SSID_MAX_LEN> {
    let mut ssid = String::new();
    // "Bin Monitor " plus at most 3 decimal digits always fits
    let _ = write!(ssid, "{}{}", AP_SSID_BASE, xor_fold(id));
    ssid
}
