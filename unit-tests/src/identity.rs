//! Setup network naming.

use bin_monitor_core::identity::{AP_PASSWORD, ap_ssid, xor_fold};

#[test]
fn xor_fold_known_vector() {
    assert_eq!(xor_fold(0x00AA_BBCC_DDEE_0011), 255);
}

#[test]
fn xor_fold_zero_id() {
    assert_eq!(xor_fold(0), 0);
}

#[test]
fn xor_fold_is_byte_order_insensitive_to_duplicates() {
    // Equal byte pairs cancel out
    assert_eq!(xor_fold(0xABAB_0000_0000_0000), 0);
}

#[test]
fn ap_ssid_concatenates_base_and_fold() {
    assert_eq!(ap_ssid(0x00AA_BBCC_DDEE_0011).as_str(), "Bin Monitor 255");
    assert_eq!(ap_ssid(0).as_str(), "Bin Monitor 0");
}

#[test]
fn ap_password_is_fixed() {
    assert_eq!(AP_PASSWORD, "setup8888");
}
