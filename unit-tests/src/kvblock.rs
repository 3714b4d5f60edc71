//! Flash settings block layout.

use bin_monitor_core::error::StoreError;
use bin_monitor_core::kvblock::{BLOCK_SIZE, KvBlock, KvBlockMut};

/// Fresh-from-erase flash reads all ones.
fn erased_block() -> Vec<u8> {
    vec![0xFF; BLOCK_SIZE]
}

#[test]
fn wrapping_requires_exactly_one_block() {
    let mut short = vec![0xFF; BLOCK_SIZE - 1];
    assert!(KvBlock::new(&short).is_none());
    assert!(KvBlockMut::new(&mut short).is_none());

    let mut exact = erased_block();
    assert!(KvBlock::new(&exact).is_some());
    assert!(KvBlockMut::new(&mut exact).is_some());
}

#[test]
fn erased_block_contains_nothing() {
    let data = erased_block();
    let block = KvBlock::new(&data).unwrap();

    assert!(!block.contains("WifiSSID"));
    assert_eq!(block.get("WifiSSID"), Err(StoreError::NotFound));
}

#[test]
fn set_then_get_survives_a_reread() {
    let mut data = erased_block();
    KvBlockMut::new(&mut data)
        .unwrap()
        .set("WifiSSID", "home-net")
        .unwrap();

    // A fresh view over the same bytes models a reboot
    let block = KvBlock::new(&data).unwrap();
    assert!(block.contains("WifiSSID"));
    assert_eq!(block.get("WifiSSID").unwrap().as_str(), "home-net");
}

#[test]
fn set_replaces_existing_value_in_place() {
    let mut data = erased_block();
    let mut block = KvBlockMut::new(&mut data).unwrap();
    block.set("WifiSSID", "old-net").unwrap();
    block.set("WifiPassword", "pw").unwrap();
    block.set("WifiSSID", "new-net").unwrap();

    let view = KvBlock::new(&data).unwrap();
    assert_eq!(view.get("WifiSSID").unwrap().as_str(), "new-net");
    assert_eq!(view.get("WifiPassword").unwrap().as_str(), "pw");
}

#[test]
fn empty_value_is_stored_distinct_from_absent() {
    let mut data = erased_block();
    KvBlockMut::new(&mut data).unwrap().set("key", "").unwrap();

    let view = KvBlock::new(&data).unwrap();
    assert!(view.contains("key"));
    assert_eq!(view.get("key").unwrap().as_str(), "");
}

#[test]
fn remove_frees_the_slot_and_tolerates_absent_keys() {
    let mut data = erased_block();
    let mut block = KvBlockMut::new(&mut data).unwrap();
    block.set("key", "value").unwrap();

    block.remove("key");
    block.remove("never-stored");

    let view = KvBlock::new(&data).unwrap();
    assert_eq!(view.get("key"), Err(StoreError::NotFound));
}

#[test]
fn oversize_inputs_are_rejected() {
    let mut data = erased_block();
    let mut block = KvBlockMut::new(&mut data).unwrap();

    let long_key = "k".repeat(33);
    assert_eq!(block.set(&long_key, "v"), Err(StoreError::InvalidInput));

    let long_value = "v".repeat(65);
    assert_eq!(block.set("key", &long_value), Err(StoreError::InvalidInput));

    assert_eq!(block.set("", "v"), Err(StoreError::InvalidInput));
}

#[test]
fn limit_sized_entry_fits_a_slot() {
    let mut data = erased_block();
    let key = "k".repeat(32);
    let value = "v".repeat(64);
    KvBlockMut::new(&mut data).unwrap().set(&key, &value).unwrap();

    assert_eq!(KvBlock::new(&data).unwrap().get(&key).unwrap().as_str(), value);
}

#[test]
fn distinct_keys_occupy_distinct_slots() {
    let mut data = erased_block();
    let mut block = KvBlockMut::new(&mut data).unwrap();
    for i in 0..8 {
        block.set(&format!("key-{i}"), &format!("value-{i}")).unwrap();
    }

    let view = KvBlock::new(&data).unwrap();
    for i in 0..8 {
        assert_eq!(
            view.get(&format!("key-{i}")).unwrap().as_str(),
            format!("value-{i}")
        );
    }
}
