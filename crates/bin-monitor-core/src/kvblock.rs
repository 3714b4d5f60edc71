//! Key-value layout of the settings flash block.
//!
//! One 4 KiB erase block holds a fixed number of slots; each slot carries a
//! magic header, a key, and a value. The firmware driver reads the block into
//! RAM, mutates it through [`KvBlockMut`], and writes it back with an erase
//! cycle. Keeping the layout pure makes the power-loss format host-testable.

use heapless::String;

use crate::entity::PASSWORD_MAX_LEN;
use crate::error::StoreError;

/// Size of one flash erase block
pub const BLOCK_SIZE: usize = 4096;

const SLOT_SIZE: usize = 128;
const SLOT_COUNT: usize = BLOCK_SIZE / SLOT_SIZE;

/// Marks an occupied slot; anything else (0xFFFF after erase) is free
const MAGIC_HEADER: u16 = 0xBEEF;
const MAGIC_SIZE: usize = 2;

/// Slot layout: magic u16 | key_len u8 | value_len u8 | key bytes | value bytes
const KEY_MAX_LEN: usize = 32;
const VALUE_MAX_LEN: usize = PASSWORD_MAX_LEN;
const HEADER_SIZE: usize = MAGIC_SIZE + 2;

/// Read-only view over one settings block.
pub struct KvBlock<'a> {
    data: &'a [u8],
}

impl<'a> KvBlock<'a> {
    /// Wrap a block buffer. Returns `None` unless it is exactly one block.
    pub fn new(data: &'a [u8]) -> Option<Self> {
        (data.len() == BLOCK_SIZE).then_some(Self { data })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Copy out the value stored under `key`. Distinguishes the empty string
    /// from an absent key.
    pub fn get(&self, key: &str) -> Result<String<VALUE_MAX_LEN>, StoreError> {
        let slot = self.find(key).ok_or(StoreError::NotFound)?;
        let (_, value) = self.decode(slot).ok_or(StoreError::Driver)?;
        String::try_from(value).map_err(|()| StoreError::Driver)
    }

    fn find(&self, key: &str) -> Option<usize> {
        (0..SLOT_COUNT)
            .find(|&slot| matches!(self.decode(slot), Some((stored, _)) if stored == key))
    }

    fn first_free(&self) -> Option<usize> {
        (0..SLOT_COUNT).find(|&slot| !self.occupied(slot))
    }

    fn occupied(&self, slot: usize) -> bool {
        let base = slot * SLOT_SIZE;
        u16::from_le_bytes([self.data[base], self.data[base + 1]]) == MAGIC_HEADER
    }

    fn decode(&self, slot: usize) -> Option<(&str, &str)> {
        if !self.occupied(slot) {
            return None;
        }
        let base = slot * SLOT_SIZE;
        let key_len = self.data[base + MAGIC_SIZE] as usize;
        let value_len = self.data[base + MAGIC_SIZE + 1] as usize;
        if key_len == 0 || key_len > KEY_MAX_LEN || value_len > VALUE_MAX_LEN {
            return None;
        }
        let key_at = base + HEADER_SIZE;
        let key = core::str::from_utf8(&self.data[key_at..key_at + key_len]).ok()?;
        let value_at = key_at + key_len;
        let value =
            core::str::from_utf8(&self.data[value_at..value_at + value_len]).ok()?;
        Some((key, value))
    }
}

/// Mutable view over one settings block.
pub struct KvBlockMut<'a> {
    data: &'a mut [u8],
}

impl<'a> KvBlockMut<'a> {
    /// Wrap a block buffer. Returns `None` unless it is exactly one block.
    pub fn new(data: &'a mut [u8]) -> Option<Self> {
        (data.len() == BLOCK_SIZE).then_some(Self { data })
    }

    fn view(&self) -> KvBlock<'_> {
        KvBlock { data: self.data }
    }

    /// Write `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if key.is_empty() || key.len() > KEY_MAX_LEN || value.len() > VALUE_MAX_LEN {
            return Err(StoreError::InvalidInput);
        }

        let slot = match self.view().find(key) {
            Some(slot) => slot,
            None => self.view().first_free().ok_or(StoreError::Driver)?,
        };

        let base = slot * SLOT_SIZE;
        self.data[base..base + SLOT_SIZE].fill(0);
        self.data[base..base + MAGIC_SIZE]
            .copy_from_slice(&MAGIC_HEADER.to_le_bytes());
        self.data[base + MAGIC_SIZE] = key.len() as u8;
        self.data[base + MAGIC_SIZE + 1] = value.len() as u8;
        let key_at = base + HEADER_SIZE;
        self.data[key_at..key_at + key.len()].copy_from_slice(key.as_bytes());
        let value_at = key_at + key.len();
        self.data[value_at..value_at + value.len()].copy_from_slice(value.as_bytes());
        Ok(())
    }

    /// Free the slot holding `key`. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &str) {
        if let Some(slot) = self.view().find(key) {
            let base = slot * SLOT_SIZE;
            self.data[base..base + SLOT_SIZE].fill(0);
        }
    }
}
