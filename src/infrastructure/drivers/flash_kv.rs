//! Flash-backed key-value store.
//!
//! One 4 KiB settings block (layout in `bin_monitor_core::kvblock`) is read
//! into RAM at startup; every mutation updates the RAM copy and writes it
//! back with an erase cycle before returning, so a reboot immediately after
//! `set` never loses data.

use bin_monitor_core::error::StoreError;
use bin_monitor_core::kvblock::{BLOCK_SIZE, KvBlock, KvBlockMut};
use bin_monitor_core::ports::KeyValueStore;
use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};
#[cfg(feature = "log")]
use esp_println::println;
use esp_storage::FlashStorage;
use heapless::String;

pub struct FlashKeyValueStore {
    flash: *mut FlashStorage<'static>,
    offset: u32,
    block: [u8; BLOCK_SIZE],
}

// Safety: the store is owned by the provisioner behind the single usecases
// mutex; the raw pointer is never accessed concurrently from multiple tasks.
unsafe impl Send for FlashKeyValueStore {}

impl FlashKeyValueStore {
    /// Read the settings block from flash.
    ///
    /// A block that was never written (or fails to read) starts out empty;
    /// a degraded-but-alive store beats a boot-time panic on a field device.
    pub fn new(flash: *mut FlashStorage<'static>, offset: u32) -> Self {
        let mut block = [0u8; BLOCK_SIZE];
        // Safety: sole flash owner at construction time (boot is sequential).
        let result = unsafe { &mut *flash }.read(offset, &mut block);
        if result.is_err() {
            #[cfg(feature = "log")]
            println!("flash_kv: settings block unreadable, starting empty");
            block.fill(0);
        }

        Self {
            flash,
            offset,
            block,
        }
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        // Safety: mutation goes through the single write lock; no concurrent
        // flash access.
        let flash = unsafe { &mut *self.flash };
        flash
            .erase(self.offset, self.offset + BLOCK_SIZE as u32)
            .map_err(|_| StoreError::Driver)?;
        flash
            .write(self.offset, &self.block)
            .map_err(|_| StoreError::Driver)
    }

    fn view(&self) -> Result<KvBlock<'_>, StoreError> {
        KvBlock::new(&self.block).ok_or(StoreError::Driver)
    }

    fn view_mut(&mut self) -> Result<KvBlockMut<'_>, StoreError> {
        KvBlockMut::new(&mut self.block).ok_or(StoreError::Driver)
    }
}

impl KeyValueStore for FlashKeyValueStore {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.view_mut()?.set(key, value)?;
        self.persist()
    }

    fn get(&self, key: &str) -> Result<String<64>, StoreError> {
        self.view()?.get(key)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.view_mut()?.remove(key);
        self.persist()
    }

    fn contains(&self, key: &str) -> bool {
        self.view().is_ok_and(|block| block.contains(key))
    }
}
