mod flash_kv;
mod random;
pub mod wifi;

pub use flash_kv::FlashKeyValueStore;
pub(crate) use random::get_seed;
pub use wifi::EspPlatform;
pub use wifi::active_stack;
