use esp_hal::rng::Rng;

/// Hardware-derived seed for the network stack, so TCP sequence numbers and
/// ephemeral ports differ between boots.
pub(crate) fn get_seed() -> u64 {
    let rng = Rng::new();
    u64::from(rng.random()) << 32 | u64::from(rng.random())
}
