#![no_std]
#![no_main]

use bin_monitor::config::{
    BUILD_VERSION,
    JOIN_TIMEOUT,
    NTP_SYNC_TIMEOUT,
    SETTINGS_PARTITION_OFFSET,
};
use bin_monitor::controllers::{AppProvisioner, init_controllers};
use bin_monitor::infrastructure::drivers::{
    EspPlatform,
    FlashKeyValueStore,
    active_stack,
};
use bin_monitor::infrastructure::services::{SerialLog, SntpClock};
use bin_monitor::infrastructure::tasks::http_server_task;
use bin_monitor::mk_static;
use bin_monitor_core::CredentialStore;
use embassy_executor::Spawner;
use embassy_time::Duration;
use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};
use esp_storage::FlashStorage;
use static_cell::StaticCell;

esp_bootloader_esp_idf::esp_app_desc!();

static FLASH_STORAGE: StaticCell<FlashStorage<'static>> = StaticCell::new();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    esp_println::println!("Bin Monitor {}", BUILD_VERSION);

    // Initialize hardware
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Allocate heap memory (64 + 32 KB)
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );
    esp_alloc::heap_allocator!(size: 32 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Initialize the settings store on its flash partition
    let flash = FLASH_STORAGE.init(FlashStorage::new(peripherals.FLASH));
    let flash_ptr = flash as *mut FlashStorage<'static>;
    let store = FlashKeyValueStore::new(flash_ptr, SETTINGS_PARTITION_OFFSET);

    // Run the provisioning boot sequence to completion: either the setup AP
    // comes up or the stored network is joined (and the clock synced).
    let platform = EspPlatform::new(spawner, peripherals.WIFI);
    let usecases = mk_static!(
        AppProvisioner,
        AppProvisioner::new(
            platform,
            CredentialStore::new(store),
            SerialLog,
            SntpClock::new(),
            JOIN_TIMEOUT,
            NTP_SYNC_TIMEOUT,
        )
    );
    usecases.boot().await;

    let controller = init_controllers(usecases);

    // Serve the configuration API on whichever network mode came up; after a
    // failed join there is no stack and nothing to serve until reboot.
    if let Some(stack) = active_stack() {
        spawner.spawn(http_server_task(stack, controller)).ok();
    }

    loop {
        embassy_time::Timer::after(Duration::from_secs(5)).await;
    }
}
