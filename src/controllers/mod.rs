mod http;

use core::cell::RefCell;

use bin_monitor_core::Provisioner;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

pub use http::ConfigHttpController;

use crate::infrastructure::drivers::{EspPlatform, FlashKeyValueStore};
use crate::infrastructure::services::{SerialLog, SntpClock};

pub type AppProvisioner =
    Provisioner<EspPlatform, FlashKeyValueStore, SerialLog, SntpClock>;
pub type AppProvisionerRef = &'static mut AppProvisioner;

/// The single write lock over provisioning state and the settings store.
/// Every mutation from the configuration API goes through here.
static PROVISIONING_USECASES: Mutex<
    CriticalSectionRawMutex,
    RefCell<Option<AppProvisionerRef>>,
> = Mutex::new(RefCell::new(None));

pub fn init_controllers(usecases: AppProvisionerRef) -> ConfigHttpController {
    PROVISIONING_USECASES.lock(|cell| {
        cell.borrow_mut().replace(usecases);
    });

    ConfigHttpController::new()
}

/// Run `f` against the shared provisioner. `None` until `init_controllers`
/// has been called.
fn with_usecases<R>(f: impl FnOnce(&mut AppProvisioner) -> R) -> Option<R> {
    PROVISIONING_USECASES.lock(|cell| {
        let mut usecases_ref = cell.borrow_mut();
        usecases_ref.as_mut().map(|usecases| f(usecases))
    })
}
