//! In-memory port adapters and a minimal executor for driving the core on
//! the host.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use bin_monitor_core::CredentialStore;
use bin_monitor_core::Provisioner;
use bin_monitor_core::error::{PlatformError, StoreError};
use bin_monitor_core::ports::{ClockSync, KeyValueStore, LogSink, Platform};
use embassy_time::Duration;

/// Drive a future to completion. Every adapter here resolves without
/// suspending, so a pending poll is a test bug.
pub fn block_on<F: Future>(future: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        fn noop(_: *const ()) {}
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut future = pin!(future);
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(output) => output,
        Poll::Pending => panic!("future suspended; test adapters must not block"),
    }
}

// -----------------------------------------------------------------------------
// Key-value store
// -----------------------------------------------------------------------------

/// Clone handles share the same backing map. A "reboot" in a test is a second
/// provisioner built over a clone of the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryStore {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.data.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<heapless::String<64>, StoreError> {
        let data = self.data.borrow();
        let value = data.get(key).ok_or(StoreError::NotFound)?;
        heapless::String::try_from(value.as_str()).map_err(|()| StoreError::Driver)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.data.borrow().contains_key(key)
    }
}

// -----------------------------------------------------------------------------
// Platform
// -----------------------------------------------------------------------------

/// Observation handle surviving the move of a [`FakePlatform`] into a
/// provisioner.
#[derive(Debug, Clone, Default)]
pub struct PlatformCalls {
    pub ap_starts: Rc<Cell<usize>>,
    pub joins: Rc<Cell<usize>>,
    pub last_ap_ssid: Rc<RefCell<String>>,
    pub last_join_ssid: Rc<RefCell<String>>,
}

pub struct FakePlatform {
    pub id: u64,
    pub ap_result: Result<(), PlatformError>,
    pub join_result: Result<(), PlatformError>,
    pub address: Option<&'static str>,
    pub calls: PlatformCalls,
}

impl FakePlatform {
    /// Every operation succeeds; the joined network hands out `address`.
    pub fn reachable(id: u64) -> Self {
        Self {
            id,
            ap_result: Ok(()),
            join_result: Ok(()),
            address: Some("192.168.1.17"),
            calls: PlatformCalls::default(),
        }
    }

    /// Join attempts time out, as with a stored network that moved away.
    pub fn unreachable(id: u64) -> Self {
        Self {
            join_result: Err(PlatformError::Timeout),
            ..Self::reachable(id)
        }
    }
}

impl Platform for FakePlatform {
    fn unique_id(&self) -> u64 {
        self.id
    }

    async fn start_access_point(
        &mut self,
        ssid: &str,
        _password: &str,
    ) -> Result<(), PlatformError> {
        self.calls.ap_starts.set(self.calls.ap_starts.get() + 1);
        *self.calls.last_ap_ssid.borrow_mut() = ssid.into();
        self.ap_result
    }

    async fn join_network(
        &mut self,
        ssid: &str,
        _password: &str,
        _timeout: Duration,
    ) -> Result<(), PlatformError> {
        self.calls.joins.set(self.calls.joins.get() + 1);
        *self.calls.last_join_ssid.borrow_mut() = ssid.into();
        self.join_result
    }

    fn local_address(&self) -> Option<heapless::String<16>> {
        let address = self.address?;
        heapless::String::try_from(address).ok()
    }
}

// -----------------------------------------------------------------------------
// Log sink
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RecordingLog {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingLog {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|line| line.contains(needle))
    }
}

impl LogSink for RecordingLog {
    fn debug(&self, line: &str) {
        self.lines.borrow_mut().push(format!("debug: {line}"));
    }

    fn error(&self, line: &str) {
        self.lines.borrow_mut().push(format!("error: {line}"));
    }
}

// -----------------------------------------------------------------------------
// Clock
// -----------------------------------------------------------------------------

pub struct ScriptedClock {
    /// Outcome of each successive sync call; the last entry repeats
    script: Vec<bool>,
    epoch: u64,
    landed: Option<u64>,
    pub syncs: Rc<Cell<usize>>,
}

impl ScriptedClock {
    pub fn working(epoch: u64) -> Self {
        Self::scripted(epoch, &[true])
    }

    pub fn broken() -> Self {
        Self::scripted(0, &[false])
    }

    pub fn scripted(epoch: u64, script: &[bool]) -> Self {
        Self {
            script: script.to_vec(),
            epoch,
            landed: None,
            syncs: Rc::default(),
        }
    }
}

impl ClockSync for ScriptedClock {
    async fn sync(&mut self, _timeout: Duration) -> bool {
        let call = self.syncs.get();
        self.syncs.set(call + 1);
        let succeed = *self
            .script
            .get(call)
            .or(self.script.last())
            .unwrap_or(&false);
        if succeed {
            self.landed = Some(self.epoch);
        }
        succeed
    }

    fn last_sync_epoch(&self) -> Option<u64> {
        self.landed
    }
}

// -----------------------------------------------------------------------------
// Wiring
// -----------------------------------------------------------------------------

pub type TestProvisioner =
    Provisioner<FakePlatform, MemoryStore, RecordingLog, ScriptedClock>;

pub fn provisioner(
    platform: FakePlatform,
    store: MemoryStore,
    log: RecordingLog,
    clock: ScriptedClock,
) -> TestProvisioner {
    Provisioner::new(
        platform,
        CredentialStore::new(store),
        log,
        clock,
        Duration::from_secs(20),
        Duration::from_secs(10),
    )
}
