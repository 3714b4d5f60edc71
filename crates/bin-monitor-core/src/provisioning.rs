//! The provisioning state machine.
//!
//! Decides at boot whether the device forms its own setup access point or
//! joins a previously stored network, and narrates every transition through
//! the log sink. Runs to completion before any configuration API traffic is
//! accepted.

use core::fmt::Write as _;

use embassy_time::Duration;
use heapless::String;

use crate::credentials::CredentialStore;
use crate::entity::{ConnectionOutcome, ProvisioningState, SyncStatus};
use crate::error::StoreError;
use crate::identity::{AP_PASSWORD, ap_ssid};
use crate::ports::{ClockSync, KeyValueStore, LogSink, Platform};
use crate::timesync::TimeSyncService;

const LOG_LINE_CAPACITY: usize = 160;

type Line = String<LOG_LINE_CAPACITY>;

pub struct Provisioner<P, S, L, C>
where
    P: Platform,
    S: KeyValueStore,
    L: LogSink,
    C: ClockSync,
{
    platform: P,
    credentials: CredentialStore<S>,
    log: L,
    timesync: TimeSyncService<C>,
    join_timeout: Duration,
    sync_timeout: Duration,
    state: ProvisioningState,
    connection: Option<ConnectionOutcome>,
}

impl<P, S, L, C> Provisioner<P, S, L, C>
where
    P: Platform,
    S: KeyValueStore,
    L: LogSink,
    C: ClockSync,
{
    pub fn new(
        platform: P,
        credentials: CredentialStore<S>,
        log: L,
        clock: C,
        join_timeout: Duration,
        sync_timeout: Duration,
    ) -> Self {
        Self {
            platform,
            credentials,
            log,
            timesync: TimeSyncService::new(clock),
            join_timeout,
            sync_timeout,
            state: ProvisioningState::Uninitialized,
            connection: None,
        }
    }

    /// Run the boot sequence to completion.
    ///
    /// Transitions synchronously through AP setup or client connect; the only
    /// suspension points are the bounded `join_network` call and the bounded
    /// clock sync that follows a successful join.
    pub async fn boot(&mut self) {
        self.log.debug("Starting system...");

        if self.credentials.has_credentials() {
            self.connect_client().await;
        } else {
            self.enter_ap_setup().await;
        }
    }

    async fn enter_ap_setup(&mut self) {
        self.log
            .debug("No Wifi credentials set, going into AP mode for setup...");
        self.state = ProvisioningState::ApSetup;

        let ssid = ap_ssid(self.platform.unique_id());
        if let Err(e) = self.platform.start_access_point(ssid.as_str(), AP_PASSWORD).await {
            let mut line = Line::new();
            let _ = write!(
                line,
                "Failed to start access point ({e:?}); no setup network until reboot"
            );
            self.log.error(line.as_str());
            return;
        }

        let address = self.platform.local_address().unwrap_or_default();
        let mut line = Line::new();
        let _ = write!(
            line,
            "AP is up, SSID {} with password {} on ip: {}",
            ssid.as_str(),
            AP_PASSWORD,
            address.as_str()
        );
        self.log.debug(line.as_str());

        self.connection = Some(ConnectionOutcome {
            ssid,
            password: String::try_from(AP_PASSWORD).unwrap_or_default(),
            address,
        });
    }

    async fn connect_client(&mut self) {
        self.state = ProvisioningState::ClientConnecting;

        let creds = match self.credentials.load() {
            Ok(creds) => creds,
            Err(e) => {
                // has_credentials was true, so this is storage corruption
                let mut line = Line::new();
                let _ = write!(line, "Failed to load stored credentials ({e:?})");
                self.log.error(line.as_str());
                self.state = ProvisioningState::ConnectFailed;
                return;
            }
        };

        let mut line = Line::new();
        let _ = write!(
            line,
            "Wifi credentials found, connecting to SSID {}",
            creds.ssid.as_str()
        );
        self.log.debug(line.as_str());

        let joined = self
            .platform
            .join_network(
                creds.ssid.as_str(),
                creds.password.as_str(),
                self.join_timeout,
            )
            .await;

        if let Err(e) = joined {
            let mut line = Line::new();
            let _ = write!(
                line,
                "Failed to join SSID {} ({e:?}); reboot or re-provision to retry",
                creds.ssid.as_str()
            );
            self.log.error(line.as_str());
            self.state = ProvisioningState::ConnectFailed;
            return;
        }

        let address = self.platform.local_address().unwrap_or_default();
        let mut line = Line::new();
        let _ = write!(
            line,
            "Connected to SSID {} on ip {}",
            creds.ssid.as_str(),
            address.as_str()
        );
        self.log.debug(line.as_str());

        self.connection = Some(ConnectionOutcome {
            ssid: creds.ssid,
            password: creds.password,
            address,
        });
        self.state = ProvisioningState::Connected;

        // Sync outcome never blocks the Connected state: the device has
        // network access whether or not the clock landed.
        if self.timesync.sync(self.sync_timeout).await {
            self.log.debug("Clock synchronized");
        } else {
            self.log
                .error("Clock sync did not complete; continuing without time");
        }
    }

    /// Persist new credentials supplied through the configuration API.
    ///
    /// Legal in every state so a mis-provisioned device can be corrected.
    /// The device keeps its current state; the operator reboots to apply.
    pub fn submit_credentials(
        &mut self,
        ssid: &str,
        password: &str,
    ) -> Result<(), StoreError> {
        self.credentials.save(ssid, password)?;

        let mut line = Line::new();
        let _ = write!(line, "Stored credentials for SSID {ssid}; reboot to apply");
        self.log.debug(line.as_str());
        Ok(())
    }

    pub fn state(&self) -> ProvisioningState {
        self.state
    }

    pub fn connection(&self) -> Option<&ConnectionOutcome> {
        self.connection.as_ref()
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.has_credentials()
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.timesync.status()
    }
}
