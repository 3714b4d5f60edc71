//! Hardware-independent core of the Bin Monitor firmware.
//!
//! Everything here compiles on the host: the provisioning state machine, the
//! credential store, the capability ports it runs against, and the small wire
//! codecs (DNS capture, DHCP, SNTP, flash key-value block) used by the
//! network tasks. The firmware crate supplies the production adapters.

#![no_std]

pub mod api;
pub mod credentials;
pub mod dhcp;
pub mod dns;
pub mod dto;
pub mod entity;
pub mod error;
pub mod identity;
pub mod kvblock;
pub mod ports;
pub mod provisioning;
pub mod sntp;
pub mod timesync;

pub use credentials::CredentialStore;
pub use entity::{Credentials, ConnectionOutcome, ProvisioningState, SyncStatus};
pub use error::{PlatformError, ScheduleError, StoreError};
pub use provisioning::Provisioner;
pub use timesync::TimeSyncService;
