use heapless::String;
use serde::{Deserialize, Serialize};

use crate::entity::{PASSWORD_MAX_LEN, SSID_MAX_LEN, SyncStatus};

/// Body of `POST /api/wifi-credentials`.
#[derive(Debug, Clone, Deserialize)]
pub struct WifiCredentialsRequest {
    pub network_name: String<SSID_MAX_LEN>,
    pub network_password: String<PASSWORD_MAX_LEN>,
}

/// Body of `GET /api/datetime`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SyncStatusResponse {
    pub synced: bool,
    pub last_sync_epoch: Option<u64>,
}

impl From<SyncStatus> for SyncStatusResponse {
    fn from(status: SyncStatus) -> Self {
        Self {
            synced: status.is_synced(),
            last_sync_epoch: status.last_sync_epoch,
        }
    }
}

/// Machine-readable error/info body, e.g. `{"message":"Not found"}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Message {
    pub message: &'static str,
}

impl Message {
    pub const NOT_FOUND: Message = Message {
        message: "Not found",
    };
    pub const NOT_AVAILABLE: Message = Message {
        message: "Not available",
    };
    pub const INVALID_NETWORK_NAME: Message = Message {
        message: "network_name must not be empty",
    };
}
