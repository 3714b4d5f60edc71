//! JSON bodies of the configuration API.

use bin_monitor_core::SyncStatus;
use bin_monitor_core::dto::{Message, SyncStatusResponse, WifiCredentialsRequest};

#[test]
fn wifi_credentials_request_deserializes() {
    let body = br#"{"network_name":"home-net","network_password":"hunter2"}"#;
    let (request, _) = serde_json_core::from_slice::<WifiCredentialsRequest>(body)
        .expect("well-formed body must parse");

    assert_eq!(request.network_name.as_str(), "home-net");
    assert_eq!(request.network_password.as_str(), "hunter2");
}

#[test]
fn oversize_network_name_fails_to_deserialize() {
    let long = "x".repeat(33);
    let body = format!(r#"{{"network_name":"{long}","network_password":""}}"#);

    assert!(serde_json_core::from_slice::<WifiCredentialsRequest>(body.as_bytes())
        .is_err());
}

#[test]
fn sync_status_response_serializes_both_shapes() {
    let mut buf = [0_u8; 128];

    let synced = SyncStatusResponse::from(SyncStatus {
        last_sync_epoch: Some(1_700_000_000),
    });
    let n = serde_json_core::to_slice(&synced, &mut buf).unwrap();
    assert_eq!(
        core::str::from_utf8(&buf[..n]).unwrap(),
        r#"{"synced":true,"last_sync_epoch":1700000000}"#
    );

    let unsynced = SyncStatusResponse::from(SyncStatus::default());
    let n = serde_json_core::to_slice(&unsynced, &mut buf).unwrap();
    assert_eq!(
        core::str::from_utf8(&buf[..n]).unwrap(),
        r#"{"synced":false,"last_sync_epoch":null}"#
    );
}

#[test]
fn canned_messages_serialize() {
    let mut buf = [0_u8; 64];
    let n = serde_json_core::to_slice(&Message::NOT_FOUND, &mut buf).unwrap();
    assert_eq!(
        core::str::from_utf8(&buf[..n]).unwrap(),
        r#"{"message":"Not found"}"#
    );

    let n = serde_json_core::to_slice(&Message::NOT_AVAILABLE, &mut buf).unwrap();
    assert_eq!(
        core::str::from_utf8(&buf[..n]).unwrap(),
        r#"{"message":"Not available"}"#
    );
}
