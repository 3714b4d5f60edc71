//! Configuration API route resolution.

use bin_monitor_core::api::{Method, Route, UnmatchedDisposition, unmatched_disposition};
use bin_monitor_core::entity::ProvisioningState;

#[test]
fn method_parsing() {
    assert_eq!(Method::parse("GET"), Some(Method::Get));
    assert_eq!(Method::parse("POST"), Some(Method::Post));
    assert_eq!(Method::parse("DELETE"), Some(Method::Delete));
    assert_eq!(Method::parse("get"), None, "methods are case sensitive");
    assert_eq!(Method::parse("BREW"), None);
}

#[test]
fn known_routes_resolve() {
    assert_eq!(
        Route::resolve(Method::Post, "/api/wifi-credentials"),
        Route::SetWifiCredentials
    );
    assert_eq!(Route::resolve(Method::Get, "/api/datetime"), Route::GetDateTime);
    assert_eq!(Route::resolve(Method::Post, "/api/datetime"), Route::SetDateTime);
    assert_eq!(Route::resolve(Method::Get, "/api/location"), Route::GetLocation);
    assert_eq!(Route::resolve(Method::Post, "/api/location"), Route::SetLocation);
    assert_eq!(
        Route::resolve(Method::Get, "/api/collection-dates"),
        Route::GetCollectionDates
    );
}

#[test]
fn wrong_method_or_unknown_path_is_unmatched() {
    assert_eq!(
        Route::resolve(Method::Get, "/api/wifi-credentials"),
        Route::Unmatched
    );
    assert_eq!(Route::resolve(Method::Delete, "/api/datetime"), Route::Unmatched);
    assert_eq!(Route::resolve(Method::Get, "/"), Route::Unmatched);
    assert_eq!(
        Route::resolve(Method::Get, "/generate_204"),
        Route::Unmatched,
        "OS connectivity checks fall through to the unmatched handler"
    );
}

// ---- unmatched requests ----

#[test]
fn unmatched_serves_portal_while_ap_is_active() {
    assert_eq!(
        unmatched_disposition(ProvisioningState::ApSetup),
        UnmatchedDisposition::CaptivePortal,
        "any stray host or path must land on the setup page, never a 404"
    );
}

#[test]
fn unmatched_is_not_found_outside_ap_setup() {
    for state in [
        ProvisioningState::Uninitialized,
        ProvisioningState::ClientConnecting,
        ProvisioningState::Connected,
        ProvisioningState::ConnectFailed,
    ] {
        assert_eq!(
            unmatched_disposition(state),
            UnmatchedDisposition::NotFound,
            "{state:?} must not hijack unknown paths"
        );
    }
}
