//! Route table of the configuration API surface.
//!
//! Kept free of socket types so routing decisions are host-testable; the
//! firmware's HTTP layer parses the request line into a [`Method`] and path
//! and acts on the resolved [`Route`].

use crate::entity::ProvisioningState;

/// HTTP request method.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl Method {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "PATCH" => Method::Patch,
            "OPTIONS" => Method::Options,
            "HEAD" => Method::Head,
            _ => return None,
        })
    }
}

/// A resolved configuration API route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Route {
    /// `POST /api/wifi-credentials` — persist a new credential pair
    SetWifiCredentials,
    /// `GET /api/datetime` — report the clock sync status
    GetDateTime,
    /// `POST /api/datetime` — accepted no-op (manual clock set is out of scope)
    SetDateTime,
    /// `GET /api/location` — schedule collaborator, not available yet
    GetLocation,
    /// `POST /api/location` — schedule collaborator, not available yet
    SetLocation,
    /// `GET /api/collection-dates` — schedule collaborator, not available yet
    GetCollectionDates,
    /// Anything else; answered with 404, or the captive portal page while the
    /// setup AP is active
    Unmatched,
}

impl Route {
    pub fn resolve(method: Method, path: &str) -> Self {
        match (method, path) {
            (Method::Post, "/api/wifi-credentials") => Route::SetWifiCredentials,
            (Method::Get, "/api/datetime") => Route::GetDateTime,
            (Method::Post, "/api/datetime") => Route::SetDateTime,
            (Method::Get, "/api/location") => Route::GetLocation,
            (Method::Post, "/api/location") => Route::SetLocation,
            (Method::Get, "/api/collection-dates") => Route::GetCollectionDates,
            _ => Route::Unmatched,
        }
    }
}

/// How an [`Route::Unmatched`] request is answered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnmatchedDisposition {
    /// Serve the captive portal page
    CaptivePortal,
    /// Plain 404
    NotFound,
}

/// While the setup access point is active every stray host and path gets the
/// portal page, so OS connectivity checks land a browser on the setup form.
/// In every other state an unmatched request is an ordinary 404.
pub fn unmatched_disposition(state: ProvisioningState) -> UnmatchedDisposition {
    if state == ProvisioningState::ApSetup {
        UnmatchedDisposition::CaptivePortal
    } else {
        UnmatchedDisposition::NotFound
    }
}
