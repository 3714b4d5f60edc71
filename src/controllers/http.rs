//! Configuration API controller.
//!
//! Serves the credential submission and clock status endpoints, and answers
//! unmatched paths with the captive portal page while the setup access point
//! is active.

use core::fmt::Write as _;

use bin_monitor_core::api::{Route, UnmatchedDisposition, unmatched_disposition};
use bin_monitor_core::dto::{Message, SyncStatusResponse, WifiCredentialsRequest};
use bin_monitor_core::entity::ProvisioningState;
use bin_monitor_core::error::{ScheduleError, StoreError};
use bin_monitor_core::ports::{NoScheduleSource, ScheduleSource};
use heapless::String;

use super::with_usecases;
use crate::config;
use crate::core::net::http::{
    ContentHeaders,
    ContentType,
    HttpConnection,
    HttpHandler,
    HttpResult,
    ResponseHeaders,
    TextEncoding,
};

const PORTAL_PAGE_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
pub struct ConfigHttpController {
    schedule: NoScheduleSource,
}

impl ConfigHttpController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpHandler for ConfigHttpController {
    async fn handle_request(&self, conn: HttpConnection<'_>) -> HttpResult {
        let mut conn = conn;
        let route = {
            let (method, path) = conn.route();
            Route::resolve(method, path)
        };

        match route {
            Route::SetWifiCredentials => handle_set_credentials(&mut conn).await,
            Route::GetDateTime => handle_get_datetime(&mut conn).await,
            Route::SetDateTime => {
                // Manual clock set is accepted but has no effect; SNTP owns
                // the clock.
                conn.write_headers(&ResponseHeaders::success_no_content())
                    .await
            }
            Route::GetLocation | Route::SetLocation => {
                handle_location(&self.schedule, &mut conn).await
            }
            Route::GetCollectionDates => {
                handle_collection_dates(&self.schedule, &mut conn).await
            }
            Route::Unmatched => handle_unmatched(&mut conn).await,
        }
    }
}

async fn handle_set_credentials(conn: &mut HttpConnection<'_>) -> HttpResult {
    let Ok(request) = conn.read_json::<WifiCredentialsRequest>().await else {
        let body = Message {
            message: "Invalid request body",
        };
        return conn
            .write_json_status(ResponseHeaders::bad_request(), &body)
            .await;
    };

    let result = with_usecases(|usecases| {
        usecases.submit_credentials(
            request.network_name.as_str(),
            request.network_password.as_str(),
        )
    });

    match result {
        Some(Ok(())) => {
            conn.write_headers(&ResponseHeaders::success_no_content())
                .await
        }
        Some(Err(StoreError::InvalidInput)) => {
            conn.write_json_status(
                ResponseHeaders::bad_request(),
                &Message::INVALID_NETWORK_NAME,
            )
            .await
        }
        Some(Err(_)) | None => {
            conn.write_json_status(
                ResponseHeaders::unavailable(),
                &Message::NOT_AVAILABLE,
            )
            .await
        }
    }
}

async fn handle_get_datetime(conn: &mut HttpConnection<'_>) -> HttpResult {
    let status = with_usecases(|usecases| usecases.sync_status()).unwrap_or_default();
    conn.write_json(&SyncStatusResponse::from(status)).await
}

async fn handle_location(
    schedule: &impl ScheduleSource,
    conn: &mut HttpConnection<'_>,
) -> HttpResult {
    match schedule.resolve_property("") {
        Ok(property) => conn.write_json(&property).await,
        Err(ScheduleError::NotFound) => {
            conn.write_json_status(ResponseHeaders::not_found(), &Message::NOT_FOUND)
                .await
        }
        Err(ScheduleError::Unavailable) => {
            conn.write_json_status(
                ResponseHeaders::unavailable(),
                &Message::NOT_AVAILABLE,
            )
            .await
        }
    }
}

async fn handle_collection_dates(
    schedule: &impl ScheduleSource,
    conn: &mut HttpConnection<'_>,
) -> HttpResult {
    match schedule.collection_dates("") {
        Ok(dates) => conn.write_json(&dates).await,
        Err(ScheduleError::NotFound) => {
            conn.write_json_status(ResponseHeaders::not_found(), &Message::NOT_FOUND)
                .await
        }
        Err(ScheduleError::Unavailable) => {
            conn.write_json_status(
                ResponseHeaders::unavailable(),
                &Message::NOT_AVAILABLE,
            )
            .await
        }
    }
}

async fn handle_unmatched(conn: &mut HttpConnection<'_>) -> HttpResult {
    let state = with_usecases(|usecases| usecases.state())
        .unwrap_or(ProvisioningState::Uninitialized);

    match unmatched_disposition(state) {
        UnmatchedDisposition::CaptivePortal => serve_portal(conn).await,
        UnmatchedDisposition::NotFound => {
            conn.write_json_status(ResponseHeaders::not_found(), &Message::NOT_FOUND)
                .await
        }
    }
}

/// Captive portal page. Echoes the host and path the client probed so the
/// redirect is explainable, then points at the device address.
async fn serve_portal(conn: &mut HttpConnection<'_>) -> HttpResult {
    let mut page = String::<PORTAL_PAGE_CAPACITY>::new();
    let _ = write!(
        page,
        "<html><head><title>Bin Monitor Setup</title></head><body>\
         <h1>Bin Monitor</h1>\
         <p>http://{}{} is not reachable from the setup network.</p>\
         <p><a href=\"http://{}/\">Open http://{}/</a> to connect this device \
         to your Wifi network.</p>\
         </body></html>",
        conn.host.as_str(),
        conn.path.as_str(),
        config::AP_ADDRESS,
        config::AP_ADDRESS,
    );

    let content = ContentHeaders::new(ContentType::TextHtml)
        .with_text_encoding(TextEncoding::Utf8)
        .with_length(page.len());
    let headers = ResponseHeaders::success().with_content(content);
    conn.write_headers(&headers).await?;
    conn.write_body(page.as_bytes()).await
}
