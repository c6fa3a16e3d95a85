//! Best-effort device location, the CLI stand-in for browser geolocation.
//! Uses ipinfo.io's free IP lookup: no API key, one small JSON response
//! with a `"lat,lon"` `loc` field.
//!
//! Every failure collapses into [`Error::GeolocationUnavailable`]; callers
//! mark the location as unavailable and skip the weather fetch. This path
//! must never block city-list rendering.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::Coordinates;

pub const IP_LOCATION_URL: &str = "https://ipinfo.io/json";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    loc: Option<String>,
}

/// Resolve the device's approximate coordinates from its public IP.
pub async fn detect_location() -> Result<Coordinates> {
    let http = Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|err| {
        tracing::debug!(error = %err, "could not build ip location client");
        Error::GeolocationUnavailable
    })?;

    detect_location_at(&http, IP_LOCATION_URL).await
}

/// Same as [`detect_location`], against an explicit endpoint. Used by tests.
pub async fn detect_location_at(http: &Client, url: &str) -> Result<Coordinates> {
    let res = http
        .get(url)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(|err| {
            tracing::debug!(error = %err, "ip location request failed");
            Error::GeolocationUnavailable
        })?;

    let parsed: IpInfoResponse = res.json().await.map_err(|err| {
        tracing::debug!(error = %err, "ip location response unreadable");
        Error::GeolocationUnavailable
    })?;

    parsed
        .loc
        .as_deref()
        .and_then(|loc| loc.parse::<Coordinates>().ok())
        .ok_or(Error::GeolocationUnavailable)
}
