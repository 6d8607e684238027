//! HTTP client for sunrise-sunset.org, implementing `SunTimesSource`.
//!
//! `ureq` is blocking, so each fetch runs on `spawn_blocking`.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::application::ports::SunTimesSource;
use crate::domain::{GeoLocation, SignalError, SunTimes};

/// Transport timeout for one request. Independent of tool timeouts.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Production `SunTimesSource`.
#[derive(Debug, Clone)]
pub struct SunriseSunsetClient {
    url: String,
    timeout: Duration,
}

impl SunriseSunsetClient {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: HTTP_TIMEOUT,
        }
    }
}

impl SunTimesSource for SunriseSunsetClient {
    async fn fetch(&self, location: &GeoLocation, date: NaiveDate) -> Result<SunTimes, SignalError> {
        let url = self.url.clone();
        let timeout = self.timeout;
        let lat = location.latitude.to_string();
        let lng = location.longitude.to_string();
        let date = date.format("%Y-%m-%d").to_string();

        let body = tokio::task::spawn_blocking(move || {
            tracing::debug!(%url, %lat, %lng, %date, "requesting sun times");
            let agent = ureq::AgentBuilder::new().timeout(timeout).build();
            let response = agent
                .get(&url)
                .set("User-Agent", "lightcycle")
                .query("lat", &lat)
                .query("lng", &lng)
                .query("date", &date)
                .query("formatted", "0")
                .call();
            match response {
                Ok(r) => r
                    .into_string()
                    .map_err(|e| SignalError::Fetch(format!("cannot read response body: {e}"))),
                Err(ureq::Error::Status(code, _)) => {
                    Err(SignalError::Fetch(format!("sun API answered HTTP {code}")))
                }
                Err(e) => Err(SignalError::Fetch(format!("sun API unreachable: {e}"))),
            }
        })
        .await
        .map_err(|e| SignalError::Fetch(format!("spawn_blocking panicked: {e}")))??;

        parse_response(&body)
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    status: String,
    /// An object on success, an empty string on some error statuses.
    #[serde(default)]
    results: serde_json::Value,
}

#[derive(Deserialize)]
struct ApiResults {
    sunrise: String,
    sunset: String,
}

/// Parse a `formatted=0` response body into UTC instants.
///
/// # Errors
///
/// Returns `SignalError::Data` for malformed JSON, a non-`OK` status,
/// missing results, or instants that are not RFC 3339.
pub fn parse_response(body: &str) -> Result<SunTimes, SignalError> {
    let parsed: ApiResponse = serde_json::from_str(body)
        .map_err(|e| SignalError::Data(format!("malformed sun API response: {e}")))?;
    if parsed.status != "OK" {
        return Err(SignalError::Data(format!(
            "sun API reported status {}",
            parsed.status
        )));
    }
    let results: ApiResults = serde_json::from_value(parsed.results)
        .map_err(|e| SignalError::Data(format!("sun API results unusable: {e}")))?;
    Ok(SunTimes {
        sunrise: instant("sunrise", &results.sunrise)?,
        sunset: instant("sunset", &results.sunset)?,
    })
}

fn instant(field: &str, value: &str) -> Result<DateTime<Utc>, SignalError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SignalError::Data(format!("bad {field} '{value}': {e}")))
}
