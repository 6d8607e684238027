//! Day/night signal types and the pure classification rule.
//!
//! Free of I/O: the sun times are fetched elsewhere and handed in together
//! with "now", so the boundary rule can be tested at exact instants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::domain::error::SignalError;

/// Geographic position plus the zone used to express local times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
}

impl GeoLocation {
    /// Check coordinate ranges. `(0, 0)` is a real place and is accepted.
    ///
    /// # Errors
    ///
    /// Returns `SignalError::Data` for non-finite or out-of-range coordinates.
    pub fn validate(&self) -> Result<(), SignalError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SignalError::Data(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(SignalError::Data(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Binary day/night signal.
///
/// `On` means the lights would be on (it is dark), which ends the workday.
/// `Off` means daylight, which is when the environment should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DaySignal {
    On,
    Off,
}

impl DaySignal {
    /// The exact token printed by `lightcycle signal`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DaySignal::On => "ON",
            DaySignal::Off => "OFF",
        }
    }
}

impl fmt::Display for DaySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DaySignal {
    type Err = SignalError;

    /// Exact, case-sensitive match on `ON` / `OFF`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON" => Ok(DaySignal::On),
            "OFF" => Ok(DaySignal::Off),
            other => Err(SignalError::Data(format!("unknown signal '{other}'"))),
        }
    }
}

/// Sunrise and sunset for one UTC calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// A classified signal along with the local times it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalReading {
    pub signal: DaySignal,
    pub now: DateTime<Tz>,
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
}

/// Classify `now` against the day's sun times in the given zone.
///
/// Daylight is the half-open interval `[sunrise, sunset)`: the sunrise
/// instant is already `Off`, the sunset instant is already `On`.
#[must_use]
pub fn classify(now: DateTime<Utc>, sun: &SunTimes, tz: Tz) -> SignalReading {
    let sunrise = sun.sunrise.with_timezone(&tz);
    let sunset = sun.sunset.with_timezone(&tz);
    let now = now.with_timezone(&tz);

    let signal = if now < sunrise || now >= sunset {
        DaySignal::On
    } else {
        DaySignal::Off
    };

    SignalReading {
        signal,
        now,
        sunrise,
        sunset,
    }
}
