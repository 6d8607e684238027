//! Day signal derivation: fetch today's sun times, classify "now".
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::{Clock, ProgressReporter, Stage, SunTimesSource};
use crate::domain::{GeoLocation, SignalError, SignalReading, classify};

/// Derives the `ON` / `OFF` signal for a location.
///
/// Never caches: each `compute` makes exactly one call to the source.
pub struct DaySignalProvider<'a, S, C, R> {
    source: &'a S,
    clock: &'a C,
    reporter: &'a R,
}

impl<'a, S, C, R> DaySignalProvider<'a, S, C, R>
where
    S: SunTimesSource,
    C: Clock,
    R: ProgressReporter,
{
    pub fn new(source: &'a S, clock: &'a C, reporter: &'a R) -> Self {
        Self {
            source,
            clock,
            reporter,
        }
    }

    /// Compute the signal for the current instant.
    ///
    /// # Errors
    ///
    /// Returns `SignalError::Fetch` when the service is unreachable or
    /// answers non-2xx, and `SignalError::Data` for malformed payloads, a
    /// non-`OK` service status, or invalid coordinates. Nothing is guessed
    /// on failure.
    pub async fn compute(&self, location: &GeoLocation) -> Result<SignalReading, SignalError> {
        if let Err(e) = location.validate() {
            self.reporter.error(Stage::Fetch, &e.to_string());
            return Err(e);
        }

        let now = self.clock.now();
        let date = now.date_naive();
        self.reporter.step(
            Stage::Fetch,
            &format!(
                "sun times for {date} at ({}, {})",
                location.latitude, location.longitude
            ),
        );

        let sun = match self.source.fetch(location, date).await {
            Ok(sun) => sun,
            Err(e) => {
                self.reporter.error(Stage::Fetch, &e.to_string());
                return Err(e);
            }
        };

        let reading = classify(now, &sun, location.timezone);
        self.reporter.success(
            Stage::Signal,
            &format!(
                "{} (now {}, sunrise {}, sunset {})",
                reading.signal,
                reading.now.format("%H:%M:%S %Z"),
                reading.sunrise.format("%H:%M:%S"),
                reading.sunset.format("%H:%M:%S"),
            ),
        );
        Ok(reading)
    }
}
