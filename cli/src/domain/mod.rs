//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod plan;
pub mod shell;
pub mod signal;

pub use config::LightcycleConfig;
pub use error::{ActionError, ConfigError, LockError, ProbeError, SignalError};
pub use plan::{
    Action, ActionPlan, ActionResult, ActionSet, InfraState, ObservedState, Strategy, Target,
    decide,
};
pub use signal::{DaySignal, GeoLocation, SignalReading, SunTimes, classify};
