//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod cycle;
pub mod executor;
pub mod probe;
pub mod signal;

#[cfg(test)]
pub(crate) mod test_support;

pub use cycle::{CycleMode, CycleReport, DecisionCycle};
pub use executor::ActionExecutor;
pub use probe::{InfrastructureProbe, ProbeReport};
pub use signal::DaySignalProvider;
