//! Command implementations

pub mod cycle;
pub mod plan;
pub mod signal;
pub mod status;
pub mod version;
