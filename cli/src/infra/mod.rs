//! Infrastructure layer — concrete implementations of application port traits.
//!
//! Process execution, the Vagrant and Docker drivers, the sun API client,
//! config loading, and the cycle lock live here.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod clock;
pub mod command_runner;
pub mod config;
pub mod docker;
pub mod lock;
pub mod reporter;
pub mod sun_api;
pub mod vagrant;
