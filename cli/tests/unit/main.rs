//! Unit tests for lightcycle CLI
//!
//! These tests use stubbed ports and run fast without external I/O.

mod cycle_service;
mod mocks;
