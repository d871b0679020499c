//! Trilamp firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(feature = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod afterglow;
pub mod app;
pub mod config;
pub mod error;
pub mod lamp;
pub mod pins;
pub mod remote;

// The adapter and driver modules compile on the host too; their
// hardware access falls back to in-memory stubs there.
pub mod adapters;
pub mod drivers;
