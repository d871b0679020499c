//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the lamp control rules: gesture handling, the
//! knob, remote commands and the afterglow publish.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
