//! Application core — pure domain logic, zero I/O.
//!
//! Business rules for the room controller: command routing with
//! mode/sleep guards, the automation step, and state publication. All
//! interaction with hardware and the broker happens through **port traits**
//! defined in [`ports`], keeping this layer testable without peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod publisher;
pub mod router;
pub mod service;
