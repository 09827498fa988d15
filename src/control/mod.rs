//! Control algorithms.

pub mod automation;
