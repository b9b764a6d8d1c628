//! Infrastructure layer
//!
//! Board drivers, compile-time configuration and the embassy tasks that wire
//! the engine to the strip and the network.

pub mod config;
pub mod drivers;
pub mod tasks;
