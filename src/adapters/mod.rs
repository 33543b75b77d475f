//! Adapters - Implementations of port interfaces.
//!
//! - `events` - In-process event bus
//! - `memory` - In-memory repositories

pub mod events;
pub mod memory;
