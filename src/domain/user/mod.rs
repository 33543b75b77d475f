//! User domain module.
//!
//! Billing does not own users; it only reacts to their lifecycle events
//! and announces the customers it creates for them.

mod events;

pub use events::{CustomerCreated, UserCreated};
