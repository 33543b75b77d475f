//! Billing Core - subscription lifecycle and event dispatch
//!
//! Shared core of the billing and user-management services: the
//! subscription state machine, webhook strategy routing, and the in-process
//! domain event bus that connects the two services.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
