//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, events)
//! - `subscription` - Subscription lifecycle state machine
//! - `webhook` - Webhook event routing and the standard strategies
//! - `user` - User lifecycle events billing reacts to

pub mod foundation;
pub mod subscription;
pub mod user;
pub mod webhook;
