//! The input adapter core.
//!
//! `state` holds the pure, clock-injected press/repeat state machine;
//! `service` drives it from a tokio task with real timers and a command
//! channel. Modules outside this crate should prefer importing from
//! `crate::adapter` rather than reaching into submodules.

pub mod service;
pub mod state;

pub use service::{adapter_loop, spawn_adapter, AdapterCommand, AdapterHandle};
pub use state::ControlTracker;
