//! # tetropad - Touch-Pad Controls for Tetris-Style Games
//!
//! A touch-input adapter that turns presses on five on-screen controls
//! (`up`, `down`, `left`, `right`, `rotate`) into synthesized key-down and
//! key-up signals a game loop consumes exactly as it would consume physical
//! keyboard input.
//!
//! ## Features
//!
//! - **Multi-source tracking**: each press is owned by the touch/pointer
//!   that started it; a different source cannot release it
//! - **Press-and-hold repeat**: movement buttons re-fire key-down at a
//!   per-button cadence after an initial delay (soft drop faster than
//!   horizontal movement)
//! - **Indistinguishable signals**: synthesized events carry the symbolic
//!   key name, physical code, legacy numeric code, and bubbles/cancelable
//!   flags of real arrow-key events
//! - **Clean teardown**: all held state and pending repeats drain when the
//!   adapter is dropped or torn down
//!
//! ## Architecture
//!
//! The library is organized into focused modules:
//!
//! - [`error`] - Centralized error types and handling
//! - [`keys`] - Control vocabulary, key bindings, repeat settings, signals
//! - [`adapter`] - The press/repeat state machine and its async driver
//! - [`surface`] - Demo presentation layer (terminal pad + renderer)
//! - [`app`] - Application core and component coordination

// Core modules
pub mod error;
pub mod keys;

// The input adapter and its demo surface
pub mod adapter;
pub mod surface;

// Core components
pub mod app;

// Re-export commonly used types for convenience
pub use error::{Result, TetropadError};

// Public API surface for external usage
pub use adapter::{AdapterHandle, ControlTracker};
pub use app::Application;
pub use keys::{ControlButton, KeyBindings, KeySignal, RepeatSettings, SourceId};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
