//! Presentation layer for the demo pad.
//!
//! `pad` translates terminal mouse events into per-source press/release
//! events on the five control hit areas; `renderer` draws the pad, the
//! synthesized-signal log, and the status line with ratatui.

pub mod pad;
pub mod renderer;

pub use pad::{PadEvent, PadSurface};
pub use renderer::{PadRenderer, PadTheme, PadView};
