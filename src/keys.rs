//! Shared input vocabulary: control buttons, key bindings, repeat cadence
//! settings, and the synthesized key signals delivered to the game loop.

use std::fmt;
use std::time::Duration;

/// Numeric key codes for the four arrow keys (legacy `keyCode` values).
pub const KEY_CODE_LEFT: u16 = 37;
pub const KEY_CODE_UP: u16 = 38;
pub const KEY_CODE_RIGHT: u16 = 39;
pub const KEY_CODE_DOWN: u16 = 40;

/// Default numeric key code for the rotate control (`x`).
pub const DEFAULT_ROTATE_KEY_CODE: u16 = 88;

/// One of the five logical pad controls, independent of which physical
/// touch/pointer is pressing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlButton {
    Up,
    Down,
    Left,
    Right,
    Rotate,
}

impl ControlButton {
    /// All controls, in pad-layout order.
    pub const ALL: [ControlButton; 5] = [
        ControlButton::Up,
        ControlButton::Left,
        ControlButton::Rotate,
        ControlButton::Right,
        ControlButton::Down,
    ];

    /// Movement buttons repeat while held; `Up`/`Rotate` never do.
    pub fn repeats(self) -> bool {
        matches!(
            self,
            ControlButton::Down | ControlButton::Left | ControlButton::Right
        )
    }

    /// Stable element identifier for the control's hit area.
    pub fn element_id(self) -> &'static str {
        match self {
            ControlButton::Up => "btn-up",
            ControlButton::Down => "btn-down",
            ControlButton::Left => "btn-left",
            ControlButton::Right => "btn-right",
            ControlButton::Rotate => "btn-rotate",
        }
    }

    /// Short label used by the pad surface.
    pub fn label(self) -> &'static str {
        match self {
            ControlButton::Up => "UP",
            ControlButton::Down => "DOWN",
            ControlButton::Left => "LEFT",
            ControlButton::Right => "RIGHT",
            ControlButton::Rotate => "ROT",
        }
    }
}

impl fmt::Display for ControlButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque token distinguishing one concurrent touch or pointer stream from
/// another. Binds a press to its matching release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(pub u32);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for SourceId {
    fn from(raw: u32) -> Self {
        SourceId(raw)
    }
}

/// Immutable button -> numeric key code mapping, fixed at construction.
///
/// A control bound to `None` is tolerated by the surface layer (its hit area
/// is skipped), mirroring the original's missing-element handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    up: Option<u16>,
    down: Option<u16>,
    left: Option<u16>,
    right: Option<u16>,
    rotate: Option<u16>,
}

impl KeyBindings {
    /// Arrow keys for the directions, `x` for rotate.
    pub fn standard() -> Self {
        Self {
            up: Some(KEY_CODE_UP),
            down: Some(KEY_CODE_DOWN),
            left: Some(KEY_CODE_LEFT),
            right: Some(KEY_CODE_RIGHT),
            rotate: Some(DEFAULT_ROTATE_KEY_CODE),
        }
    }

    /// Standard bindings with a custom rotate key code.
    pub fn with_rotate_key(rotate_key_code: u16) -> Self {
        Self {
            rotate: Some(rotate_key_code),
            ..Self::standard()
        }
    }

    /// Remove the binding for a control (its hit area becomes inert).
    pub fn without(mut self, button: ControlButton) -> Self {
        *self.slot_mut(button) = None;
        self
    }

    /// Numeric key code bound to a control, if any.
    pub fn key_code(&self, button: ControlButton) -> Option<u16> {
        match button {
            ControlButton::Up => self.up,
            ControlButton::Down => self.down,
            ControlButton::Left => self.left,
            ControlButton::Right => self.right,
            ControlButton::Rotate => self.rotate,
        }
    }

    /// True when the control has a key code bound.
    pub fn is_bound(&self, button: ControlButton) -> bool {
        self.key_code(button).is_some()
    }

    /// Control bound to a numeric key code, if any. First match in pad
    /// order wins if two controls share a code.
    pub fn button_for(&self, key_code: u16) -> Option<ControlButton> {
        ControlButton::ALL
            .into_iter()
            .find(|button| self.key_code(*button) == Some(key_code))
    }

    fn slot_mut(&mut self, button: ControlButton) -> &mut Option<u16> {
        match button {
            ControlButton::Up => &mut self.up,
            ControlButton::Down => &mut self.down,
            ControlButton::Left => &mut self.left,
            ControlButton::Right => &mut self.right,
            ControlButton::Rotate => &mut self.rotate,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::standard()
    }
}

/// Repeat cadence configuration for held movement buttons.
///
/// Soft drop repeats faster than horizontal movement: accelerated drop
/// benefits from tighter repetition than left/right stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatSettings {
    /// Delay before the repeat sequence arms after the initial key-down.
    pub initial_delay: Duration,
    /// Steady-state interval for `Left`/`Right`.
    pub horizontal_period: Duration,
    /// Steady-state interval for `Down`.
    pub soft_drop_period: Duration,
}

impl RepeatSettings {
    /// Steady-state repeat interval for a control; `None` for non-repeating
    /// controls.
    pub fn period_for(&self, button: ControlButton) -> Option<Duration> {
        match button {
            ControlButton::Down => Some(self.soft_drop_period),
            ControlButton::Left | ControlButton::Right => Some(self.horizontal_period),
            ControlButton::Up | ControlButton::Rotate => None,
        }
    }
}

impl Default for RepeatSettings {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(200),
            horizontal_period: Duration::from_millis(100),
            soft_drop_period: Duration::from_millis(50),
        }
    }
}

/// Symbolic `key`/`code` names for a numeric key code.
///
/// Only the four arrow codes have symbolic names; anything else (the rotate
/// key included) degrades to empty fields rather than failing. The game loop
/// matches on the numeric code for those keys.
pub fn symbolic_names(key_code: u16) -> (&'static str, &'static str) {
    match key_code {
        KEY_CODE_LEFT => ("ArrowLeft", "ArrowLeft"),
        KEY_CODE_UP => ("ArrowUp", "ArrowUp"),
        KEY_CODE_RIGHT => ("ArrowRight", "ArrowRight"),
        KEY_CODE_DOWN => ("ArrowDown", "ArrowDown"),
        _ => ("", ""),
    }
}

/// Direction of a synthesized key signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    KeyDown,
    KeyUp,
}

/// A key-down/key-up signal constructed by the adapter and delivered through
/// the same channel genuine keyboard events would use. Carries the fields a
/// keyboard-event consumer expects: symbolic key name, symbolic physical
/// code, legacy numeric code, and the bubbles/cancelable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySignal {
    pub kind: SignalKind,
    pub key: &'static str,
    pub code: &'static str,
    pub key_code: u16,
    pub bubbles: bool,
    pub cancelable: bool,
}

impl KeySignal {
    fn new(kind: SignalKind, key_code: u16) -> Self {
        let (key, code) = symbolic_names(key_code);
        Self {
            kind,
            key,
            code,
            key_code,
            bubbles: true,
            cancelable: true,
        }
    }

    /// Synthesized key-down for a numeric key code.
    pub fn down(key_code: u16) -> Self {
        Self::new(SignalKind::KeyDown, key_code)
    }

    /// Synthesized key-up for a numeric key code.
    pub fn up(key_code: u16) -> Self {
        Self::new(SignalKind::KeyUp, key_code)
    }

    /// True for key-down signals.
    pub fn is_down(&self) -> bool {
        self.kind == SignalKind::KeyDown
    }
}

impl fmt::Display for KeySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SignalKind::KeyDown => "keydown",
            SignalKind::KeyUp => "keyup",
        };
        if self.key.is_empty() {
            write!(f, "{} keyCode={}", kind, self.key_code)
        } else {
            write!(f, "{} {} keyCode={}", kind, self.key, self.key_code)
        }
    }
}
