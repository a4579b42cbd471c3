//! Hit-testing and translation of terminal mouse events into pad events.
//!
//! Each mouse button (left/right/middle) is an independent input source,
//! standing in for a browser touch/pointer id: pressing two controls with two
//! mouse buttons at once exercises the same ownership rules two fingers
//! would. Capturing the mouse also means a right-button press acts as an
//! ordinary press instead of opening a context menu.

use crate::keys::{ControlButton, KeyBindings, SourceId};
use ratatui::crossterm::event::{
    Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use std::collections::BTreeMap;

/// Events the pad surface hands to the application loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadEvent {
    /// A source began contact with a control's hit area.
    Press {
        button: ControlButton,
        source: SourceId,
    },
    /// A source ended contact (button-up, or dragged off the hit area).
    Release {
        button: ControlButton,
        source: SourceId,
    },
    /// The terminal was resized; hit areas are stale until the next draw.
    Resize,
    /// The user asked to quit.
    Quit,
}

/// Tracks control hit areas and which control each source is pressing.
#[derive(Debug, Clone, Default)]
pub struct PadSurface {
    bindings: KeyBindings,
    areas: BTreeMap<ControlButton, Rect>,
    pressing: BTreeMap<SourceId, ControlButton>,
}

impl PadSurface {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            areas: BTreeMap::new(),
            pressing: BTreeMap::new(),
        }
    }

    /// True when the control responds to presses.
    pub fn is_bound(&self, button: ControlButton) -> bool {
        self.bindings.is_bound(button)
    }

    /// Record where a control was drawn; called by the renderer every frame
    /// so hit-testing always matches the screen.
    pub fn set_area(&mut self, button: ControlButton, area: Rect) {
        self.areas.insert(button, area);
    }

    /// Translate one terminal event into at most one pad event.
    pub fn handle_event(&mut self, event: &Event) -> Option<PadEvent> {
        match event {
            Event::Key(key) => match (key.code, key.modifiers) {
                (KeyCode::Char('q'), KeyModifiers::NONE)
                | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(PadEvent::Quit),
                _ => None,
            },
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(_, _) => Some(PadEvent::Resize),
            _ => None,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> Option<PadEvent> {
        let position = Position {
            x: mouse.column,
            y: mouse.row,
        };

        match mouse.kind {
            MouseEventKind::Down(mouse_button) => {
                let source = source_for(mouse_button);
                // One press per source at a time.
                if self.pressing.contains_key(&source) {
                    return None;
                }
                let button = self.hit_test(position)?;
                self.pressing.insert(source, button);
                Some(PadEvent::Press { button, source })
            }
            MouseEventKind::Up(mouse_button) => {
                let source = source_for(mouse_button);
                let button = self.pressing.remove(&source)?;
                Some(PadEvent::Release { button, source })
            }
            MouseEventKind::Drag(mouse_button) => {
                // Leave-without-release: gated on the dragging source owning
                // the press, consistent with the button-up path.
                let source = source_for(mouse_button);
                let button = *self.pressing.get(&source)?;
                let area = self.areas.get(&button)?;
                if area.contains(position) {
                    return None;
                }
                self.pressing.remove(&source);
                Some(PadEvent::Release { button, source })
            }
            _ => None,
        }
    }

    /// Bound control whose drawn area contains the position.
    fn hit_test(&self, position: Position) -> Option<ControlButton> {
        self.areas
            .iter()
            .find(|(button, area)| self.bindings.is_bound(**button) && area.contains(position))
            .map(|(button, _)| *button)
    }

    /// Number of sources currently mid-press (for the status line).
    pub fn pressing_count(&self) -> usize {
        self.pressing.len()
    }
}

fn source_for(mouse_button: MouseButton) -> SourceId {
    SourceId(match mouse_button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
    })
}
