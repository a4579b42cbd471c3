//! Pure press/repeat state machine for the control pad.
//!
//! `ControlTracker` owns a single map from control button to its held-press
//! record. The record carries both the owning source and the repeat phase, so
//! "pressed" and "owned by" can never disagree, and a released button cannot
//! have a live repeat deadline. The clock is injected (`now: Instant`) which
//! keeps the tracker deterministic; the service layer supplies real time.

use crate::keys::{ControlButton, KeyBindings, KeySignal, RepeatSettings, SourceId};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Where a held button is in its repeat sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepeatPhase {
    /// Non-repeating button (`Up`/`Rotate`): held, no deadlines.
    Single,
    /// Waiting out the initial delay before the repeat sequence arms.
    InitialDelay { deadline: Instant },
    /// Steady-state repetition at the button's cadence.
    Repeating { next_fire: Instant, period: Duration },
}

impl RepeatPhase {
    fn deadline(&self) -> Option<Instant> {
        match *self {
            RepeatPhase::Single => None,
            RepeatPhase::InitialDelay { deadline } => Some(deadline),
            RepeatPhase::Repeating { next_fire, .. } => Some(next_fire),
        }
    }
}

/// One held press: the source driving it plus its repeat phase.
#[derive(Debug, Clone, Copy)]
struct HeldButton {
    source: SourceId,
    phase: RepeatPhase,
}

/// Clock-injected press tracker for the five pad controls.
#[derive(Debug, Clone)]
pub struct ControlTracker {
    bindings: KeyBindings,
    repeat: RepeatSettings,
    held: BTreeMap<ControlButton, HeldButton>,
}

impl ControlTracker {
    pub fn new(bindings: KeyBindings, repeat: RepeatSettings) -> Self {
        Self {
            bindings,
            repeat,
            held: BTreeMap::new(),
        }
    }

    /// Tracker with standard bindings and default cadence.
    pub fn with_defaults() -> Self {
        Self::new(KeyBindings::standard(), RepeatSettings::default())
    }

    /// A touch/pointer began contact with a control's hit area.
    ///
    /// Returns the key-down to synthesize, or `None` when the press is
    /// absorbed: the button is already held (duplicate activation keeps the
    /// original owner) or has no key code bound.
    pub fn activate(
        &mut self,
        button: ControlButton,
        source: SourceId,
        now: Instant,
    ) -> Option<KeySignal> {
        if self.held.contains_key(&button) {
            return None;
        }
        let key_code = self.bindings.key_code(button)?;

        let phase = match self.repeat.period_for(button) {
            Some(_) => RepeatPhase::InitialDelay {
                deadline: now + self.repeat.initial_delay,
            },
            None => RepeatPhase::Single,
        };
        self.held.insert(button, HeldButton { source, phase });

        Some(KeySignal::down(key_code))
    }

    /// The controlling touch/pointer ended (release, cancel, or leave).
    ///
    /// Returns the key-up to synthesize, or `None` when the release is
    /// absorbed: the button is idle, or it is held by a different source
    /// ("not my event").
    pub fn deactivate(&mut self, button: ControlButton, source: SourceId) -> Option<KeySignal> {
        match self.held.get(&button) {
            Some(held) if held.source == source => {
                // Removing the record discards any pending repeat deadline.
                self.held.remove(&button);
                self.bindings.key_code(button).map(KeySignal::up)
            }
            _ => None,
        }
    }

    /// Advance repeat phases up to `now`, returning the key-downs that came
    /// due. The first repeat fires one period after the initial delay
    /// elapses; a late poll catches up by emitting every missed tick.
    pub fn poll_due(&mut self, now: Instant) -> Vec<KeySignal> {
        let mut due = Vec::new();

        for (&button, held) in self.held.iter_mut() {
            if let RepeatPhase::InitialDelay { deadline } = held.phase {
                if now >= deadline {
                    // period_for is Some for every button that entered
                    // InitialDelay; fall back to Single if bindings say no.
                    held.phase = match self.repeat.period_for(button) {
                        Some(period) => RepeatPhase::Repeating {
                            next_fire: deadline + period,
                            period,
                        },
                        None => RepeatPhase::Single,
                    };
                }
            }

            if let RepeatPhase::Repeating {
                ref mut next_fire,
                period,
            } = held.phase
            {
                while now >= *next_fire {
                    if let Some(key_code) = self.bindings.key_code(button) {
                        due.push(KeySignal::down(key_code));
                    }
                    *next_fire += period;
                }
            }
        }

        due
    }

    /// Earliest pending repeat deadline across all held buttons.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.held
            .values()
            .filter_map(|held| held.phase.deadline())
            .min()
    }

    /// Drop every held press and its deadlines. Safe to call when idle.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// True when the button is currently held.
    pub fn is_held(&self, button: ControlButton) -> bool {
        self.held.contains_key(&button)
    }

    /// Source currently driving a button, if any.
    pub fn owner(&self, button: ControlButton) -> Option<SourceId> {
        self.held.get(&button).map(|held| held.source)
    }

    /// Number of currently held buttons.
    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// True when no button is held.
    pub fn is_idle(&self) -> bool {
        self.held.is_empty()
    }
}

impl Default for ControlTracker {
    fn default() -> Self {
        Self::with_defaults()
    }
}
