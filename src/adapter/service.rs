//! Async driver for the control tracker.
//!
//! One task owns the tracker and selects over the command channel and the
//! earliest repeat deadline. Because everything funnels through that task,
//! the activation key-down for a button always precedes its repeats, and the
//! repeats always precede its key-up, with no locking.

use crate::adapter::state::ControlTracker;
use crate::keys::{ControlButton, KeyBindings, KeySignal, RepeatSettings, SourceId};
use log::{debug, trace};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Commands accepted by the adapter task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterCommand {
    /// A touch/pointer began contact with a control's hit area.
    Press {
        button: ControlButton,
        source: SourceId,
    },
    /// The controlling touch/pointer ended (release, cancel, or leave).
    Release {
        button: ControlButton,
        source: SourceId,
    },
    /// Drain all held state and end the adapter task.
    Teardown,
}

/// Run the adapter until teardown, emitting synthesized key signals.
///
/// The loop also ends when the command channel closes (handle dropped) or
/// when the signal receiver goes away; both count as teardown and drain the
/// tracker.
pub async fn adapter_loop(
    mut commands: UnboundedReceiver<AdapterCommand>,
    signals: UnboundedSender<KeySignal>,
    bindings: KeyBindings,
    repeat: RepeatSettings,
) {
    let mut tracker = ControlTracker::new(bindings, repeat);

    loop {
        let deadline = tracker.next_deadline().map(Instant::from_std);

        tokio::select! {
            command = commands.recv() => match command {
                Some(AdapterCommand::Press { button, source }) => {
                    let now = Instant::now().into_std();
                    if let Some(signal) = tracker.activate(button, source, now) {
                        debug!("{button} pressed by {source}: {signal}");
                        if signals.send(signal).is_err() {
                            break;
                        }
                    }
                }
                Some(AdapterCommand::Release { button, source }) => {
                    if let Some(signal) = tracker.deactivate(button, source) {
                        debug!("{button} released by {source}: {signal}");
                        if signals.send(signal).is_err() {
                            break;
                        }
                    }
                }
                Some(AdapterCommand::Teardown) | None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                let now = Instant::now().into_std();
                for signal in tracker.poll_due(now) {
                    trace!("repeat: {signal}");
                    if signals.send(signal).is_err() {
                        tracker.clear();
                        return;
                    }
                }
            }
        }
    }

    debug!("adapter teardown, draining {} held button(s)", tracker.held_count());
    tracker.clear();
}

/// Clonable front end over the adapter's command channel.
///
/// Sends are best-effort: once the adapter task has exited, every method is a
/// silent no-op, matching the adapter's no-surfaced-errors contract.
#[derive(Debug, Clone)]
pub struct AdapterHandle {
    commands: UnboundedSender<AdapterCommand>,
}

impl AdapterHandle {
    pub fn new(commands: UnboundedSender<AdapterCommand>) -> Self {
        Self { commands }
    }

    pub fn press(&self, button: ControlButton, source: SourceId) {
        let _ = self.commands.send(AdapterCommand::Press { button, source });
    }

    pub fn release(&self, button: ControlButton, source: SourceId) {
        let _ = self.commands.send(AdapterCommand::Release { button, source });
    }

    pub fn teardown(&self) {
        let _ = self.commands.send(AdapterCommand::Teardown);
    }
}

/// Spawn the adapter task, returning its handle, the signal stream, and the
/// join handle for shutdown sequencing.
pub fn spawn_adapter(
    bindings: KeyBindings,
    repeat: RepeatSettings,
) -> (
    AdapterHandle,
    UnboundedReceiver<KeySignal>,
    JoinHandle<()>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(adapter_loop(command_rx, signal_tx, bindings, repeat));

    (AdapterHandle::new(command_tx), signal_rx, task)
}
