//! Application orchestration layer.
//!
//! Wires the three moving parts together without duplicating their state:
//! a blocking input thread feeding terminal events onto a channel, the
//! adapter task turning pad presses into synthesized key signals, and the
//! renderer drawing the pad and the signal log. The adapter is a scoped
//! resource: constructed when the app starts, torn down when it quits.

use crate::adapter::service::spawn_adapter;
use crate::error::Result;
use crate::keys::{ControlButton, KeyBindings, KeySignal, RepeatSettings, SignalKind};
use crate::surface::{PadEvent, PadRenderer, PadSurface, PadView};
use ratatui::crossterm::event::{self, Event};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};

/// Bound on the signal log kept for display.
const LOG_CAPACITY: usize = 512;
/// How long the input thread blocks in each poll before re-checking shutdown.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Spawn a blocking thread that polls the terminal and forwards raw events
/// onto a channel consumed by the async run loop.
pub fn spawn_input_thread(
    tx: UnboundedSender<Event>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        while !shutdown.load(Ordering::SeqCst) {
            match event::poll(poll_interval) {
                Ok(true) => match event::read() {
                    Ok(terminal_event) => {
                        if tx.send(terminal_event).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {
                    // No input this tick; continue polling.
                    continue;
                }
                Err(_) => break,
            }
        }
    })
}

/// Demo application: the touch pad plus a live log of synthesized signals.
pub struct Application {
    bindings: KeyBindings,
    repeat: RepeatSettings,
    surface: PadSurface,
    renderer: PadRenderer,
}

impl Application {
    pub fn new(bindings: KeyBindings, repeat: RepeatSettings, renderer: PadRenderer) -> Self {
        Self {
            bindings,
            repeat,
            surface: PadSurface::new(bindings),
            renderer,
        }
    }

    /// Run until the user quits. Terminal state is restored on every exit
    /// path, including errors from the run loop.
    pub async fn run(&mut self) -> Result<()> {
        self.renderer.initialize()?;
        let outcome = self.run_loop().await;
        self.renderer.cleanup()?;
        outcome
    }

    async fn run_loop(&mut self) -> Result<()> {
        let (event_tx, mut events) = mpsc::unbounded_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let input_thread = spawn_input_thread(event_tx, Arc::clone(&shutdown), INPUT_POLL_INTERVAL);

        let (adapter, mut signals, adapter_task) = spawn_adapter(self.bindings, self.repeat);

        let mut active: BTreeSet<ControlButton> = BTreeSet::new();
        let mut log: Vec<(bool, String)> = Vec::new();
        let mut signal_count: u64 = 0;

        self.draw(&active, &log, signal_count)?;

        let mut running = true;
        while running {
            tokio::select! {
                terminal_event = events.recv() => match terminal_event {
                    Some(terminal_event) => {
                        match self.surface.handle_event(&terminal_event) {
                            Some(PadEvent::Press { button, source }) => adapter.press(button, source),
                            Some(PadEvent::Release { button, source }) => adapter.release(button, source),
                            Some(PadEvent::Quit) => running = false,
                            // Redraw below refreshes the hit areas.
                            Some(PadEvent::Resize) | None => {}
                        }
                    }
                    None => running = false,
                },
                signal = signals.recv() => match signal {
                    Some(signal) => {
                        signal_count += 1;
                        self.track_signal(signal, &mut active, &mut log);
                    }
                    None => running = false,
                },
            }

            self.draw(&active, &log, signal_count)?;
        }

        // Teardown: drain the adapter, then stop the input thread.
        adapter.teardown();
        let _ = adapter_task.await;
        shutdown.store(true, Ordering::SeqCst);
        let _ = input_thread.join();

        Ok(())
    }

    /// Update the highlight set and the display log from one signal.
    fn track_signal(
        &self,
        signal: KeySignal,
        active: &mut BTreeSet<ControlButton>,
        log: &mut Vec<(bool, String)>,
    ) {
        if let Some(button) = self.bindings.button_for(signal.key_code) {
            match signal.kind {
                SignalKind::KeyDown => {
                    active.insert(button);
                }
                SignalKind::KeyUp => {
                    active.remove(&button);
                }
            }
        }

        log.push((signal.is_down(), signal.to_string()));
        if log.len() > LOG_CAPACITY {
            let excess = log.len() - LOG_CAPACITY;
            log.drain(..excess);
        }
    }

    fn draw(
        &mut self,
        active: &BTreeSet<ControlButton>,
        log: &[(bool, String)],
        signal_count: u64,
    ) -> Result<()> {
        let view = PadView {
            active,
            log,
            status: format!(
                "tetropad | {} held | {} mid-press | {} signal(s) | q to quit",
                active.len(),
                self.surface.pressing_count(),
                signal_count
            ),
        };
        self.renderer.render(&mut self.surface, &view)
    }
}
