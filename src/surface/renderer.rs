//! Terminal rendering of the pad using ratatui.
//!
//! The renderer owns the terminal lifecycle (raw mode, alternate screen,
//! mouse capture) and redraws the whole frame each pass: the five control
//! buttons, the synthesized-signal log, and a status line. Every draw also
//! writes the buttons' rectangles back into the `PadSurface` so hit-testing
//! always agrees with what is on screen.

use crate::error::Result;
use crate::keys::ControlButton;
use crate::surface::pad::PadSurface;
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::collections::BTreeSet;
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Styles for the pad widgets.
#[derive(Debug, Clone)]
pub struct PadTheme {
    pub active_button: Style,
    pub idle_button: Style,
    pub unbound_button: Style,
    pub down_signal: Style,
    pub up_signal: Style,
    pub status: Style,
}

impl Default for PadTheme {
    fn default() -> Self {
        Self {
            active_button: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            idle_button: Style::default().fg(Color::White),
            unbound_button: Style::default().fg(Color::DarkGray),
            down_signal: Style::default().fg(Color::Green),
            up_signal: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::Blue),
        }
    }
}

impl PadTheme {
    /// Theme without colors for limited terminals.
    pub fn monochrome() -> Self {
        Self {
            active_button: Style::default().add_modifier(Modifier::REVERSED),
            idle_button: Style::default(),
            unbound_button: Style::default().add_modifier(Modifier::DIM),
            down_signal: Style::default(),
            up_signal: Style::default().add_modifier(Modifier::DIM),
            status: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// Per-frame data the application hands to the renderer.
pub struct PadView<'a> {
    /// Buttons the adapter currently considers held.
    pub active: &'a BTreeSet<ControlButton>,
    /// Formatted synthesized signals, oldest first. Entries are
    /// `(is_key_down, line)` so the theme can tint them.
    pub log: &'a [(bool, String)],
    /// Status line content.
    pub status: String,
}

/// Computed frame geometry: button rectangles plus log/status areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadLayout {
    pub buttons: Vec<(ControlButton, Rect)>,
    pub log: Rect,
    pub status: Rect,
}

/// Split the frame into the pad grid, the signal log, and the status line.
pub fn compute_layout(area: Rect) -> PadLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(area);
    let (content, status) = (chunks[0], chunks[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(16)].as_ref())
        .split(content);
    let (pad, log) = (columns[0], columns[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(pad);

    let mut buttons = Vec::with_capacity(5);
    for (row, controls) in [
        (rows[0], &[None, Some(ControlButton::Up), None][..]),
        (
            rows[1],
            &[
                Some(ControlButton::Left),
                Some(ControlButton::Rotate),
                Some(ControlButton::Right),
            ][..],
        ),
        (rows[2], &[None, Some(ControlButton::Down), None][..]),
    ] {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                [
                    Constraint::Length(12),
                    Constraint::Length(12),
                    Constraint::Length(12),
                ]
                .as_ref(),
            )
            .split(row);
        for (cell, control) in cells.iter().zip(controls) {
            if let Some(button) = control {
                buttons.push((*button, *cell));
            }
        }
    }

    PadLayout {
        buttons,
        log,
        status,
    }
}

/// Terminal renderer with the ratatui/crossterm backend.
pub struct PadRenderer {
    terminal: Option<CrosstermTerminal>,
    theme: PadTheme,
}

impl PadRenderer {
    pub fn new() -> Self {
        Self {
            terminal: None,
            theme: PadTheme::default(),
        }
    }

    pub fn with_theme(theme: PadTheme) -> Self {
        Self {
            terminal: None,
            theme,
        }
    }

    /// Enter raw mode, the alternate screen, and mouse capture.
    pub fn initialize(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        self.terminal = Some(terminal);

        Ok(())
    }

    /// Restore the terminal. Safe to call repeatedly.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
            self.terminal = None;
        }
        Ok(())
    }

    /// Draw one frame and refresh the surface's hit areas.
    pub fn render(&mut self, surface: &mut PadSurface, view: &PadView) -> Result<()> {
        let Some(terminal) = self.terminal.as_mut() else {
            return Ok(());
        };
        let theme = &self.theme;

        terminal.draw(|frame| {
            let layout = compute_layout(frame.size());

            for (button, area) in &layout.buttons {
                Self::render_button(frame, *area, *button, surface, view, theme);
            }
            Self::render_log(frame, layout.log, view, theme);
            Self::render_status(frame, layout.status, view, theme);

            for (button, area) in &layout.buttons {
                surface.set_area(*button, *area);
            }
        })?;

        Ok(())
    }

    fn render_button(
        frame: &mut Frame,
        area: Rect,
        button: ControlButton,
        surface: &PadSurface,
        view: &PadView,
        theme: &PadTheme,
    ) {
        let style = if !surface.is_bound(button) {
            theme.unbound_button
        } else if view.active.contains(&button) {
            theme.active_button
        } else {
            theme.idle_button
        };

        let widget = Paragraph::new(button.label())
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(button.element_id()),
            );
        frame.render_widget(widget, area);
    }

    fn render_log(frame: &mut Frame, area: Rect, view: &PadView, theme: &PadTheme) {
        let block = Block::default().borders(Borders::ALL).title("signals");
        let inner_height = area.height.saturating_sub(2) as usize;

        let start = view.log.len().saturating_sub(inner_height);
        let lines: Vec<Line> = view.log[start..]
            .iter()
            .map(|(is_down, text)| {
                let style = if *is_down {
                    theme.down_signal
                } else {
                    theme.up_signal
                };
                Line::styled(text.as_str(), style)
            })
            .collect();

        let widget = Paragraph::new(lines).block(block);
        frame.render_widget(widget, area);
    }

    fn render_status(frame: &mut Frame, area: Rect, view: &PadView, theme: &PadTheme) {
        let widget = Paragraph::new(view.status.as_str()).style(theme.status);
        frame.render_widget(widget, area);
    }
}

impl Default for PadRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PadRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
