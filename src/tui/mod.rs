//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the transcript,
//! and translates keyboard and mouse events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Each iteration:
//!
//! 1. Deliver replies whose deadline has passed (`Controller::run_due`).
//! 2. Drain transcript notifications into the message list.
//! 3. Redraw if anything changed.
//! 4. Poll the terminal, waiting no longer than the next reply deadline so
//!    replies show up on time even when the user is idle.
//!
//! Everything runs on one thread; the controller is never shared.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::io::{self, stdout};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::layout::Rect;
use tokio::time::Instant;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::controller::Controller;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Longest the loop sleeps when no reply is pending.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub send_hovered: bool,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            send_hovered: false,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        // Kitty keyboard protocol is pushed unconditionally; terminals that
        // don't support it ignore the sequence.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// How long to wait for terminal input before the next reply is due.
fn poll_timeout(next_deadline: Option<Instant>, now: Instant) -> Duration {
    next_deadline
        .map(|deadline| deadline.saturating_duration_since(now).min(IDLE_POLL))
        .unwrap_or(IDLE_POLL)
}

pub fn run(config: &ResolvedConfig) -> io::Result<()> {
    let mut controller = Controller::from_config(InputBox::new(), config);
    let transcript_events = controller.subscribe();
    controller.start();

    let mut tui = TuiState::new();
    let mut terminal = ratatui::try_init()?;
    let terminal_mode_guard = TerminalModeGuard::new()?;

    let mut needs_redraw = true; // Force first frame

    loop {
        let delivered = controller.run_due();
        if delivered > 0 {
            debug!("Delivered {} repl(ies)", delivered);
        }
        if tui.message_list.sync(&transcript_events) > 0 {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &mut controller, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = poll_timeout(controller.next_deadline(), Instant::now());
        let first_event = poll_event_timeout(timeout)?;
        if first_event.is_none() {
            continue;
        }
        needs_redraw = true;

        let frame_area = terminal.get_frame().area();
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(|| poll_event_immediate().ok().flatten()))
        {
            let Some(action) = handle_event(event, &mut controller, &mut tui, frame_area) else {
                continue;
            };
            if update(&mut controller, action) == Effect::Quit {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }
    }

    info!(
        "Exiting with {} message(s), {} repl(ies) still pending",
        controller.transcript().len(),
        controller.pending()
    );
    drop(terminal_mode_guard);
    ratatui::restore();
    Ok(())
}

/// Routes one terminal event. Returns an action when the event expresses user
/// intent; purely presentational events are handled in place.
fn handle_event(
    event: TuiEvent,
    controller: &mut Controller<InputBox>,
    tui: &mut TuiState,
    frame_area: Rect,
) -> Option<Action> {
    match event {
        TuiEvent::Quit => Some(Action::Quit),
        TuiEvent::ClearConversation => Some(Action::Clear),
        // The Send button, clicked or pressed, is the same submit as Enter
        TuiEvent::PressSend => Some(Action::Submit),
        TuiEvent::MouseClick(col, row) if ui::hit_test_send(col, row, frame_area) => {
            Some(Action::Submit)
        }
        TuiEvent::MouseClick(..) | TuiEvent::Resize => None,
        TuiEvent::MouseMove(col, row) => {
            tui.send_hovered = ui::hit_test_send(col, row, frame_area);
            let scroll_offset = tui.message_list.scroll_state.offset().y;
            tui.message_list.hovered_index = ui::hit_test_message(
                row,
                frame_area,
                scroll_offset,
                &tui.message_list.layout.prefix_heights,
            );
            None
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            None
        }
        _ => match controller.input_mut().handle_event(&event)? {
            InputEvent::Submit => Some(Action::Submit),
            InputEvent::ContentChanged => None,
        },
    }
}
