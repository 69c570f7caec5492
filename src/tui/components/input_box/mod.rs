//! # InputBox Component
//!
//! Single-line text field the user types into.
//!
//! ## Responsibilities
//!
//! - Capture text input and paste (newlines are flattened to spaces)
//! - Handle editing: backspace, delete, cursor and word movement, Ctrl+U
//! - Report Enter as `InputEvent::Submit`
//! - Scroll horizontally so the cursor stays visible
//!
//! ## State Management
//!
//! The buffer is internal state, but it is also the controller's
//! [`InputSource`]: on submit the controller calls `read_and_clear()` and the
//! box comes back empty. The box never hands its text to anyone directly.

mod editing;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::core::input::InputSource;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use editing::{
    column_at, next_char_boundary, next_word_end, prev_char_boundary, prev_word_start,
    single_line, visible_slice,
};

/// Rows taken by the box: one line of text plus top and bottom border.
pub const INPUT_HEIGHT: u16 = 3;
/// Columns taken by the left and right border.
const BORDER_WIDTH: u16 = 2;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User hit Enter. The text stays in the buffer until the controller reads it.
    Submit,
    /// Text or cursor changed
    ContentChanged,
}

pub struct InputBox {
    buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// First visible display column
    scroll: usize,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Moves the cursor to `pos`; reports a change only when it actually moved.
    fn move_to(&mut self, pos: usize) -> Option<InputEvent> {
        (pos != self.cursor).then(|| {
            self.cursor = pos;
            InputEvent::ContentChanged
        })
    }

    /// Keep the cursor column inside `[scroll, scroll + width)`.
    fn update_scroll(&mut self, width: usize) {
        if width == 0 {
            self.scroll = 0;
            return;
        }
        let col = column_at(&self.buffer, self.cursor);
        if col < self.scroll {
            self.scroll = col;
        } else if col >= self.scroll + width {
            self.scroll = col + 1 - width;
        }
    }
}

impl InputSource for InputBox {
    fn read_and_clear(&mut self) -> String {
        self.cursor = 0;
        self.scroll = 0;
        std::mem::take(&mut self.buffer)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(BORDER_WIDTH) as usize;
        self.update_scroll(width);

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .title("Message (Enter to send)");

        let visible = visible_slice(&self.buffer, self.scroll, width);
        let input = Paragraph::new(visible)
            .block(block)
            .style(Style::default().fg(Color::Green));
        frame.render_widget(input, area);

        let col = column_at(&self.buffer, self.cursor).saturating_sub(self.scroll);
        let cursor_x = area.x + 1 + (col as u16).min(area.width.saturating_sub(BORDER_WIDTH));
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut utf8 = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut utf8));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert_str(&single_line(text));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::ClearLine => {
                if self.buffer.is_empty() {
                    return None;
                }
                self.read_and_clear();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => self.move_to(prev_char_boundary(&self.buffer, self.cursor)),
            TuiEvent::CursorRight => self.move_to(next_char_boundary(&self.buffer, self.cursor)),
            TuiEvent::WordLeft => self.move_to(prev_word_start(&self.buffer, self.cursor)),
            TuiEvent::WordRight => self.move_to(next_word_end(&self.buffer, self.cursor)),
            TuiEvent::CursorHome => self.move_to(0),
            TuiEvent::CursorEnd => self.move_to(self.buffer.len()),
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}
