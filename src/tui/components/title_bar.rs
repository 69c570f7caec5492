//! # TitleBar Component
//!
//! Top status line showing which responder is answering, how many replies
//! are still on their way, and whether there are messages below the scroll
//! position.
//!
//! Stateless: every field is a prop set by the parent each frame.
//!
//! ## Conditional Formatting
//!
//! 1. **Unseen content**: `"Parley (responder: echo) | 1 reply pending | ↓ New"`
//! 2. **Status**: `"Parley (responder: echo) | 1 reply pending"`
//! 3. **Default**: `"Parley (responder: echo)"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub struct TitleBar {
    pub responder_name: String,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(responder_name: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            responder_name,
            status_message,
            has_unseen_content,
        }
    }

    /// Status text for a given number of in-flight replies.
    pub fn pending_status(pending: usize) -> String {
        match pending {
            0 => String::new(),
            1 => "1 reply pending".to_string(),
            n => format!("{n} replies pending"),
        }
    }

    fn text(&self) -> String {
        let base = format!("Parley (responder: {})", self.responder_name);
        match (self.status_message.is_empty(), self.has_unseen_content) {
            (true, false) => base,
            (true, true) => format!("{base} | ↓ New"),
            (false, false) => format!("{base} | {}", self.status_message),
            (false, true) => format!("{base} | {} | ↓ New", self.status_message),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}
