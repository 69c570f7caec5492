//! # SendButton Component
//!
//! The clickable alternative to pressing Enter. Clicking it produces the same
//! `Action::Submit` as the keyboard, so there is exactly one submit path.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::Component;

/// Columns reserved for the button to the right of the input box.
pub const SEND_BUTTON_WIDTH: u16 = 10;

pub struct SendButton {
    /// Mouse is over the button
    pub is_hovered: bool,
    /// Nothing typed yet, so a click would be a no-op
    pub is_idle: bool,
}

impl SendButton {
    fn style(&self) -> Style {
        let base = Style::default().fg(Color::Cyan);
        if self.is_hovered {
            base.add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else if self.is_idle {
            base.add_modifier(Modifier::DIM)
        } else {
            base
        }
    }
}

impl Component for SendButton {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = self.style();
        let button = Paragraph::new("Send")
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::bordered()
                    .border_type(ratatui::widgets::BorderType::Rounded)
                    .border_style(style),
            );
        frame.render_widget(button, area);
    }
}
