use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::controller::Controller;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    INPUT_HEIGHT, InputBox, MessageList, SEND_BUTTON_WIDTH, SendButton, TitleBar,
};

/// Screen regions, shared by drawing and mouse hit testing.
pub struct Areas {
    pub title: Rect,
    pub messages: Rect,
    pub input: Rect,
    pub send: Rect,
}

pub fn areas(frame_area: Rect) -> Areas {
    use Constraint::{Length, Min};
    let [title, messages, bottom] =
        Layout::vertical([Length(1), Min(0), Length(INPUT_HEIGHT)]).areas(frame_area);
    let [input, send] = Layout::horizontal([Min(0), Length(SEND_BUTTON_WIDTH)]).areas(bottom);
    Areas {
        title,
        messages,
        input,
        send,
    }
}

pub fn draw_ui(frame: &mut Frame, controller: &mut Controller<InputBox>, tui: &mut TuiState) {
    let areas = areas(frame.area());

    MessageList::new(&mut tui.message_list).render(frame, areas.messages);

    // Title is drawn after the list so "↓ New" reflects this frame's scroll
    let mut title_bar = TitleBar::new(
        controller.responder_name().to_string(),
        TitleBar::pending_status(controller.pending()),
        tui.message_list.has_unseen_content(),
    );
    title_bar.render(frame, areas.title);

    let mut send_button = SendButton {
        is_hovered: tui.send_hovered,
        is_idle: controller.input().text().trim().is_empty(),
    };
    send_button.render(frame, areas.send);

    controller.input_mut().render(frame, areas.input);
}

/// Hit test: which message (if any) is drawn at screen row `screen_y`.
pub fn hit_test_message(
    screen_y: u16,
    frame_area: Rect,
    scroll_offset_y: u16,
    prefix_heights: &[u16],
) -> Option<usize> {
    let main_area = areas(frame_area).messages;
    if screen_y < main_area.y || screen_y >= main_area.y + main_area.height {
        return None;
    }

    let content_y = (screen_y - main_area.y).saturating_add(scroll_offset_y);
    let index = prefix_heights.partition_point(|&end| end <= content_y);
    (index < prefix_heights.len()).then_some(index)
}

/// Hit test: is `(col, row)` on the Send button.
pub fn hit_test_send(col: u16, row: u16, frame_area: Rect) -> bool {
    let send = areas(frame_area).send;
    col >= send.x && col < send.x + send.width && row >= send.y && row < send.y + send.height
}
