//! # MessageList Component
//!
//! Scrollable view of the transcript. This is the renderer: it subscribes to
//! the transcript's notifications and keeps its own ordered copy of every
//! message it has been told about.
//!
//! ## Responsibilities
//!
//! - Apply `TranscriptEvent`s in arrival order, each exactly once
//! - Keep the latest message in view (auto-scroll) unless the user scrolled up
//! - Hit testing support for mouse hover
//! - Layout caching (message heights)
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state). Messages are immutable, so
//! a cached height only goes stale when the width changes or the list is
//! cleared.

use std::sync::mpsc::Receiver;

use log::debug;
use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::{Message, TranscriptEvent};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Everything rendered so far, in transcript order
    pub messages: Vec<Message>,
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Message under the mouse pointer
    pub hovered_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            hovered_index: None,
            viewport_height: 0,
        }
    }

    /// Drains pending transcript notifications. Returns how many messages were added.
    ///
    /// A new message re-pins the view to the bottom so the latest entry is
    /// visible.
    pub fn sync(&mut self, events: &Receiver<TranscriptEvent>) -> usize {
        let mut added = 0;
        for event in events.try_iter() {
            match event {
                TranscriptEvent::MessageAdded(message) => {
                    self.messages.push(message);
                    added += 1;
                }
                TranscriptEvent::Cleared => {
                    debug!("Message list cleared ({} rendered)", self.messages.len());
                    self.messages.clear();
                    self.layout = LayoutCache::new();
                    self.scroll_state = ScrollViewState::default();
                    self.hovered_index = None;
                }
            }
        }
        if added > 0 {
            self.stick_to_bottom = true;
        }
        added
    }

    fn max_scroll(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    fn scroll_to(&mut self, y: u16) {
        let x = self.scroll_state.offset().x;
        self.scroll_state.set_offset(Position { x, y });
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        if self.scroll_state.offset().y > max_y {
            self.scroll_to(max_y);
        }
    }

    /// Re-engage auto-scroll once the user has scrolled back to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        if self.scroll_state.offset().y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_to(max_y);
        }
    }

    /// True when some content sits below the visible window.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_scroll()
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with a reference to its persistent state.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState) -> Self {
        Self { state }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let state = &mut *self.state;

        state.layout.measure(&state.messages, content_width);
        let total_height = state.layout.total_height();

        // Pinned lists are scrolled after the content is laid out
        state.viewport_height = area.height;
        if !state.stick_to_bottom {
            state.clamp_scroll();
        }

        let scroll_offset = state.scroll_state.offset().y;
        let visible_range = state.layout.visible_range(scroll_offset, area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset = state.layout.top_of(visible_range.start);

        for i in visible_range {
            let height = state.layout.heights[i];
            // Rect::new clips anything that would run past the u16 canvas
            let rect = Rect::new(0, y_offset, content_width, height);
            let view = MessageView::new(&state.messages[i], state.hovered_index == Some(i));
            scroll_view.render_widget(view, rect);
            y_offset = y_offset.saturating_add(height);
        }

        if state.stick_to_bottom {
            state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut state.scroll_state);
    }
}

/// Implemented on the state rather than `MessageList` because the list is
/// rebuilt every frame and scrolling must persist.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    /// Brings the cache up to date for `messages` at `content_width`,
    /// measuring only what is not already cached.
    pub fn measure(&mut self, messages: &[Message], content_width: u16) {
        let reusable = self.reusable_count(messages.len(), content_width);
        self.heights.truncate(reusable);
        self.heights.extend(
            messages[reusable..]
                .iter()
                .map(|message| MessageView::calculate_height(message, content_width)),
        );
        self.rebuild_prefix_heights();
        self.update_metadata(messages.len(), content_width);
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// First content row of message `index`.
    pub fn top_of(&self, index: usize) -> u16 {
        index
            .checked_sub(1)
            .and_then(|prev| self.prefix_heights.get(prev))
            .copied()
            .unwrap_or(0)
    }

    /// How many cached heights are still valid.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        // Fewer messages than cached means the list was reset
        if message_count < self.message_count {
            return 0;
        }
        self.heights.len().min(message_count)
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
