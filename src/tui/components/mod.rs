//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: top status line (responder, pending replies, "↓ New")
//! - `MessageView`: a single transcript message
//! - `SendButton`: clickable submit trigger
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: single-line text field, also the controller's input source
//! - `MessageList`: scrollable transcript view fed by transcript notifications
//!
//! Components receive external data as props (struct fields or parameters),
//! never by reaching into global state.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! ├── send_button.rs   (Submit button)
//! └── input_box/       (Text field + editing helpers)
//! ```

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod send_button;
mod title_bar;

pub use input_box::{INPUT_HEIGHT, InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use send_button::{SEND_BUTTON_WIDTH, SendButton};
pub use title_bar::TitleBar;
