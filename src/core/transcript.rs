//! # Transcript Store
//!
//! Append-only, ordered history of a conversation.
//!
//! ```text
//! TranscriptStore
//! ├── messages: Vec<Message>        // insertion order = display order
//! ├── next_sequence: u64            // never reused, survives clear()
//! └── subscribers: Vec<Sender>      // renderers listening for appends
//! ```
//!
//! The only way in is `append()`. There is no way to edit or remove a single
//! message, so immutability of the history is structural.

use log::{debug, warn};
use serde::Serialize;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender as EventSender};

/// Who produced a message.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "bot")]
    Bot,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One immutable unit of conversation.
///
/// Fields are private: a `Message` can only be minted by
/// [`TranscriptStore::append`], which guarantees non-empty text and a fresh
/// sequence number.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
    sender: Sender,
    sequence: u64,
}

impl Message {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Notifications emitted to subscribers, in the order the changes happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    MessageAdded(Message),
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// Text was empty or whitespace-only.
    InvalidInput,
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptError::InvalidInput => {
                write!(f, "invalid input: message text must not be blank")
            }
        }
    }
}

impl std::error::Error for TranscriptError {}

pub struct TranscriptStore {
    messages: Vec<Message>,
    next_sequence: u64,
    subscribers: Vec<EventSender<TranscriptEvent>>,
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_sequence: 1,
            subscribers: Vec::new(),
        }
    }

    /// Appends a message and notifies subscribers.
    ///
    /// The text is stored as given; callers that want it trimmed trim first.
    /// Blank text is rejected with [`TranscriptError::InvalidInput`].
    pub fn append(&mut self, text: &str, sender: Sender) -> Result<Message, TranscriptError> {
        if text.trim().is_empty() {
            return Err(TranscriptError::InvalidInput);
        }

        let message = Message {
            text: text.to_string(),
            sender,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.messages.push(message.clone());

        debug!(
            "Appended {} message seq={} (len={})",
            sender,
            message.sequence,
            message.text.len()
        );
        self.notify(TranscriptEvent::MessageAdded(message.clone()));
        Ok(message)
    }

    /// Read-only view of the whole history, oldest first.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Registers a listener. It only sees changes made after this call.
    pub fn subscribe(&mut self) -> Receiver<TranscriptEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Drops every message. Sequence numbers keep counting from where they were.
    pub fn clear(&mut self) {
        debug!("Clearing transcript ({} messages)", self.messages.len());
        self.messages.clear();
        self.notify(TranscriptEvent::Cleared);
    }

    fn notify(&mut self, event: TranscriptEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            warn!("Pruned {} transcript subscriber(s): receiver dropped", dropped);
        }
    }
}
