//! # Input Source
//!
//! Where the controller gets the text to submit. The controller reads and
//! clears the buffer in one step, once per submission.

pub trait InputSource {
    /// Returns the pending text and leaves the source empty.
    fn read_and_clear(&mut self) -> String;
}

/// A plain in-memory text buffer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    buffer: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl InputSource for InputBuffer {
    fn read_and_clear(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}
