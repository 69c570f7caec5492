//! # Response Generation
//!
//! The controller asks a [`Responder`] what the bot should say. Today that is
//! a canned echo; the trait is the seam where a real generator plugs in.

/// Default prefix prepended by [`EchoResponder`].
pub const DEFAULT_RESPONSE_PREFIX: &str = "Thanks! Your message was: ";

pub trait Responder: Send + Sync {
    /// Short name used in logs and the title bar.
    fn name(&self) -> &str;

    /// Produces the bot reply for an already-trimmed user message.
    fn respond(&self, text: &str) -> String;
}

/// Replies with a fixed prefix followed by the user's own text.
pub struct EchoResponder {
    prefix: String,
}

impl Default for EchoResponder {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_PREFIX)
    }
}

impl EchoResponder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Responder for EchoResponder {
    fn name(&self) -> &str {
        "echo"
    }

    fn respond(&self, text: &str) -> String {
        format!("{}{}", self.prefix, text)
    }
}
