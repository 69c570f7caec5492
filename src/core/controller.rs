//! # Conversation Controller
//!
//! Turns a submission into transcript entries:
//!
//! ```text
//! submit()
//!   ├── input.read_and_clear()           // once per trigger
//!   ├── trim → blank? stop, nothing happens
//!   ├── store.append(text, User)         // synchronous
//!   └── scheduler.schedule(delay, reply) // fire-and-forget
//!
//! run_due() / run_next()                 // driven by the owning event loop
//!   └── store.append(responder.respond(text), Bot)
//! ```
//!
//! The controller never blocks waiting for a reply. Every submission gets its
//! own deferred reply, so replies may land after later user messages, but a
//! reply always lands after the message that caused it.
//!
//! All collaborators are handed in at construction; nothing is looked up.

use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use tokio::time::Instant;

use crate::core::config::ResolvedConfig;
use crate::core::input::InputSource;
use crate::core::responder::{EchoResponder, Responder};
use crate::core::scheduler::Scheduler;
use crate::core::transcript::{Message, Sender, TranscriptEvent, TranscriptStore};

/// Bot notice used by the duplicate-submission guard.
pub const DUPLICATE_NOTICE: &str = "You already sent that message, please continue.";

/// A reply waiting for its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingReply {
    prompt: String,
    reply_to: u64,
}

pub struct Controller<I: InputSource> {
    store: TranscriptStore,
    input: I,
    responder: Arc<dyn Responder>,
    scheduler: Scheduler<PendingReply>,
    response_delay: Duration,
    greeting: Option<String>,
    duplicate_window: Option<Duration>,
    /// Last accepted submission, only tracked while the duplicate guard is on.
    last_accepted: Option<(String, Instant)>,
}

impl<I: InputSource> Controller<I> {
    pub fn new(input: I, responder: Arc<dyn Responder>, config: &ResolvedConfig) -> Self {
        info!(
            "Controller ready (responder={}, delay={}ms)",
            responder.name(),
            config.response_delay.as_millis()
        );
        Self {
            store: TranscriptStore::new(),
            input,
            responder,
            scheduler: Scheduler::new(),
            response_delay: config.response_delay,
            greeting: config.greeting.clone(),
            duplicate_window: config.duplicate_window,
            last_accepted: None,
        }
    }

    /// Builds a controller with the echo responder configured by `config`.
    pub fn from_config(input: I, config: &ResolvedConfig) -> Self {
        let responder = Arc::new(EchoResponder::new(config.response_prefix.clone()));
        Self::new(input, responder, config)
    }

    /// Appends the configured greeting, if any.
    ///
    /// Separate from construction so renderers can subscribe first.
    pub fn start(&mut self) -> Option<Message> {
        let greeting = self.greeting.clone()?;
        self.append(&greeting, Sender::Bot)
    }

    /// Reads the pending input, clears it, and submits it.
    ///
    /// Every trigger (Enter, the Send button, a stdin line) lands here.
    pub fn submit(&mut self) -> Option<Message> {
        let raw = self.input.read_and_clear();
        self.submit_text(&raw)
    }

    /// Submits `raw` directly, bypassing the input source.
    ///
    /// Blank input is ignored silently. Returns the appended user message.
    pub fn submit_text(&mut self, raw: &str) -> Option<Message> {
        let text = raw.trim();
        if text.is_empty() {
            debug!("Ignoring blank submission");
            return None;
        }

        if self.is_duplicate(text) {
            info!("Duplicate submission within guard window, not resending");
            self.append(DUPLICATE_NOTICE, Sender::Bot);
            return None;
        }

        let message = self.append(text, Sender::User)?;
        if self.duplicate_window.is_some() {
            self.last_accepted = Some((text.to_string(), Instant::now()));
        }

        self.scheduler.schedule(
            self.response_delay,
            PendingReply {
                prompt: text.to_string(),
                reply_to: message.sequence(),
            },
        );
        debug!(
            "Scheduled reply to seq={} in {}ms ({} pending)",
            message.sequence(),
            self.response_delay.as_millis(),
            self.scheduler.len()
        );
        Some(message)
    }

    /// Delivers every reply whose deadline has passed. Returns how many landed.
    pub fn run_due(&mut self) -> usize {
        let now = Instant::now();
        let mut delivered = 0;
        while let Some(pending) = self.scheduler.pop_due(now) {
            if self.deliver(pending).is_some() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Waits for the next reply to come due and delivers it.
    /// Resolves to `None` immediately when nothing is pending.
    pub async fn run_next(&mut self) -> Option<Message> {
        let pending = self.scheduler.next().await?;
        self.deliver(pending)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Number of replies scheduled but not yet delivered.
    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.store
    }

    pub fn subscribe(&mut self) -> Receiver<TranscriptEvent> {
        self.store.subscribe()
    }

    /// Clears the transcript. Replies already scheduled still land.
    pub fn clear(&mut self) {
        info!("Clearing conversation ({} replies pending)", self.pending());
        self.store.clear();
        self.last_accepted = None;
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn responder_name(&self) -> &str {
        self.responder.name()
    }

    fn deliver(&mut self, pending: PendingReply) -> Option<Message> {
        let reply = self.responder.respond(&pending.prompt);
        debug!("Delivering reply to seq={}", pending.reply_to);
        self.append(&reply, Sender::Bot)
    }

    fn append(&mut self, text: &str, sender: Sender) -> Option<Message> {
        match self.store.append(text, sender) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!("Dropped {} message: {}", sender, e);
                None
            }
        }
    }

    fn is_duplicate(&self, text: &str) -> bool {
        let (Some(window), Some((last, at))) = (self.duplicate_window, &self.last_accepted) else {
            return false;
        };
        last == text && at.elapsed() < window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::InputBuffer;
    use crate::test_support::{test_config, test_controller};

    const DELAY: Duration = Duration::from_millis(500);

    fn texts(controller: &Controller<InputBuffer>) -> Vec<(Sender, String)> {
        controller
            .transcript()
            .all()
            .iter()
            .map(|m| (m.sender(), m.text().to_string()))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_reads_and_clears_input() {
        let mut controller = test_controller();
        controller.input_mut().set("  hello  ");

        let message = controller.submit().unwrap();
        assert_eq!(message.text(), "hello");
        assert_eq!(message.sender(), Sender::User);
        assert!(controller.input().is_empty());
        assert_eq!(controller.pending(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_submit_still_clears_input() {
        let mut controller = test_controller();
        controller.input_mut().set(" \t ");

        assert!(controller.submit().is_none());
        assert!(controller.input().is_empty());
        assert!(controller.transcript().is_empty());
        assert_eq!(controller.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_not_delivered_early() {
        let mut controller = test_controller();
        controller.submit_text("ping");

        tokio::time::advance(DELAY - Duration::from_millis(1)).await;
        assert_eq!(controller.run_due(), 0);
        assert_eq!(controller.transcript().len(), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(controller.run_due(), 1);
        assert_eq!(
            texts(&controller),
            vec![
                (Sender::User, "ping".to_string()),
                (Sender::Bot, "Thanks! Your message was: ping".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_next_waits_exactly_one_delay() {
        let mut controller = test_controller();
        controller.submit_text("hello");

        let started = Instant::now();
        let reply = controller.run_next().await.unwrap();
        assert!(started.elapsed() >= DELAY);
        assert_eq!(reply.sender(), Sender::Bot);
        assert_eq!(reply.sequence(), 2);
        assert!(controller.run_next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_greeting_on_start() {
        let mut config = test_config();
        config.greeting = Some("Hello! Type a message to begin.".to_string());
        let mut controller = Controller::from_config(InputBuffer::new(), &config);
        assert!(controller.transcript().is_empty());

        let greeting = controller.start().unwrap();
        assert_eq!(greeting.sender(), Sender::Bot);
        assert_eq!(greeting.sequence(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_without_greeting_is_noop() {
        let mut controller = test_controller();
        assert!(controller.start().is_none());
        assert!(controller.transcript().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_guard() {
        let mut config = test_config();
        config.duplicate_window = Some(Duration::from_millis(800));
        let mut controller = Controller::from_config(InputBuffer::new(), &config);

        controller.submit_text("apply");
        assert!(controller.submit_text(" apply ").is_none());
        assert_eq!(
            texts(&controller),
            vec![
                (Sender::User, "apply".to_string()),
                (Sender::Bot, DUPLICATE_NOTICE.to_string()),
            ]
        );
        assert_eq!(controller.pending(), 1);

        // Outside the window the same text goes through again
        tokio::time::advance(Duration::from_millis(800)).await;
        assert!(controller.submit_text("apply").is_some());
        assert_eq!(controller.run_due(), 1);
        assert_eq!(controller.pending(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_guard_disabled_by_default() {
        let mut controller = test_controller();
        controller.submit_text("same");
        controller.submit_text("same");
        assert_eq!(controller.transcript().len(), 2);
        assert_eq!(controller.pending(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_does_not_cancel_pending_reply() {
        let mut controller = test_controller();
        controller.submit_text("before clear");
        controller.clear();
        assert!(controller.transcript().is_empty());

        tokio::time::advance(DELAY).await;
        assert_eq!(controller.run_due(), 1);
        let last = controller.transcript().last().unwrap();
        assert_eq!(last.text(), "Thanks! Your message was: before clear");
        assert_eq!(last.sequence(), 2);
    }

    struct SilentResponder;

    impl Responder for SilentResponder {
        fn name(&self) -> &str {
            "silent"
        }

        fn respond(&self, _text: &str) -> String {
            String::new()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_reply_is_dropped_not_panicked() {
        let mut controller =
            Controller::new(InputBuffer::new(), Arc::new(SilentResponder), &test_config());
        controller.submit_text("anything");

        tokio::time::advance(DELAY).await;
        assert_eq!(controller.run_due(), 0);
        assert_eq!(controller.pending(), 0);
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.responder_name(), "silent");
    }
}
