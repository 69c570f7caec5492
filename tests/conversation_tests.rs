//! End-to-end conversation tests against the public API.
//!
//! Time is paused, so every delay is exact and nothing actually sleeps.

use std::sync::Arc;
use std::time::Duration;

use parley::core::action::{Action, Effect, update};
use parley::core::config::ResolvedConfig;
use parley::core::controller::Controller;
use parley::core::input::{InputBuffer, InputSource};
use parley::core::responder::{DEFAULT_RESPONSE_PREFIX, Responder};
use parley::core::transcript::{Sender, TranscriptEvent};
use tokio::time::{Instant, advance};
use tokio_test::{assert_pending, assert_ready, task};

const DELAY: Duration = Duration::from_millis(500);

fn config() -> ResolvedConfig {
    ResolvedConfig {
        response_delay: DELAY,
        response_prefix: DEFAULT_RESPONSE_PREFIX.to_string(),
        greeting: None,
        duplicate_window: None,
    }
}

fn controller() -> Controller<InputBuffer> {
    Controller::from_config(InputBuffer::new(), &config())
}

fn type_and_submit(controller: &mut Controller<InputBuffer>, text: &str) -> Effect {
    controller.input_mut().set(text);
    update(controller, Action::Submit)
}

fn texts(controller: &Controller<InputBuffer>) -> Vec<(Sender, String)> {
    controller
        .transcript()
        .all()
        .iter()
        .map(|m| (m.sender(), m.text().to_string()))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn user_message_appears_immediately_and_input_is_cleared() {
    let mut controller = controller();
    type_and_submit(&mut controller, "  hello world  ");

    assert_eq!(
        texts(&controller),
        vec![(Sender::User, "hello world".to_string())]
    );
    assert!(controller.input().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reply_lands_exactly_at_the_delay() {
    let mut controller = controller();
    type_and_submit(&mut controller, "ping");

    advance(DELAY - Duration::from_millis(1)).await;
    assert_eq!(controller.run_due(), 0);
    assert_eq!(controller.transcript().len(), 1);

    advance(Duration::from_millis(1)).await;
    assert_eq!(controller.run_due(), 1);
    assert_eq!(
        texts(&controller),
        vec![
            (Sender::User, "ping".to_string()),
            (
                Sender::Bot,
                "Thanks! Your message was: ping".to_string()
            ),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn blank_submissions_change_nothing() {
    let mut controller = controller();
    let events = controller.subscribe();

    for blank in ["", " ", "\t\n ", "\u{3000}"] {
        assert_eq!(type_and_submit(&mut controller, blank), Effect::None);
    }
    advance(DELAY * 2).await;

    assert_eq!(controller.run_due(), 0);
    assert!(controller.transcript().is_empty());
    assert_eq!(controller.pending(), 0);
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn rapid_submissions_keep_order_and_pair_replies() {
    let mut controller = controller();
    type_and_submit(&mut controller, "A");
    advance(Duration::from_millis(100)).await;
    type_and_submit(&mut controller, "B");

    // Both replies land, each DELAY after its own submission
    advance(Duration::from_millis(400)).await;
    assert_eq!(controller.run_due(), 1);
    advance(Duration::from_millis(100)).await;
    assert_eq!(controller.run_due(), 1);

    assert_eq!(
        texts(&controller),
        vec![
            (Sender::User, "A".to_string()),
            (Sender::User, "B".to_string()),
            (Sender::Bot, "Thanks! Your message was: A".to_string()),
            (Sender::Bot, "Thanks! Your message was: B".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn same_instant_submissions_reply_in_submission_order() {
    let mut controller = controller();
    for text in ["first", "second", "third"] {
        type_and_submit(&mut controller, text);
    }

    advance(DELAY).await;
    assert_eq!(controller.run_due(), 3);

    let replies: Vec<String> = controller
        .transcript()
        .all()
        .iter()
        .filter(|m| m.sender() == Sender::Bot)
        .map(|m| m.text().to_string())
        .collect();
    assert_eq!(
        replies,
        vec![
            "Thanks! Your message was: first",
            "Thanks! Your message was: second",
            "Thanks! Your message was: third",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn sequence_numbers_strictly_increase_across_interleavings() {
    let mut controller = controller();
    // Deterministic mix of gaps shorter and longer than the delay
    let gaps_ms = [0u64, 120, 730, 5, 499, 500, 1, 260, 1200, 0];

    for (i, gap) in gaps_ms.iter().enumerate() {
        advance(Duration::from_millis(*gap)).await;
        controller.run_due();
        type_and_submit(&mut controller, &format!("message {i}"));
    }
    advance(DELAY).await;
    controller.run_due();

    let messages = controller.transcript().all();
    assert_eq!(messages.len(), gaps_ms.len() * 2);
    assert!(
        messages
            .windows(2)
            .all(|pair| pair[0].sequence() < pair[1].sequence())
    );
    assert_eq!(controller.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn renderer_sees_every_append_in_order() {
    let mut controller = controller();
    let events = controller.subscribe();

    type_and_submit(&mut controller, "one");
    type_and_submit(&mut controller, "two");
    advance(DELAY).await;
    controller.run_due();

    let seen: Vec<u64> = events
        .try_iter()
        .map(|event| match event {
            TranscriptEvent::MessageAdded(message) => message.sequence(),
            TranscriptEvent::Cleared => panic!("unexpected clear"),
        })
        .collect();
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn run_next_waits_for_the_deadline() {
    let mut controller = controller();
    type_and_submit(&mut controller, "later");
    let started = Instant::now();

    {
        let mut next = task::spawn(controller.run_next());
        assert_pending!(next.poll());
        advance(DELAY).await;
        let reply = assert_ready!(next.poll());
        assert_eq!(
            reply.map(|m| m.text().to_string()),
            Some("Thanks! Your message was: later".to_string())
        );
    }

    assert!(started.elapsed() >= DELAY);
    assert_eq!(controller.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn replies_survive_clear() {
    let mut controller = controller();
    type_and_submit(&mut controller, "before clear");
    assert_eq!(update(&mut controller, Action::Clear), Effect::None);
    assert!(controller.transcript().is_empty());

    advance(DELAY).await;
    assert_eq!(controller.run_due(), 1);

    let messages = controller.transcript().all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), "Thanks! Your message was: before clear");
    // Numbering continues from before the clear
    assert_eq!(messages[0].sequence(), 2);
}

struct ShoutingResponder;

impl Responder for ShoutingResponder {
    fn name(&self) -> &str {
        "shout"
    }

    fn respond(&self, text: &str) -> String {
        text.to_uppercase()
    }
}

#[tokio::test(start_paused = true)]
async fn responder_is_replaceable() {
    let mut controller =
        Controller::new(InputBuffer::new(), Arc::new(ShoutingResponder), &config());
    assert_eq!(controller.responder_name(), "shout");

    controller.input_mut().set("quiet please");
    controller.submit();
    advance(DELAY).await;
    controller.run_due();

    assert_eq!(
        controller.transcript().last().map(|m| m.text().to_string()),
        Some("QUIET PLEASE".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn quit_reports_effect_without_touching_transcript() {
    let mut controller = controller();
    type_and_submit(&mut controller, "bye");
    assert_eq!(update(&mut controller, Action::Quit), Effect::Quit);
    assert_eq!(controller.transcript().len(), 1);
    assert_eq!(controller.pending(), 1);
}

#[test]
fn input_buffer_is_an_input_source() {
    let mut input = InputBuffer::new();
    input.set("draft");
    assert_eq!(input.read_and_clear(), "draft");
    assert!(input.is_empty());
}
