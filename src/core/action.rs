//! # Actions
//!
//! Everything a user can ask Parley to do becomes an `Action`.
//! User presses Enter or clicks Send? Both are `Action::Submit`.
//! Ctrl+L? That's `Action::Clear`.
//!
//! The `update()` function applies an action to the controller and returns
//! an `Effect` telling the adapter what to do next. Adapters never call the
//! controller's mutating methods directly for user intent.
//!
//! ```text
//! Controller + Action  →  update()  →  Effect
//! ```

use log::debug;

use crate::core::controller::Controller;
use crate::core::input::InputSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Read whatever is in the input source and send it.
    Submit,
    /// Start over with an empty transcript.
    Clear,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
}

pub fn update<I: InputSource>(controller: &mut Controller<I>, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Submit => {
            controller.submit();
            Effect::None
        }
        Action::Clear => {
            controller.clear();
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::Sender;
    use crate::test_support::test_controller;

    #[tokio::test(start_paused = true)]
    async fn test_submit_action_goes_through_input_source() {
        let mut controller = test_controller();
        controller.input_mut().set("from the input box");

        assert_eq!(update(&mut controller, Action::Submit), Effect::None);
        let last = controller.transcript().last().unwrap();
        assert_eq!(last.sender(), Sender::User);
        assert_eq!(last.text(), "from the input box");
        assert!(controller.input().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_action() {
        let mut controller = test_controller();
        controller.submit_text("hi");
        assert_eq!(update(&mut controller, Action::Clear), Effect::None);
        assert!(controller.transcript().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_action() {
        let mut controller = test_controller();
        assert_eq!(update(&mut controller, Action::Quit), Effect::Quit);
    }
}
