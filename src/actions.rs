use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

use crate::{component::input::InputAction, page::form::FormAction, page::form::FormSubmission};

#[derive(Clone, Debug)]
pub enum Action {
    Tick,
    Render,
    Quit,
    /// Leave the terminal and stop the process until resumed
    Suspend,
    /// Whether key strokes go to the focused input
    SwitchInputMode(bool),
    /// The form was submitted, quit and report it
    Submit(FormSubmission),

    Form(FormAction),

    Comp((CompAction, u64)),

    #[cfg(test)]
    TestPage(crate::component::input::test::TestInputPageAction),
}

#[derive(Clone, Debug)]
pub enum CompAction {
    Input(InputAction),
}

#[derive(Clone, Debug)]
pub struct ActionSender(pub UnboundedSender<Action>);

impl ActionSender {
    pub fn send<T: Into<Action>>(&self, action: T) {
        // the receiver lives in RootState, which outlives every sender
        if self.0.send(action.into()).is_err() {
            error!("Action receiver is closed, action dropped");
        }
    }
}
impl From<UnboundedSender<Action>> for ActionSender {
    fn from(value: UnboundedSender<Action>) -> Self {
        ActionSender(value)
    }
}
