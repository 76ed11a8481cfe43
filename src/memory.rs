use crate::env::Outcome;

/// Represents a single experience or transition in the environment
#[derive(Clone, Debug, PartialEq)]
pub struct Exp<S, A> {
    /// The state of the environment before taking the action
    pub state: S,
    /// The action taken in the given state
    pub action: A,
    /// The state of the environment after the action is taken, terminal or not
    pub next_state: S,
    /// The reward received after taking the action
    pub reward: f64,
    /// Set if the action ended the episode
    pub outcome: Option<Outcome>,
}

impl<S, A> Exp<S, A> {
    pub fn terminated(&self) -> bool {
        self.outcome.is_some()
    }
}
