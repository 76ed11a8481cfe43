use rand::Rng;

use crate::{
    gym::{Action, Observation, ObservationLayout},
    Result,
};

/// How an episode ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The cat caught the mouse, by landing on it or by swapping cells with it
    Captured,
    /// The mouse reached the cheese
    ReachedCheese,
}

/// Result of one [`Environment::step`]
#[derive(Clone, Debug, PartialEq)]
pub struct Step<S> {
    /// State after the step, reported even when the episode has ended
    pub state: S,
    pub reward: f64,
    /// `Some` if this step ended the episode
    pub outcome: Option<Outcome>,
}

impl<S> Step<S> {
    pub fn terminated(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Draw an action uniformly from every action the agent could take
    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action;

    /// Determine if an episode is in progress
    fn is_active(&self) -> bool;

    /// Update the environment in response to an action taken by an agent, producing a new state
    /// and associated reward
    ///
    /// **Errors** if no episode is running
    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>>;

    /// Reset the environment to an initial state and start a new episode
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;
}

/// An [`Environment`] on a square grid whose observations index a dense
/// [`QTable`](crate::ds::QTable)
pub trait GridEnvironment: Environment<State = Observation, Action = Action> {
    /// Side length of the grid, bounding every coordinate of an observation
    fn grid_size(&self) -> usize;

    /// Field order of the observations
    fn layout(&self) -> ObservationLayout;
}
