mod evaluator;
mod trainer;

pub use evaluator::{Evaluation, Evaluator, EvaluatorConfig};
pub use trainer::{Trainer, TrainerConfig};

use crate::{env::Outcome, memory::Exp};

/// Summary of one episode
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpisodeStats {
    pub total_reward: f64,
    pub steps: u32,
    /// `None` if the episode was cut off by a step limit
    pub outcome: Option<Outcome>,
}

impl EpisodeStats {
    fn record<S, A>(&mut self, exp: &Exp<S, A>) {
        self.total_reward += exp.reward;
        self.steps += 1;
        self.outcome = exp.outcome;
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == Some(Outcome::ReachedCheese)
    }
}

/// Whether an episode that has taken `steps` steps has hit `limit`
fn exhausted(steps: u32, limit: Option<u32>) -> bool {
    limit.is_some_and(|max| steps >= max)
}
