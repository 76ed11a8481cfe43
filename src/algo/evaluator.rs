use log::{debug, info};

use super::{exhausted, EpisodeStats};
use crate::{
    ds::QTable,
    env::{GridEnvironment, Outcome, Step},
    gym::{Action, Observation},
    memory::Exp,
    Result,
};

/// Configuration for the [`Evaluator`]
#[derive(Debug, Clone, Default)]
pub struct EvaluatorConfig {
    /// Cut episodes off after this many steps, counting them as failures
    pub max_steps: Option<u32>,
}

/// Aggregate result of a batch of greedy episodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub episodes: u32,
    pub successes: u32,
    pub captures: u32,
    pub truncated: u32,
}

impl Evaluation {
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.successes as f64 / self.episodes as f64
        }
    }
}

/// Greedy rollouts against a fixed [`QTable`]
///
/// The table is only read, never updated, and no exploration happens.
pub struct Evaluator<'a> {
    q_table: &'a QTable,
    max_steps: Option<u32>,
}

impl<'a> Evaluator<'a> {
    pub fn new(q_table: &'a QTable, config: EvaluatorConfig) -> Self {
        Self {
            q_table,
            max_steps: config.max_steps,
        }
    }

    /// Run one greedy episode in `env`
    pub fn go<E>(&self, env: &mut E) -> Result<EpisodeStats>
    where
        E: GridEnvironment,
    {
        self.go_with(env, |_| {})
    }

    /// Run one greedy episode, handing every transition to `on_step`
    pub fn go_with<E, F>(&self, env: &mut E, mut on_step: F) -> Result<EpisodeStats>
    where
        E: GridEnvironment,
        F: FnMut(&Exp<Observation, Action>),
    {
        self.q_table.ensure_matches(env.grid_size(), env.layout())?;
        let mut stats = EpisodeStats::default();
        let mut state = env.reset();
        while env.is_active() && !exhausted(stats.steps, self.max_steps) {
            let action = self.q_table.best_action(&state);
            let Step {
                state: next_state,
                reward,
                outcome,
            } = env.step(action)?;
            let exp = Exp {
                state,
                action,
                next_state,
                reward,
                outcome,
            };
            on_step(&exp);
            stats.record(&exp);
            state = next_state;
        }
        debug!(
            "Greedy episode: {:?} after {} steps",
            stats.outcome, stats.steps
        );
        Ok(stats)
    }

    /// Run `episodes` greedy episodes and tally how they ended
    pub fn evaluate<E>(&self, env: &mut E, episodes: u32) -> Result<Evaluation>
    where
        E: GridEnvironment,
    {
        let mut evaluation = Evaluation {
            episodes,
            ..Default::default()
        };
        for _ in 0..episodes {
            match self.go(env)?.outcome {
                Some(Outcome::ReachedCheese) => evaluation.successes += 1,
                Some(Outcome::Captured) => evaluation.captures += 1,
                None => evaluation.truncated += 1,
            }
        }
        info!(
            "Success rate {:.2}% over {episodes} episodes ({} captured, {} cut off)",
            evaluation.success_rate() * 100.0,
            evaluation.captures,
            evaluation.truncated
        );
        Ok(evaluation)
    }
}
