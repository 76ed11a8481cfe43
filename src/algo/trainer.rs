use log::info;
use rand::Rng;

use super::{exhausted, EpisodeStats};
use crate::{
    decay::{self, Decay},
    ds::QTable,
    ensure_interval,
    env::{GridEnvironment, Step},
    exploration::{Choice, EpsilonGreedy},
    gym::{Action, Observation},
    memory::Exp,
    Result,
};

/// Configuration for the [`Trainer`]
#[derive(Debug, Clone)]
pub struct TrainerConfig<D: Decay> {
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate, in `[0, 1]`
    pub alpha: f64,
    /// Discount factor, in `[0, 1]`
    pub gamma: f64,
    /// Cut episodes off after this many steps
    pub max_steps: Option<u32>,
    /// Log progress every this many episodes, `0` to stay quiet
    pub log_every: u32,
}

impl Default for TrainerConfig<decay::Geometric> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(decay::Geometric::default()),
            alpha: 0.1,
            gamma: 0.95,
            max_steps: None,
            log_every: 10_000,
        }
    }
}

/// Tabular Q-learning over a dense [`QTable`]
///
/// ### Generics
/// - `D` - The schedule epsilon follows, advanced once per episode
/// - `R` - The random source used for exploration
pub struct Trainer<D: Decay, R: Rng> {
    q_table: QTable,
    exploration: EpsilonGreedy<D>,
    alpha: f64,
    gamma: f64,
    max_steps: Option<u32>,
    log_every: u32,
    rng: R,
    episode: u32,
    history: Vec<EpisodeStats>,
}

impl<D: Decay, R: Rng> Trainer<D, R> {
    /// Initialize a trainer that improves `q_table` in place
    ///
    /// **Errors** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: TrainerConfig<D>, q_table: QTable, rng: R) -> Result<Self> {
        let TrainerConfig {
            exploration,
            alpha,
            gamma,
            max_steps,
            log_every,
        } = config;
        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        Ok(Self {
            q_table,
            exploration,
            alpha,
            gamma,
            max_steps,
            log_every,
            rng,
            episode: 0,
            history: Vec::new(),
        })
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    /// Number of episodes run so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Epsilon for the next episode
    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon(self.episode)
    }

    /// Per-episode statistics, oldest first
    pub fn history(&self) -> &[EpisodeStats] {
        &self.history
    }

    /// Choose an action based on the current state and exploration policy
    fn act<E>(&mut self, env: &E, state: &Observation) -> Action
    where
        E: GridEnvironment,
    {
        match self.exploration.choose(self.episode, &mut self.rng) {
            Choice::Explore => env.random_action(&mut self.rng),
            Choice::Exploit => self.q_table.best_action(state),
        }
    }

    /// Blend the bootstrapped target into `Q[s, a]`
    ///
    /// Terminal transitions bootstrap from the next state's values like any other, so tables stay
    /// comparable with ones trained by the same rule elsewhere.
    fn learn(&mut self, exp: &Exp<Observation, Action>) {
        let q_value = self.q_table.get(&exp.state, exp.action);
        let max_next_q = self.q_table.max_value(&exp.next_state);
        let target = exp.reward + self.gamma * max_next_q;
        let updated = (1.0 - self.alpha) * q_value + self.alpha * target;
        self.q_table.set(&exp.state, exp.action, updated);
    }

    /// Run one training episode in `env`
    pub fn go<E>(&mut self, env: &mut E) -> Result<EpisodeStats>
    where
        E: GridEnvironment,
    {
        self.go_with(env, |_| {})
    }

    /// Run one training episode, handing every transition to `on_step` after learning from it
    pub fn go_with<E, F>(&mut self, env: &mut E, mut on_step: F) -> Result<EpisodeStats>
    where
        E: GridEnvironment,
        F: FnMut(&Exp<Observation, Action>),
    {
        self.q_table.ensure_matches(env.grid_size(), env.layout())?;
        let mut stats = EpisodeStats::default();
        let mut state = env.reset();
        while env.is_active() && !exhausted(stats.steps, self.max_steps) {
            let action = self.act(env, &state);
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

            self.learn(&exp);
            on_step(&exp);
            stats.record(&exp);
            state = next_state;
        }

        self.episode += 1;
        self.history.push(stats.clone());
        Ok(stats)
    }

    /// Run `episodes` training episodes, logging progress along the way
    pub fn train<E>(&mut self, env: &mut E, episodes: u32) -> Result<()>
    where
        E: GridEnvironment,
    {
        for i in 1..=episodes {
            self.go(env)?;
            if self.log_every > 0 && i % self.log_every == 0 {
                let recent = &self.history[self.history.len() - self.log_every as usize..];
                let mean_reward =
                    recent.iter().map(|s| s.total_reward).sum::<f64>() / recent.len() as f64;
                let successes = recent.iter().filter(|s| s.succeeded()).count();
                info!(
                    "Episode {}/{episodes}: epsilon {:.3}, mean reward {mean_reward:.2}, \
                     reached cheese {successes}/{}",
                    i,
                    self.epsilon(),
                    recent.len()
                );
            }
        }
        Ok(())
    }
}
