use log::trace;

use crate::env::Outcome;

/// What happened to the mouse during one tick, as seen by the reward rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub prev_cheese_distance: usize,
    pub cheese_distance: usize,
    pub prev_cat_distance: usize,
    /// Distance to the cat after the cat has moved
    pub cat_distance: usize,
    pub revisit: bool,
    pub idle: bool,
}

/// Term derived from the cat's proximity in [`Shaping::Proportional`]
///
/// It is computed every tick and then dropped, never reaching the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    /// `5 * (3 - d)` within two cells
    Bonus,
    /// `-(3 - d)` within two cells
    Penalty,
}

impl Proximity {
    fn term(self, cat_distance: usize) -> Option<f64> {
        (cat_distance <= 2).then(|| {
            let closeness = 3.0 - cat_distance as f64;
            match self {
                Proximity::Bonus => 5.0 * closeness,
                Proximity::Penalty => -closeness,
            }
        })
    }
}

/// Reward rule of a world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shaping {
    /// Fixed bonuses and penalties for approaching the cheese, fleeing the cat, revisiting and
    /// idling; capture -100, cheese +120
    Banded,
    /// Half the change in distance to the cheese plus small revisit and idle penalties;
    /// capture -30, cheese +30
    Proportional(Proximity),
}

impl Shaping {
    const STEP_COST: f64 = -0.1;

    /// Reward for a tick, terminal values replacing the shaped reward entirely
    pub fn reward(&self, signal: &Signal, outcome: Option<Outcome>) -> f64 {
        // the shaped value is still computed on terminal ticks, then discarded
        let shaped = self.shape(signal);
        match outcome {
            Some(Outcome::Captured) => self.capture_reward(),
            Some(Outcome::ReachedCheese) => self.cheese_reward(),
            None => shaped,
        }
    }

    pub fn capture_reward(&self) -> f64 {
        match self {
            Shaping::Banded => -100.0,
            Shaping::Proportional(_) => -30.0,
        }
    }

    pub fn cheese_reward(&self) -> f64 {
        match self {
            Shaping::Banded => 120.0,
            Shaping::Proportional(_) => 30.0,
        }
    }

    fn shape(&self, s: &Signal) -> f64 {
        match self {
            Shaping::Banded => {
                let mut reward = Self::STEP_COST;
                if s.cheese_distance < s.prev_cheese_distance {
                    reward += 10.0;
                } else {
                    reward -= 2.0;
                }
                if s.cat_distance < s.prev_cat_distance {
                    reward -= 5.0;
                } else {
                    reward += 2.0;
                }
                if s.revisit {
                    reward -= 8.0;
                }
                if s.idle {
                    reward -= 10.0;
                }
                reward
            }
            Shaping::Proportional(proximity) => {
                let revisit_penalty = if s.revisit { -0.5 } else { 0.0 };
                let idle_penalty = if s.idle { -0.3 } else { 0.0 };
                let distance_reward =
                    (s.prev_cheese_distance as f64 - s.cheese_distance as f64) * 0.5;
                if let Some(term) = proximity.term(s.cat_distance) {
                    trace!("cat proximity term {term} dropped");
                }
                Self::STEP_COST + distance_reward + revisit_penalty + idle_penalty
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal() -> Signal {
        Signal {
            prev_cheese_distance: 4,
            cheese_distance: 3,
            prev_cat_distance: 3,
            cat_distance: 4,
            revisit: false,
            idle: false,
        }
    }

    #[test]
    fn banded_accumulates_every_condition() {
        let s = signal();
        assert_eq!(Shaping::Banded.reward(&s, None), -0.1 + 10.0 + 2.0);

        let s = Signal {
            cheese_distance: 4,
            cat_distance: 2,
            revisit: true,
            idle: true,
            ..signal()
        };
        assert_eq!(
            Shaping::Banded.reward(&s, None),
            -0.1 - 2.0 - 5.0 - 8.0 - 10.0
        );
    }

    #[test]
    fn proportional_uses_distance_delta() {
        let shaping = Shaping::Proportional(Proximity::Penalty);
        assert_eq!(shaping.reward(&signal(), None), -0.1 + 0.5);

        let retreat = Signal {
            cheese_distance: 6,
            revisit: true,
            ..signal()
        };
        assert_eq!(shaping.reward(&retreat, None), -0.1 + -1.0 + -0.5);

        let idle = Signal {
            cheese_distance: 4,
            revisit: true,
            idle: true,
            ..signal()
        };
        assert_eq!(shaping.reward(&idle, None), -0.1 + 0.0 + -0.5 + -0.3);
    }

    #[test]
    fn proximity_never_reaches_reward() {
        let near = Signal {
            cat_distance: 1,
            ..signal()
        };
        let far = Signal {
            cat_distance: 4,
            ..signal()
        };
        for proximity in [Proximity::Bonus, Proximity::Penalty] {
            let shaping = Shaping::Proportional(proximity);
            assert_eq!(shaping.reward(&near, None), shaping.reward(&far, None));
        }
        assert_eq!(Proximity::Bonus.term(1), Some(10.0));
        assert_eq!(Proximity::Penalty.term(2), Some(-1.0));
        assert_eq!(Proximity::Penalty.term(3), None);
    }

    #[test]
    fn terminal_rewards_replace_shaping() {
        let s = signal();
        assert_eq!(Shaping::Banded.reward(&s, Some(Outcome::Captured)), -100.0);
        assert_eq!(Shaping::Banded.reward(&s, Some(Outcome::ReachedCheese)), 120.0);
        let shaping = Shaping::Proportional(Proximity::Bonus);
        assert_eq!(shaping.reward(&s, Some(Outcome::Captured)), -30.0);
        assert_eq!(shaping.reward(&s, Some(Outcome::ReachedCheese)), 30.0);
    }
}
