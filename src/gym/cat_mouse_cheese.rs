use std::collections::HashSet;

use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};
use strum::{Display, EnumString, VariantArray};

use super::{
    shaping::{Proximity, Shaping, Signal},
    Action, BlockedCells, DirectionalWalls, Observation, ObservationLayout, Open, Pos,
    RandomAdversary, WallModel,
};
use crate::{
    ds::QTable,
    env::{Environment, GridEnvironment, Outcome, Step},
    render::Snapshot,
    Error, Result,
};

/// The three stock worlds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, VariantArray)]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    /// 5x5 with no walls
    Empty,
    /// 5x5 with walls between some neighboring cells
    Bordered,
    /// 10x10 with sixteen impassable cells
    Obstacles,
}

impl Variant {
    pub fn config(self) -> Result<WorldConfig> {
        match self {
            Variant::Empty => WorldConfig::new(
                Open::new(5)?,
                ObservationLayout::MouseCheeseCat,
                Shaping::Proportional(Proximity::Bonus),
            ),
            Variant::Bordered => WorldConfig::new(
                DirectionalWalls::bordered()?,
                ObservationLayout::MouseCheeseCat,
                Shaping::Proportional(Proximity::Penalty),
            ),
            Variant::Obstacles => WorldConfig::new(
                BlockedCells::obstacles()?,
                ObservationLayout::MouseCatCheese,
                Shaping::Banded,
            ),
        }
    }
}

/// Everything that distinguishes one world from another
pub struct WorldConfig {
    walls: Box<dyn WallModel>,
    layout: ObservationLayout,
    shaping: Shaping,
}

impl WorldConfig {
    /// **Errors** if the walls leave fewer than three cells to place the mouse, cat, and cheese on
    pub fn new(
        walls: impl WallModel + 'static,
        layout: ObservationLayout,
        shaping: Shaping,
    ) -> Result<Self> {
        let size = walls.size();
        let free = (0..size)
            .flat_map(|row| (0..size).map(move |col| Pos::new(row, col)))
            .filter(|&p| !walls.is_blocked(p))
            .count();
        if free < 3 {
            return Err(Error::InvalidGridSize {
                size,
                reason: "fewer than three free cells",
            });
        }
        Ok(Self {
            walls: Box::new(walls),
            layout,
            shaping,
        })
    }
}

/// Episode lifecycle of a [`GridWorld`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Built, no episode started yet
    #[default]
    Init,
    Running,
    Terminated(Outcome),
}

/// The pursuit gridworld: a mouse looking for cheese while a cat wanders at random
///
/// Every random draw, for placing the pieces and for moving the cat, comes from the injected
/// random source `R`.
pub struct GridWorld<R: Rng> {
    walls: Box<dyn WallModel>,
    layout: ObservationLayout,
    shaping: Shaping,
    adversary: RandomAdversary,
    rng: R,
    mouse: Pos,
    cat: Pos,
    cheese: Pos,
    visited: HashSet<Pos>,
    last_cheese_distance: usize,
    last_cat_distance: usize,
    phase: Phase,
}

impl<R: Rng> GridWorld<R> {
    pub fn new(config: WorldConfig, rng: R) -> Self {
        let WorldConfig {
            walls,
            layout,
            shaping,
        } = config;
        Self {
            walls,
            layout,
            shaping,
            adversary: RandomAdversary,
            rng,
            mouse: Pos::default(),
            cat: Pos::default(),
            cheese: Pos::default(),
            visited: HashSet::new(),
            last_cheese_distance: 0,
            last_cat_distance: 0,
            phase: Phase::Init,
        }
    }

    /// Build one of the stock worlds
    pub fn from_variant(variant: Variant, rng: R) -> Result<Self> {
        Ok(Self::new(variant.config()?, rng))
    }

    pub fn size(&self) -> usize {
        self.walls.size()
    }

    pub fn layout(&self) -> ObservationLayout {
        self.layout
    }

    pub fn shaping(&self) -> Shaping {
        self.shaping
    }

    pub fn walls(&self) -> &dyn WallModel {
        &*self.walls
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mouse(&self) -> Pos {
        self.mouse
    }

    pub fn cat(&self) -> Pos {
        self.cat
    }

    pub fn cheese(&self) -> Pos {
        self.cheese
    }

    /// Cells the mouse has entered this episode
    pub fn visited(&self) -> &HashSet<Pos> {
        &self.visited
    }

    pub fn observation(&self) -> Observation {
        self.layout.encode(self.mouse, self.cat, self.cheese)
    }

    /// A zero-initialized Q-table shaped for this world
    pub fn empty_table(&self) -> QTable {
        QTable::new(self.size(), self.layout)
    }

    /// Positions and wall layout for display
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.walls(), self.mouse, self.cat, self.cheese)
    }

    /// Start a new episode with the mouse, cat, and cheese on three distinct random free cells
    pub fn reset(&mut self) -> Observation {
        self.mouse = self.random_free_cell();
        self.cat = self.random_free_cell();
        while self.cat == self.mouse {
            self.cat = self.random_free_cell();
        }
        self.cheese = self.random_free_cell();
        while self.cheese == self.cat || self.cheese == self.mouse {
            self.cheese = self.random_free_cell();
        }
        self.begin()
    }

    /// Start a new episode from explicit positions
    ///
    /// **Errors** if a position is off the grid or blocked, or two positions coincide
    pub fn place(&mut self, mouse: Pos, cat: Pos, cheese: Pos) -> Result<Observation> {
        let size = self.size();
        for (what, pos) in [("mouse", mouse), ("cat", cat), ("cheese", cheese)] {
            if !pos.in_bounds(size) {
                return Err(Error::OutOfBounds { what, pos, size });
            }
            if self.walls.is_blocked(pos) {
                return Err(Error::placement(format!("{what} on blocked cell {pos}")));
            }
        }
        if mouse == cat || cat == cheese || mouse == cheese {
            return Err(Error::placement(format!(
                "positions must be distinct, got mouse {mouse}, cat {cat}, cheese {cheese}"
            )));
        }
        self.mouse = mouse;
        self.cat = cat;
        self.cheese = cheese;
        Ok(self.begin())
    }

    fn random_free_cell(&mut self) -> Pos {
        let size = self.size();
        loop {
            let pos = Pos::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            if !self.walls.is_blocked(pos) {
                return pos;
            }
        }
    }

    fn begin(&mut self) -> Observation {
        self.visited.clear();
        self.last_cheese_distance = self.mouse.manhattan(self.cheese);
        self.last_cat_distance = self.mouse.manhattan(self.cat);
        self.phase = Phase::Running;
        debug!(
            "Episode start: mouse {}, cat {}, cheese {}",
            self.mouse, self.cat, self.cheese
        );
        self.observation()
    }

    /// Move the mouse, then the cat, and score the tick
    ///
    /// **Errors** with [`Error::EpisodeNotRunning`] before the first reset or after the episode ended
    pub fn step(&mut self, action: Action) -> Result<Step<Observation>> {
        if self.phase != Phase::Running {
            return Err(Error::EpisodeNotRunning);
        }
        let size = self.size();
        let (old_mouse, old_cat) = (self.mouse, self.cat);

        if self.walls.can_move(self.mouse, action) {
            if let Some(next) = self.mouse.step(action, size) {
                self.mouse = next;
            }
        }
        let idle = self.mouse == old_mouse;
        let revisit = !self.visited.insert(self.mouse);
        let cheese_distance = self.mouse.manhattan(self.cheese);

        let cat_move = self
            .adversary
            .choose(&*self.walls, self.cat, &mut self.rng);
        if let Some(next) = cat_move.and_then(|a| self.cat.step(a, size)) {
            self.cat = next;
        }
        let cat_distance = self.mouse.manhattan(self.cat);

        // a swap counts even though the two never share a cell
        let outcome = if self.mouse == self.cat || (self.mouse == old_cat && self.cat == old_mouse)
        {
            Some(Outcome::Captured)
        } else if self.mouse == self.cheese {
            Some(Outcome::ReachedCheese)
        } else {
            None
        };

        let signal = Signal {
            prev_cheese_distance: self.last_cheese_distance,
            cheese_distance,
            prev_cat_distance: self.last_cat_distance,
            cat_distance,
            revisit,
            idle,
        };
        let reward = self.shaping.reward(&signal, outcome);
        self.last_cheese_distance = cheese_distance;
        self.last_cat_distance = cat_distance;

        trace!(
            "{action:?}: mouse {} -> {}, cat {old_cat} -> {}, reward {reward}",
            old_mouse,
            self.mouse,
            self.cat
        );
        if let Some(outcome) = outcome {
            self.phase = Phase::Terminated(outcome);
            debug!("Episode end: {outcome:?}");
        }

        Ok(Step {
            state: self.observation(),
            reward,
            outcome,
        })
    }
}

impl<R: Rng> Environment for GridWorld<R> {
    type State = Observation;
    type Action = Action;

    fn random_action<G: Rng + ?Sized>(&self, rng: &mut G) -> Action {
        Action::ALL.choose(rng).copied().unwrap_or(Action::Up)
    }

    fn is_active(&self) -> bool {
        self.phase == Phase::Running
    }

    fn step(&mut self, action: Action) -> Result<Step<Observation>> {
        GridWorld::step(self, action)
    }

    fn reset(&mut self) -> Observation {
        GridWorld::reset(self)
    }
}

impl<R: Rng> GridEnvironment for GridWorld<R> {
    fn grid_size(&self) -> usize {
        self.size()
    }

    fn layout(&self) -> ObservationLayout {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn world(variant: Variant, seed: u64) -> GridWorld<StdRng> {
        GridWorld::from_variant(variant, StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn reset_places_three_distinct_free_cells() {
        for &variant in Variant::VARIANTS {
            let mut env = world(variant, 3);
            for _ in 0..500 {
                env.reset();
                let (m, c, z) = (env.mouse(), env.cat(), env.cheese());
                assert!(m != c && c != z && m != z);
                for p in [m, c, z] {
                    assert!(p.in_bounds(env.size()));
                    assert!(!env.walls().is_blocked(p), "{variant} placed on {p}");
                }
                assert_eq!(env.phase(), Phase::Running);
                assert!(env.visited().is_empty());
            }
        }
    }

    #[test]
    fn observation_order_follows_variant() {
        let mut env = world(Variant::Empty, 0);
        let obs = env
            .place(Pos::new(0, 1), Pos::new(2, 3), Pos::new(4, 0))
            .unwrap();
        assert_eq!(obs, [0, 1, 4, 0, 2, 3]);

        let mut env = world(Variant::Obstacles, 0);
        let obs = env
            .place(Pos::new(0, 1), Pos::new(2, 3), Pos::new(4, 0))
            .unwrap();
        assert_eq!(obs, [0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn step_requires_running_episode() {
        let mut env = world(Variant::Empty, 0);
        assert!(matches!(env.step(Action::Up), Err(Error::EpisodeNotRunning)));

        env.place(Pos::new(0, 0), Pos::new(4, 4), Pos::new(0, 1))
            .unwrap();
        let step = env.step(Action::Right).unwrap();
        assert_eq!(step.outcome, Some(Outcome::ReachedCheese));
        assert_eq!(env.phase(), Phase::Terminated(Outcome::ReachedCheese));
        assert!(matches!(env.step(Action::Up), Err(Error::EpisodeNotRunning)));
    }

    #[test]
    fn placement_is_validated() {
        let mut env = world(Variant::Obstacles, 0);
        assert!(matches!(
            env.place(Pos::new(1, 1), Pos::new(0, 0), Pos::new(9, 9)),
            Err(Error::InvalidPlacement { .. })
        ));
        assert!(matches!(
            env.place(Pos::new(0, 0), Pos::new(0, 0), Pos::new(9, 9)),
            Err(Error::InvalidPlacement { .. })
        ));
        assert!(matches!(
            env.place(Pos::new(0, 10), Pos::new(0, 0), Pos::new(9, 9)),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(env.phase(), Phase::Init);
    }

    #[test]
    fn positions_stay_in_bounds() {
        for &variant in Variant::VARIANTS {
            let mut env = world(variant, 11);
            let mut rng = StdRng::seed_from_u64(12);
            for _ in 0..200 {
                env.reset();
                while env.is_active() {
                    let action = env.random_action(&mut rng);
                    env.step(action).unwrap();
                    for p in [env.mouse(), env.cat(), env.cheese()] {
                        assert!(p.in_bounds(env.size()));
                        assert!(!env.walls().is_blocked(p));
                    }
                }
            }
        }
    }

    #[test]
    fn idle_and_revisit_penalties() {
        let mut env = world(Variant::Empty, 5);
        env.place(Pos::new(0, 0), Pos::new(2, 2), Pos::new(4, 4))
            .unwrap();

        let step = env.step(Action::Up).unwrap();
        assert_eq!(env.mouse(), Pos::new(0, 0));
        assert_eq!(step.outcome, None);
        assert_eq!(step.reward, -0.1 + 0.0 + 0.0 + -0.3);

        let step = env.step(Action::Left).unwrap();
        assert_eq!(step.outcome, None);
        assert_eq!(step.reward, -0.1 + 0.0 + -0.5 + -0.3);
    }

    #[test]
    fn directional_wall_stops_mouse() {
        let mut env = world(Variant::Bordered, 0);
        env.place(Pos::new(0, 0), Pos::new(4, 4), Pos::new(4, 0))
            .unwrap();
        env.step(Action::Right).unwrap();
        assert_eq!(env.mouse(), Pos::new(0, 0));
        env.step(Action::Down).unwrap();
        assert_eq!(env.mouse(), Pos::new(1, 0));
    }

    #[test]
    fn blocked_cell_stops_mouse() {
        let mut env = world(Variant::Obstacles, 0);
        env.place(Pos::new(0, 1), Pos::new(9, 9), Pos::new(0, 5))
            .unwrap();
        let step = env.step(Action::Down).unwrap();
        assert_eq!(env.mouse(), Pos::new(0, 1));
        // no progress toward the cheese, the cat closed in, and the mouse sat still
        assert_eq!(step.reward, -0.1 - 2.0 - 5.0 - 10.0);
    }

    #[test]
    fn capture_by_swap_with_boxed_in_cat() {
        let walls =
            BlockedCells::new(5, [Pos::new(1, 3), Pos::new(3, 3), Pos::new(2, 4)]).unwrap();
        let config =
            WorldConfig::new(walls, ObservationLayout::MouseCatCheese, Shaping::Banded).unwrap();
        let mut env = GridWorld::new(config, StdRng::seed_from_u64(0));
        env.place(Pos::new(2, 2), Pos::new(2, 3), Pos::new(0, 0))
            .unwrap();

        let step = env.step(Action::Right).unwrap();
        assert_eq!(env.mouse(), Pos::new(2, 3));
        assert_eq!(env.cat(), Pos::new(2, 2));
        assert_eq!(step.outcome, Some(Outcome::Captured));
        assert_eq!(step.reward, -100.0);
    }

    #[test]
    fn capture_by_swap_with_seeded_cat() {
        let mut swaps = 0;
        for seed in 0..64 {
            let mut env = world(Variant::Empty, seed);
            env.place(Pos::new(2, 2), Pos::new(2, 3), Pos::new(0, 0))
                .unwrap();
            let step = env.step(Action::Right).unwrap();
            assert_eq!(env.mouse(), Pos::new(2, 3));
            if env.cat() == Pos::new(2, 2) {
                swaps += 1;
                assert_eq!(step.outcome, Some(Outcome::Captured));
                assert_eq!(step.reward, -30.0);
            } else {
                assert_eq!(step.outcome, None);
            }
        }
        assert!(swaps > 0, "some seed makes the cat step left");
    }

    #[test]
    fn capture_by_landing_on_mouse() {
        let walls = BlockedCells::new(3, [Pos::new(0, 1), Pos::new(2, 1)]).unwrap();
        let config = WorldConfig::new(
            walls,
            ObservationLayout::MouseCheeseCat,
            Shaping::Proportional(Proximity::Penalty),
        )
        .unwrap();
        let mut env = GridWorld::new(config, StdRng::seed_from_u64(9));
        // the cat in the corner can only step down, onto the idle mouse
        env.place(Pos::new(1, 0), Pos::new(0, 0), Pos::new(2, 2))
            .unwrap();
        let step = env.step(Action::Left).unwrap();
        assert_eq!(env.cat(), Pos::new(1, 0));
        assert_eq!(step.outcome, Some(Outcome::Captured));
        assert_eq!(step.reward, -30.0);
    }

    #[test]
    fn reaching_cheese_on_obstacle_course() {
        let mut env = world(Variant::Obstacles, 21);
        env.place(Pos::new(0, 0), Pos::new(9, 9), Pos::new(0, 2))
            .unwrap();

        let step = env.step(Action::Right).unwrap();
        assert_eq!(step.outcome, None);
        // closer to cheese, the cornered cat can only come closer
        assert_eq!(step.reward, -0.1 + 10.0 - 5.0);

        let step = env.step(Action::Right).unwrap();
        assert_eq!(env.mouse(), Pos::new(0, 2));
        assert!(step.terminated());
        assert_eq!(step.outcome, Some(Outcome::ReachedCheese));
        assert_eq!(step.reward, 120.0);
    }

    #[test]
    fn seeded_resets_repeat() {
        let mut a = world(Variant::Bordered, 77);
        let mut b = world(Variant::Bordered, 77);
        for _ in 0..20 {
            assert_eq!(a.reset(), b.reset());
        }
    }

    #[test]
    fn random_action_covers_every_direction() {
        let env = world(Variant::Empty, 0);
        let mut rng = StdRng::seed_from_u64(8);
        let drawn = (0..200)
            .map(|_| env.random_action(&mut rng))
            .collect::<HashSet<_>>();
        assert_eq!(drawn.len(), Action::COUNT);
    }

    #[test]
    fn variant_names_parse() {
        assert_eq!("obstacles".parse::<Variant>().unwrap(), Variant::Obstacles);
        assert_eq!(Variant::Bordered.to_string(), "bordered");
        assert!("maze".parse::<Variant>().is_err());
    }
}
