use rand::{seq::SliceRandom, Rng};

use super::{walls::legal_moves, Action, Pos, WallModel};

/// The cat: a uniformly random walker over whatever moves are currently legal
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAdversary;

impl RandomAdversary {
    /// Pick the cat's move, or `None` if it is boxed in and must stay put
    pub fn choose<R: Rng + ?Sized>(
        &self,
        walls: &dyn WallModel,
        pos: Pos,
        rng: &mut R,
    ) -> Option<Action> {
        legal_moves(walls, pos).choose(rng).copied()
    }
}
