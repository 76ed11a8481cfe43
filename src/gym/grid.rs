use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{FromRepr, VariantArray};

use crate::Error;

/// A cell on the grid, `(row, col)` with row 0 at the top
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two cells
    pub fn manhattan(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn in_bounds(self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// The neighboring cell in direction `action`, or `None` if it would leave a `size` grid
    pub fn step(self, action: Action, size: usize) -> Option<Pos> {
        let Pos { row, col } = self;
        let next = match action {
            Action::Up => Pos::new(row.checked_sub(1)?, col),
            Action::Down => Pos::new(row + 1, col),
            Action::Left => Pos::new(row, col.checked_sub(1)?),
            Action::Right => Pos::new(row, col + 1),
        };
        next.in_bounds(size).then_some(next)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four unit moves
///
/// The discriminants are the action indices used by the Q-table.
#[derive(VariantArray, FromRepr, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    pub const COUNT: usize = 4;
    pub const ALL: [Action; Action::COUNT] =
        [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing back the way this one came
    pub fn opposite(self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Action::from_repr(value).ok_or(Error::InvalidAction(value))
    }
}

/// The six coordinates handed to the agent, in the order given by the world's [`ObservationLayout`]
pub type Observation = [usize; 6];

/// Field order of an [`Observation`]
///
/// Tables trained under one layout are not valid under the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationLayout {
    /// `[mouse_row, mouse_col, cheese_row, cheese_col, cat_row, cat_col]`
    MouseCheeseCat,
    /// `[mouse_row, mouse_col, cat_row, cat_col, cheese_row, cheese_col]`
    MouseCatCheese,
}

impl ObservationLayout {
    pub fn encode(self, mouse: Pos, cat: Pos, cheese: Pos) -> Observation {
        match self {
            ObservationLayout::MouseCheeseCat => {
                [mouse.row, mouse.col, cheese.row, cheese.col, cat.row, cat.col]
            }
            ObservationLayout::MouseCatCheese => {
                [mouse.row, mouse.col, cat.row, cat.col, cheese.row, cheese.col]
            }
        }
    }

    /// Recover `(mouse, cat, cheese)` from an observation
    pub fn decode(self, obs: &Observation) -> (Pos, Pos, Pos) {
        let mouse = Pos::new(obs[0], obs[1]);
        let a = Pos::new(obs[2], obs[3]);
        let b = Pos::new(obs[4], obs[5]);
        match self {
            ObservationLayout::MouseCheeseCat => (mouse, b, a),
            ObservationLayout::MouseCatCheese => (mouse, a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_on_grid() {
        let corner = Pos::new(0, 0);
        assert_eq!(corner.step(Action::Up, 5), None);
        assert_eq!(corner.step(Action::Left, 5), None);
        assert_eq!(corner.step(Action::Down, 5), Some(Pos::new(1, 0)));
        assert_eq!(corner.step(Action::Right, 5), Some(Pos::new(0, 1)));
        assert_eq!(Pos::new(4, 4).step(Action::Down, 5), None);
        assert_eq!(Pos::new(4, 4).step(Action::Right, 5), None);
    }

    #[test]
    fn manhattan_distance() {
        let a = Pos::new(1, 4);
        let b = Pos::new(3, 0);
        let c = Pos::new(2, 2);
        assert_eq!(a.manhattan(b), 6);
        assert_eq!(a.manhattan(b), b.manhattan(a));
        assert_eq!(a.manhattan(a), 0);
        assert!(a.manhattan(b) <= a.manhattan(c) + c.manhattan(b));
    }

    #[test]
    fn action_from_index() {
        assert_eq!(Action::try_from(0).unwrap(), Action::Up);
        assert_eq!(Action::try_from(3).unwrap(), Action::Right);
        assert!(matches!(Action::try_from(4), Err(Error::InvalidAction(4))));
        for &a in Action::VARIANTS {
            assert_eq!(a.opposite().opposite(), a);
        }
    }

    #[test]
    fn layouts_disagree_on_field_order() {
        let (mouse, cat, cheese) = (Pos::new(0, 1), Pos::new(2, 3), Pos::new(4, 0));
        let mcc = ObservationLayout::MouseCheeseCat.encode(mouse, cat, cheese);
        let mct = ObservationLayout::MouseCatCheese.encode(mouse, cat, cheese);
        assert_eq!(mcc, [0, 1, 4, 0, 2, 3]);
        assert_eq!(mct, [0, 1, 2, 3, 4, 0]);
        assert_eq!(
            ObservationLayout::MouseCheeseCat.decode(&mcc),
            (mouse, cat, cheese)
        );
        assert_eq!(
            ObservationLayout::MouseCatCheese.decode(&mct),
            (mouse, cat, cheese)
        );
    }
}
