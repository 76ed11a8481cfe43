use std::collections::HashSet;

use strum::VariantArray;

use super::{Action, Pos};
use crate::{Error, Result};

/// Decides which single-cell moves are legal on a grid
///
/// Implementations own the grid size, so `can_move` is false for any move that would leave the grid.
pub trait WallModel {
    /// Side length of the square grid
    fn size(&self) -> usize;

    /// Whether an entity standing on `pos` may move one cell in direction `action`
    fn can_move(&self, pos: Pos, action: Action) -> bool;

    /// Whether `pos` can never be occupied
    fn is_blocked(&self, _pos: Pos) -> bool {
        false
    }

    /// Whether `pos` carries a wall on its `side`
    fn has_wall(&self, _pos: Pos, _side: Action) -> bool {
        false
    }
}

fn check_size(size: usize, unavailable: usize) -> Result<()> {
    if size < 2 {
        return Err(Error::InvalidGridSize {
            size,
            reason: "must be at least 2",
        });
    }
    if size * size < unavailable + 3 {
        return Err(Error::InvalidGridSize {
            size,
            reason: "fewer than three free cells",
        });
    }
    Ok(())
}

/// No walls at all, only the grid edge stops movement
#[derive(Debug, Clone)]
pub struct Open {
    size: usize,
}

impl Open {
    pub fn new(size: usize) -> Result<Self> {
        check_size(size, 0)?;
        Ok(Self { size })
    }
}

impl WallModel for Open {
    fn size(&self) -> usize {
        self.size
    }

    fn can_move(&self, pos: Pos, action: Action) -> bool {
        pos.step(action, self.size).is_some()
    }
}

/// Per-cell walls on any of the four sides
///
/// A wall only stops movement out of the cell that carries it.
#[derive(Debug, Clone)]
pub struct DirectionalWalls {
    size: usize,
    cells: Vec<[bool; Action::COUNT]>,
}

impl DirectionalWalls {
    /// Build from a list of `(cell, side)` walls, requiring every wall between two cells to be
    /// declared from both sides
    pub fn new(size: usize, walls: &[(Pos, Action)]) -> Result<Self> {
        let layout = Self::one_sided(size, walls)?;
        for &(pos, side) in walls {
            if let Some(neighbor) = pos.step(side, size) {
                if !layout.has_wall(neighbor, side.opposite()) {
                    return Err(Error::AsymmetricWall {
                        pos,
                        side,
                        neighbor,
                    });
                }
            }
        }
        Ok(layout)
    }

    /// Build from a list of `(cell, side)` walls without checking that walls are mirrored
    pub fn one_sided(size: usize, walls: &[(Pos, Action)]) -> Result<Self> {
        check_size(size, 0)?;
        let mut cells = vec![[false; Action::COUNT]; size * size];
        for &(pos, side) in walls {
            if !pos.in_bounds(size) {
                return Err(Error::OutOfBounds {
                    what: "wall",
                    pos,
                    size,
                });
            }
            cells[pos.row * size + pos.col][side.index()] = true;
        }
        Ok(Self { size, cells })
    }

    /// The 5x5 maze used by [`Variant::Bordered`](super::Variant::Bordered)
    pub fn bordered() -> Result<Self> {
        use Action::*;
        let walls = [
            ((0, 0), Right),
            ((0, 1), Left),
            ((0, 2), Down),
            ((1, 2), Up),
            ((1, 0), Down),
            ((2, 0), Up),
            ((1, 1), Down),
            ((2, 1), Up),
            ((2, 1), Right),
            ((2, 2), Left),
            ((2, 2), Right),
            ((2, 3), Left),
            ((2, 3), Up),
            ((1, 3), Down),
            ((3, 0), Right),
            ((3, 1), Left),
            ((3, 1), Down),
            ((4, 1), Up),
            ((3, 3), Down),
            ((3, 4), Down),
            ((4, 3), Up),
            ((4, 4), Up),
        ]
        .map(|(pos, side)| (Pos::from(pos), side));
        Self::new(5, &walls)
    }

    /// Walls of `pos` in [`Action`] index order
    pub fn walls_of(&self, pos: Pos) -> [bool; Action::COUNT] {
        if pos.in_bounds(self.size) {
            self.cells[pos.row * self.size + pos.col]
        } else {
            [false; Action::COUNT]
        }
    }
}

impl WallModel for DirectionalWalls {
    fn size(&self) -> usize {
        self.size
    }

    fn can_move(&self, pos: Pos, action: Action) -> bool {
        !self.has_wall(pos, action) && pos.step(action, self.size).is_some()
    }

    fn has_wall(&self, pos: Pos, side: Action) -> bool {
        self.walls_of(pos)[side.index()]
    }
}

/// A fixed set of cells nothing may enter
#[derive(Debug, Clone)]
pub struct BlockedCells {
    size: usize,
    blocked: HashSet<Pos>,
}

impl BlockedCells {
    pub fn new(size: usize, cells: impl IntoIterator<Item = Pos>) -> Result<Self> {
        let blocked = cells.into_iter().collect::<HashSet<_>>();
        if let Some(&pos) = blocked.iter().find(|p| !p.in_bounds(size)) {
            return Err(Error::OutOfBounds {
                what: "blocked cell",
                pos,
                size,
            });
        }
        check_size(size, blocked.len())?;
        Ok(Self { size, blocked })
    }

    /// The 10x10 obstacle course used by [`Variant::Obstacles`](super::Variant::Obstacles)
    pub fn obstacles() -> Result<Self> {
        let cells = [
            (1, 1),
            (2, 2),
            (1, 4),
            (1, 5),
            (2, 7),
            (1, 8),
            (4, 3),
            (5, 3),
            (4, 6),
            (5, 6),
            (7, 2),
            (8, 1),
            (8, 4),
            (8, 5),
            (7, 7),
            (8, 8),
        ];
        Self::new(10, cells.map(Pos::from))
    }
}

impl WallModel for BlockedCells {
    fn size(&self) -> usize {
        self.size
    }

    fn can_move(&self, pos: Pos, action: Action) -> bool {
        pos.step(action, self.size)
            .is_some_and(|next| !self.blocked.contains(&next))
    }

    fn is_blocked(&self, pos: Pos) -> bool {
        self.blocked.contains(&pos)
    }
}

/// Directions an entity on `pos` may currently take, in [`Action`] index order
pub fn legal_moves(walls: &dyn WallModel, pos: Pos) -> Vec<Action> {
    Action::VARIANTS
        .iter()
        .copied()
        .filter(|&a| walls.can_move(pos, a))
        .collect()
}
