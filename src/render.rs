use std::fmt;

use crate::gym::{Action, Pos, WallModel};

/// Everything a renderer needs to draw one tick, detached from the world it was taken from
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub size: usize,
    pub mouse: Pos,
    pub cat: Pos,
    pub cheese: Pos,
    /// Per cell, row major: whether it is blocked, and its walls in [`Action`] index order
    cells: Vec<(bool, [bool; Action::COUNT])>,
}

impl Snapshot {
    pub fn capture(walls: &dyn WallModel, mouse: Pos, cat: Pos, cheese: Pos) -> Self {
        let size = walls.size();
        let cells = (0..size)
            .flat_map(|row| (0..size).map(move |col| Pos::new(row, col)))
            .map(|pos| {
                let sides = Action::ALL.map(|side| walls.has_wall(pos, side));
                (walls.is_blocked(pos), sides)
            })
            .collect();
        Self {
            size,
            mouse,
            cat,
            cheese,
            cells,
        }
    }

    pub fn is_blocked(&self, pos: Pos) -> bool {
        self.cell(pos).0
    }

    pub fn has_wall(&self, pos: Pos, side: Action) -> bool {
        self.cell(pos).1[side.index()]
    }

    fn cell(&self, pos: Pos) -> (bool, [bool; Action::COUNT]) {
        self.cells[pos.row * self.size + pos.col]
    }

    /// Glyph for a cell: `M` mouse, `C` cat, `X` capture, `*` cheese, `#` blocked, `.` empty
    pub fn glyph(&self, pos: Pos) -> char {
        match pos {
            p if p == self.mouse && p == self.cat => 'X',
            p if p == self.mouse => 'M',
            p if p == self.cat => 'C',
            p if p == self.cheese => '*',
            p if self.is_blocked(p) => '#',
            _ => '.',
        }
    }

    /// Wall between `pos` and its neighbor on `side`, declared from either cell
    fn wall_between(&self, pos: Pos, side: Action) -> bool {
        self.has_wall(pos, side)
            || pos
                .step(side, self.size)
                .is_some_and(|n| self.has_wall(n, side.opposite()))
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = 4 * self.size - 1;
        let border = format!("+{}+", "-".repeat(width));
        writeln!(f, "{border}")?;
        for row in 0..self.size {
            write!(f, "|")?;
            for col in 0..self.size {
                let pos = Pos::new(row, col);
                write!(f, " {} ", self.glyph(pos))?;
                if col + 1 < self.size {
                    let sep = if self.wall_between(pos, Action::Right) {
                        '|'
                    } else {
                        ' '
                    };
                    write!(f, "{sep}")?;
                }
            }
            writeln!(f, "|")?;

            if row + 1 < self.size {
                let below = (0..self.size)
                    .map(|col| {
                        if self.wall_between(Pos::new(row, col), Action::Down) {
                            "---"
                        } else {
                            "   "
                        }
                    })
                    .collect::<Vec<_>>();
                if below.iter().any(|s| *s != "   ") {
                    writeln!(f, "|{}|", below.join(" "))?;
                }
            }
        }
        write!(f, "{border}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gym::{BlockedCells, DirectionalWalls, Open};

    #[test]
    fn open_grid_frame() {
        let walls = Open::new(3).unwrap();
        let snap = Snapshot::capture(&walls, Pos::new(0, 0), Pos::new(2, 2), Pos::new(1, 1));
        let expected = "\
+-----------+
| M   .   . |
| .   *   . |
| .   .   C |
+-----------+";
        assert_eq!(snap.to_string(), expected);
    }

    #[test]
    fn walls_and_blocks_are_drawn() {
        let walls = DirectionalWalls::one_sided(2, &[(Pos::new(0, 0), Action::Right)]).unwrap();
        let snap = Snapshot::capture(&walls, Pos::new(0, 0), Pos::new(1, 0), Pos::new(1, 1));
        assert_eq!(snap.to_string(), "+-------+\n| M | . |\n| C   * |\n+-------+");

        let walls = DirectionalWalls::one_sided(2, &[(Pos::new(1, 1), Action::Up)]).unwrap();
        let snap = Snapshot::capture(&walls, Pos::new(0, 0), Pos::new(1, 0), Pos::new(1, 1));
        assert_eq!(
            snap.to_string(),
            "+-------+\n| M   . |\n|    ---|\n| C   * |\n+-------+"
        );

        let walls = BlockedCells::new(2, [Pos::new(0, 1)]).unwrap();
        let snap = Snapshot::capture(&walls, Pos::new(1, 1), Pos::new(1, 1), Pos::new(0, 0));
        assert!(snap.is_blocked(Pos::new(0, 1)));
        assert_eq!(snap.glyph(Pos::new(0, 1)), '#');
        assert_eq!(snap.glyph(Pos::new(1, 1)), 'X');
    }
}
