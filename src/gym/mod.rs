mod adversary;
mod cat_mouse_cheese;
mod grid;
pub mod shaping;
mod walls;

pub use adversary::RandomAdversary;
pub use cat_mouse_cheese::{GridWorld, Phase, Variant, WorldConfig};
pub use grid::{Action, Observation, ObservationLayout, Pos};
pub use shaping::{Proximity, Shaping};
pub use walls::{legal_moves, BlockedCells, DirectionalWalls, Open, WallModel};
