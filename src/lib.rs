/// Q-learning trainer and greedy evaluator
pub mod algo;

/// Implementations of strategies for per-episode decaying hyperparameters
pub mod decay;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// The cat, mouse, and cheese gridworld
pub mod gym;

/// Recorded transitions
pub mod memory;

/// Text rendering of world snapshots
pub mod render;

/// Learning curve export
pub mod report;

/// Terminal visualization
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use error::{Error, Result};
