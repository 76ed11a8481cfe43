use std::path::PathBuf;

use thiserror::Error;

use crate::gym::{Action, ObservationLayout, Pos};

/// Errors produced while building worlds, running episodes, or moving Q-tables on and off disk
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid grid size {size}: {reason}")]
    InvalidGridSize { size: usize, reason: &'static str },

    #[error("{what} at {pos} lies outside a {size}x{size} grid")]
    OutOfBounds {
        what: &'static str,
        pos: Pos,
        size: usize,
    },

    #[error("Wall on the {side:?} side of {pos} has no matching wall on {neighbor}")]
    AsymmetricWall {
        pos: Pos,
        side: Action,
        neighbor: Pos,
    },

    #[error("Invalid action {0}: must be in 0..4")]
    InvalidAction(usize),

    #[error("Invalid placement: {message}")]
    InvalidPlacement { message: String },

    #[error("Episode is not running, call `reset` first")]
    EpisodeNotRunning,

    #[error("Invalid value for `{name}`: {message}")]
    InvalidHyperparameter { name: &'static str, message: String },

    #[error(
        "Q-table mismatch: expected grid {expected_size} with layout {expected_layout:?}, \
         found grid {found_size} with layout {found_layout:?} ({found_len} values)"
    )]
    TableMismatch {
        expected_size: usize,
        expected_layout: ObservationLayout,
        found_size: usize,
        found_layout: ObservationLayout,
        found_len: usize,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[cfg(feature = "viz")]
    #[error("Terminal error: {0}")]
    Terminal(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// Create an invalid placement error
    pub fn placement(message: impl Into<String>) -> Self {
        Self::InvalidPlacement {
            message: message.into(),
        }
    }

    /// Create an invalid hyperparameter error
    pub fn hyperparameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidHyperparameter {
            name,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
