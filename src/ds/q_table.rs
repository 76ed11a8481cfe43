use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    gym::{Action, Observation, ObservationLayout},
    Error, Result,
};

/// A dense table of action values over the full joint state
///
/// Values are stored flat. The entry for observation `[o0, .., o5]` and action `a` on a grid of
/// side `n` lives at
///
/// `((((((o0 * n + o1) * n + o2) * n + o3) * n + o4) * n + o5) * 4 + a`
///
/// with the observation in the world's own [`ObservationLayout`], so the table holds `n^6 * 4`
/// values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    grid_size: usize,
    layout: ObservationLayout,
    values: Vec<f64>,
}

impl QTable {
    /// A zero-initialized table
    ///
    /// **Panics** if `grid_size^6 * 4` overflows `usize`
    pub fn new(grid_size: usize, layout: ObservationLayout) -> Self {
        let Some(len) = Self::len_for(grid_size) else {
            panic!("grid size {grid_size} is too large for a dense table");
        };
        Self {
            grid_size,
            layout,
            values: vec![0.0; len],
        }
    }

    /// Number of values a table over a `grid_size` grid holds, `None` on overflow
    fn len_for(grid_size: usize) -> Option<usize> {
        grid_size
            .checked_pow(6)
            .and_then(|n| n.checked_mul(Action::COUNT))
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn layout(&self) -> ObservationLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flat offset of the first action of `state`
    ///
    /// **Panics** if a coordinate lies off the grid, so a table never reads another state's row
    fn offset(&self, state: &Observation) -> usize {
        let n = self.grid_size;
        assert!(state.iter().all(|&x| x < n), "{state:?} outside grid {n}");
        state.iter().fold(0, |acc, &x| acc * n + x) * Action::COUNT
    }

    /// Values of all four actions in `state`, in [`Action`] index order
    pub fn row(&self, state: &Observation) -> &[f64] {
        let i = self.offset(state);
        &self.values[i..i + Action::COUNT]
    }

    pub fn get(&self, state: &Observation, action: Action) -> f64 {
        self.values[self.offset(state) + action.index()]
    }

    pub fn set(&mut self, state: &Observation, action: Action, value: f64) {
        let i = self.offset(state) + action.index();
        self.values[i] = value;
    }

    /// The highest-valued action, the first one on ties
    pub fn best_action(&self, state: &Observation) -> Action {
        let row = self.row(state);
        let mut best = 0;
        for (i, &v) in row.iter().enumerate().skip(1) {
            if v > row[best] {
                best = i;
            }
        }
        Action::ALL[best]
    }

    pub fn max_value(&self, state: &Observation) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// **Errors** with [`Error::TableMismatch`] unless this table fits a world of `grid_size`
    /// observed through `layout`
    pub fn ensure_matches(&self, grid_size: usize, layout: ObservationLayout) -> Result<()> {
        if self.grid_size != grid_size
            || self.layout != layout
            || Some(self.values.len()) != Self::len_for(grid_size)
        {
            return Err(Error::TableMismatch {
                expected_size: grid_size,
                expected_layout: layout,
                found_size: self.grid_size,
                found_layout: self.layout,
                found_len: self.values.len(),
            });
        }
        Ok(())
    }

    /// Write the table as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(e, path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush().map_err(|e| Error::io(e, path))?;
        debug!("Saved {} Q-values to {}", self.values.len(), path.display());
        Ok(())
    }

    /// Read a table written by [`save`](QTable::save)
    ///
    /// **Errors** if the file cannot be read or parsed, or its value count does not match its
    /// grid size. A missing table is never replaced by a fresh one.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(e, path))?;
        let table: QTable = serde_json::from_reader(BufReader::new(file))?;
        table.ensure_matches(table.grid_size, table.layout)?;
        debug!(
            "Loaded {} Q-values for grid {} from {}",
            table.values.len(),
            table.grid_size,
            path.display()
        );
        Ok(table)
    }
}
