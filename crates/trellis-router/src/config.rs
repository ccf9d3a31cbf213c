//! Router tuning knobs

use crate::astar::{CellSize, DEFAULT_SEARCH_LIMIT, HEURISTIC_WEIGHT};
use crate::error::RouteError;
use crate::simplify::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Router configuration, usually read from the `[router]` table of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Grid cell width in canvas units
    pub cell_width: f64,
    /// Grid cell height in canvas units
    pub cell_height: f64,
    /// Maximum node expansions before giving up on a route
    pub search_limit: usize,
    /// Multiplier on the squared-distance heuristic. Above 1.0 trades optimality for speed.
    pub heuristic_weight: f64,
    /// Simplification tolerance applied to found routes
    pub tolerance: f64,
    /// Extra clearance kept around node rectangles
    pub padding: f64,
}

impl RouterConfig {
    pub fn cell(&self) -> CellSize {
        CellSize::new(self.cell_width, self.cell_height)
    }

    /// Reject values the router cannot work with.
    pub fn validate(&self) -> Result<(), RouteError> {
        self.cell().validate()?;
        if self.search_limit == 0 {
            return Err(RouteError::ZeroSearchLimit);
        }
        Ok(())
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cell_width: 10.0,
            cell_height: 10.0,
            search_limit: DEFAULT_SEARCH_LIMIT,
            heuristic_weight: HEURISTIC_WEIGHT,
            tolerance: DEFAULT_TOLERANCE,
            padding: 4.0,
        }
    }
}
