//! Router input errors

use thiserror::Error;
use trellis_core::Point;

/// Rejected router input. Degenerate geometry (coincident endpoints, a fully
/// blocked plane) is never an error; see [`crate::RouteOutcome`] instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("grid cell size must be positive and finite, got {width}x{height}")]
    InvalidCellSize { width: f64, height: f64 },
    #[error("route endpoint {0:?} is not finite")]
    NonFiniteEndpoint(Point),
    #[error("search limit must be at least 1")]
    ZeroSearchLimit,
}
