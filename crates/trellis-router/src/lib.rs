//! Trellis Router — obstacle-avoiding edge routes on a quantized plane
//!
//! The pieces, leaves first: a spatial key codec, a binary heap ordered by an
//! external score table, the A* search that combines them, and a
//! Ramer–Douglas–Peucker pass to thin out the grid-aligned result.

pub mod astar;
pub mod codec;
pub mod collider;
pub mod config;
pub mod error;
pub mod heap;
pub mod simplify;


pub use astar::{
    find_path, find_simplified_path, CellSize, Route, RouteOutcome, SearchOptions,
    DEFAULT_SEARCH_LIMIT, HEURISTIC_WEIGHT,
};
pub use codec::SpatialKey;
pub use collider::{Collider, RectCollider};
pub use config::RouterConfig;
pub use error::RouteError;
pub use heap::ScoredHeap;
pub use simplify::{simplify, DEFAULT_TOLERANCE};
