//! A* search over a quantized plane
//!
//! Start and goal are snapped to the nearest grid corner, then the search walks
//! cell indices (8-connected, one step per move, diagonals cost the same as
//! orthogonal moves). Scores live in maps keyed through the spatial codec; no
//! grid is allocated. Expansion count is the only bound on work: when it runs out
//! the caller gets the straight two-point route back, flagged as a fallback.

use crate::codec::{self, SpatialKey};
use crate::collider::Collider;
use crate::config::RouterConfig;
use crate::error::RouteError;
use crate::heap::ScoredHeap;
use crate::simplify::simplify;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trellis_core::Point;

/// Default expansion budget.
pub const DEFAULT_SEARCH_LIMIT: usize = 7000;

/// Overestimate applied to the squared-distance heuristic. Makes the search
/// greedier: faster, with slightly longer paths.
pub const HEURISTIC_WEIGHT: f64 = 1.2;

const NEIGHBOURS: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Grid cell dimensions in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl CellSize {
    pub const fn new(width: f64, height: f64) -> Self {
        CellSize { width, height }
    }

    pub fn validate(&self) -> Result<(), RouteError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(RouteError::InvalidCellSize {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Nearest grid corner, as cell indices.
    fn quantize(&self, p: Point) -> (i64, i64) {
        ((p.x / self.width).round() as i64, (p.y / self.height).round() as i64)
    }

    fn to_world(&self, (ix, iy): (i64, i64)) -> Point {
        Point::new(ix as f64 * self.width, iy as f64 * self.height)
    }

    fn step(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// Parameters of a single search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub cell: CellSize,
    pub search_limit: usize,
    pub heuristic_weight: f64,
}

impl SearchOptions {
    pub fn new(cell: CellSize) -> Self {
        SearchOptions {
            cell,
            search_limit: DEFAULT_SEARCH_LIMIT,
            heuristic_weight: HEURISTIC_WEIGHT,
        }
    }

    pub fn with_search_limit(mut self, search_limit: usize) -> Self {
        self.search_limit = search_limit;
        self
    }
}

impl From<&RouterConfig> for SearchOptions {
    fn from(config: &RouterConfig) -> Self {
        SearchOptions {
            cell: config.cell(),
            search_limit: config.search_limit,
            heuristic_weight: config.heuristic_weight,
        }
    }
}

/// How a route was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOutcome {
    /// Start and goal snap to the same grid corner.
    SameCell,
    /// A path around the obstacles was found.
    Found,
    /// Expansion budget ran out. Points are the straight fallback.
    BudgetExhausted,
    /// Frontier emptied before reaching the goal. Points are the straight fallback.
    Unreachable,
    /// An endpoint lies beyond the codec bound. Points are the straight fallback.
    OutOfBounds,
}

/// Result of a search: always a usable polyline from start to goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub points: Vec<Point>,
    pub outcome: RouteOutcome,
    pub expansions: usize,
}

impl Route {
    fn direct(start: Point, goal: Point, outcome: RouteOutcome, expansions: usize) -> Self {
        Route {
            points: vec![start, goal],
            outcome,
            expansions,
        }
    }

    /// True when no route was found and `points` is just `[start, goal]`.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self.outcome,
            RouteOutcome::BudgetExhausted | RouteOutcome::Unreachable | RouteOutcome::OutOfBounds
        )
    }
}

/// Find a polyline from `start` to `goal` that avoids cells `collider` blocks.
///
/// The returned endpoints are exactly `start` and `goal`; interior points sit on
/// the grid. The goal cell itself is never tested against the collider, so
/// routing into a node that is part of the obstacle set still works.
pub fn find_path<C>(
    start: Point,
    goal: Point,
    collider: &C,
    options: &SearchOptions,
) -> Result<Route, RouteError>
where
    C: Collider + ?Sized,
{
    options.cell.validate()?;
    if options.search_limit == 0 {
        return Err(RouteError::ZeroSearchLimit);
    }
    for p in [start, goal] {
        if !p.is_finite() {
            return Err(RouteError::NonFiniteEndpoint(p));
        }
    }

    let cell = options.cell;
    let start_cell = cell.quantize(start);
    let goal_cell = cell.quantize(goal);
    if start_cell == goal_cell {
        return Ok(Route::direct(start, goal, RouteOutcome::SameCell, 0));
    }

    let (Some(start_key), Some(_)) = (
        codec::encode(start_cell.0, start_cell.1),
        codec::encode(goal_cell.0, goal_cell.1),
    ) else {
        tracing::debug!("Route endpoints {:?} -> {:?} beyond codec bound", start, goal);
        return Ok(Route::direct(start, goal, RouteOutcome::OutOfBounds, 0));
    };

    let goal_world = cell.to_world(goal_cell);
    let heuristic =
        |c: (i64, i64)| cell.to_world(c).distance_squared(goal_world) * options.heuristic_weight;
    let step = cell.step();

    let mut g_score: HashMap<SpatialKey, f64> = HashMap::new();
    let mut f_score: HashMap<SpatialKey, f64> = HashMap::new();
    let mut came_from: HashMap<SpatialKey, SpatialKey> = HashMap::new();
    let mut open: ScoredHeap<SpatialKey> = ScoredHeap::with_capacity(256);

    g_score.insert(start_key, 0.0);
    f_score.insert(start_key, heuristic(start_cell));
    open.push(start_key, |k| score(&f_score, k));

    let mut expansions = 0;
    let mut outcome = RouteOutcome::Unreachable;

    while let Some(current) = open.pop(|k| score(&f_score, k)) {
        if expansions >= options.search_limit {
            outcome = RouteOutcome::BudgetExhausted;
            break;
        }
        expansions += 1;

        let (cx, cy) = codec::decode(current);
        let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);

        for (dx, dy) in NEIGHBOURS {
            let neighbour = (cx + dx, cy + dy);
            let Some(key) = codec::encode(neighbour.0, neighbour.1) else {
                continue;
            };

            if neighbour == goal_cell {
                let points = reconstruct(&came_from, current, start, goal, cell);
                tracing::trace!("Route found after {} expansions", expansions);
                return Ok(Route {
                    points,
                    outcome: RouteOutcome::Found,
                    expansions,
                });
            }

            if collider.is_blocked(cell.to_world(neighbour)) {
                continue;
            }

            let tentative = current_g + step;
            if tentative < g_score.get(&key).copied().unwrap_or(f64::INFINITY) {
                came_from.insert(key, current);
                g_score.insert(key, tentative);
                f_score.insert(key, tentative + heuristic(neighbour));
                if !open.contains(&key) {
                    open.push(key, |k| score(&f_score, k));
                }
            }
        }
    }

    tracing::debug!(
        "No route {:?} -> {:?} ({:?} after {} expansions), using straight line",
        start,
        goal,
        outcome,
        expansions
    );
    Ok(Route::direct(start, goal, outcome, expansions))
}

/// [`find_path`] followed by [`simplify`] with the configured tolerance.
pub fn find_simplified_path<C>(
    start: Point,
    goal: Point,
    collider: &C,
    config: &RouterConfig,
) -> Result<Route, RouteError>
where
    C: Collider + ?Sized,
{
    let mut route = find_path(start, goal, collider, &SearchOptions::from(config))?;
    route.points = simplify(&route.points, config.tolerance);
    Ok(route)
}

fn score(table: &HashMap<SpatialKey, f64>, key: &SpatialKey) -> f64 {
    table.get(key).copied().unwrap_or(f64::INFINITY)
}

fn reconstruct(
    came_from: &HashMap<SpatialKey, SpatialKey>,
    last: SpatialKey,
    start: Point,
    goal: Point,
    cell: CellSize,
) -> Vec<Point> {
    // goal first, walking back to start, then flipped
    let mut points = vec![goal];
    let mut cursor = last;
    points.push(cell.to_world(codec::decode(cursor)));
    while let Some(&previous) = came_from.get(&cursor) {
        points.push(cell.to_world(codec::decode(previous)));
        cursor = previous;
    }
    points.push(start);
    points.reverse();
    // a grid-aligned start coincides with its own cell corner
    points.dedup();
    points
}
