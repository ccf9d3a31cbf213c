//! Spatial key codec: one integer per lattice point
//!
//! `key = (x + S) * P + (y + S)` with `S` = [`COORD_BOUND`] and `P` = [`KEY_PRIME`].
//! Because `P > 2S` the mapping is a bijection on `|x|, |y| < S`, so a single
//! `HashMap<SpatialKey, _>` serves as visited set and score table.
//!
//! The router feeds grid-cell indices through here, not world coordinates, so the
//! bound is counted in cells. Points outside the bound are refused rather than
//! aliased onto some other cell.

use trellis_core::Point;

/// Exclusive bound on `|x|` and `|y|`.
pub const COORD_BOUND: i64 = 1 << 24;

/// Smallest prime above 2^32; comfortably larger than `2 * COORD_BOUND`.
pub const KEY_PRIME: i64 = 4_294_967_311;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpatialKey(i64);

impl SpatialKey {
    pub fn raw(self) -> i64 {
        self.0
    }
}

fn in_bounds(v: i64) -> bool {
    v > -COORD_BOUND && v < COORD_BOUND
}

/// Encode a lattice point. `None` when either coordinate is out of bounds.
pub fn encode(x: i64, y: i64) -> Option<SpatialKey> {
    if !in_bounds(x) || !in_bounds(y) {
        return None;
    }
    Some(SpatialKey((x + COORD_BOUND) * KEY_PRIME + (y + COORD_BOUND)))
}

/// Inverse of [`encode`].
pub fn decode(key: SpatialKey) -> (i64, i64) {
    let y = key.0.rem_euclid(KEY_PRIME) - COORD_BOUND;
    let x = (key.0 - (y + COORD_BOUND)) / KEY_PRIME - COORD_BOUND;
    (x, y)
}

/// Encode a point after rounding each axis to the nearest integer.
pub fn encode_point(point: Point) -> Option<SpatialKey> {
    if !point.is_finite() {
        return None;
    }
    encode(point.x.round() as i64, point.y.round() as i64)
}

pub fn decode_point(key: SpatialKey) -> Point {
    let (x, y) = decode(key);
    Point::new(x as f64, y as f64)
}
