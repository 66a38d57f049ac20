//! Lattice positions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point on the 2D lattice. Renders as `"(x,y)"`, which is also its
/// node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl Position {
    /// Creates the position `(x, y)`.
    #[must_use]
    pub const fn at(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    #[must_use]
    pub const fn distance(&self, other: &Self) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns true if the position lies inside `[0, bound_x) x [0, bound_y)`.
    #[must_use]
    pub const fn within(&self, bound_x: i64, bound_y: i64) -> bool {
        self.x >= 0 && self.x < bound_x && self.y >= 0 && self.y < bound_y
    }

    /// All positions (including `self`) at Manhattan distance at most
    /// `max_distance`, regardless of any grid bounds.
    #[must_use]
    pub fn neighbourhood(&self, max_distance: u64) -> Vec<Self> {
        let reach = i64::try_from(max_distance).unwrap_or(i64::MAX / 4);
        let mut acc = Vec::new();
        for x in (self.x - reach)..=(self.x + reach) {
            for y in (self.y - reach)..=(self.y + reach) {
                let p = Self::at(x, y);
                if self.distance(&p) <= max_distance {
                    acc.push(p);
                }
            }
        }
        acc
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
