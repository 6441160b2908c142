// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Axis-aligned bounding regions
//!
//! All containment and intersection tests are inclusive on every edge, so a
//! point on a shared quadrant boundary is contained by both neighbours. The
//! quadtree resolves that ambiguity by first-fit over the fixed quadrant
//! order returned by [`BoundingRegion::subdivide`].

use crate::Vec2;
use serde::{Deserialize, Serialize};

/// Quadrant order produced by [`BoundingRegion::subdivide`]
///
/// ```text
/// +-------+-------+
/// |   2   |   3   |  (top-left, top-right)
/// +-------+-------+
/// |   0   |   1   |  (bottom-left, bottom-right)
/// +-------+-------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// Minimum x, minimum y
    BottomLeft = 0,
    /// Maximum x, minimum y
    BottomRight = 1,
    /// Minimum x, maximum y
    TopLeft = 2,
    /// Maximum x, maximum y
    TopRight = 3,
}

impl Quadrant {
    /// All quadrants in subdivision order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
        Quadrant::TopLeft,
        Quadrant::TopRight,
    ];
}

/// Axis-aligned rectangle given by its minimum and maximum corners
///
/// # Examples
///
/// ```
/// use gravity_engine::tree::BoundingRegion;
/// use gravity_engine::Vec2;
///
/// let region = BoundingRegion::centered(10.0);
/// assert!(region.contains_point(Vec2::new(10.0, -10.0)));
/// assert!(!region.contains_point(Vec2::new(10.5, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    min: Vec2,
    max: Vec2,
}

impl BoundingRegion {
    /// Create a region from its corners
    ///
    /// # Panics
    ///
    /// Panics if `max` is smaller than `min` on either axis.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        assert!(
            max.x >= min.x && max.y >= min.y,
            "Region maximum must not be smaller than its minimum"
        );
        BoundingRegion { min, max }
    }

    /// Square region centered on the origin with the given half side length
    pub fn centered(half_extent: f64) -> Self {
        let half = half_extent.abs();
        BoundingRegion::new(Vec2::new(-half, -half), Vec2::new(half, half))
    }

    /// Minimum corner
    pub fn min(&self) -> Vec2 {
        self.min
    }

    /// Maximum corner
    pub fn max(&self) -> Vec2 {
        self.max
    }

    /// Width and height as a vector
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Extent along x
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along y
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Length of the diagonal, used as the node size in the theta criterion
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive point containment
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.min.x <= point.x
            && self.min.y <= point.y
            && point.x <= self.max.x
            && point.y <= self.max.y
    }

    /// Whether `other` lies entirely inside this region (inclusive)
    pub fn contains_region(&self, other: &BoundingRegion) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Whether the two regions overlap or touch
    pub fn intersects(&self, other: &BoundingRegion) -> bool {
        other.min.x <= self.max.x
            && other.min.y <= self.max.y
            && self.min.x <= other.max.x
            && self.min.y <= other.max.y
    }

    /// Split into four equal quadrants in [`Quadrant::ALL`] order
    ///
    /// The children share the parent's center lines exactly, so they tile
    /// the parent with no gaps even under floating point rounding.
    pub fn subdivide(&self) -> [BoundingRegion; 4] {
        debug_assert!(
            self.width() > 0.0 && self.height() > 0.0,
            "Cannot subdivide a degenerate region"
        );
        Quadrant::ALL.map(|q| self.quadrant(q))
    }

    /// The bounds of a single quadrant
    pub fn quadrant(&self, quadrant: Quadrant) -> BoundingRegion {
        let c = self.center();
        let (min_x, max_x) = match quadrant {
            Quadrant::BottomLeft | Quadrant::TopLeft => (self.min.x, c.x),
            Quadrant::BottomRight | Quadrant::TopRight => (c.x, self.max.x),
        };
        let (min_y, max_y) = match quadrant {
            Quadrant::BottomLeft | Quadrant::BottomRight => (self.min.y, c.y),
            Quadrant::TopLeft | Quadrant::TopRight => (c.y, self.max.y),
        };
        BoundingRegion {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }
}
