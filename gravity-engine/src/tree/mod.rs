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
//! Spatial partitioning for the Barnes-Hut solver
//!
//! This module provides:
//! - [`BoundingRegion`]: axis-aligned regions with inclusive containment
//! - [`QuadTree`]: an arena-backed quadtree aggregating mass per node
//! - [`NodeRef`]: read-only node handles for traversal and debug drawing

mod arena;
mod bounds;
mod quadtree;

pub use arena::{ArenaStats, TreeBody};
pub use bounds::{BoundingRegion, Quadrant};
pub use quadtree::{NodeRef, QuadTree, Visit, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH, DEFAULT_THETA};
