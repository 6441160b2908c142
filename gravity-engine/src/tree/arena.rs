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
//! Node arena for the quadtree
//!
//! The tree is rebuilt every tick. Rather than dropping and reallocating
//! every node, nodes live in a flat `Vec` and are addressed by index.
//! Clearing the tree only rewinds the in-use counter; slots (and the
//! capacity of their body buffers) are reused on the next rebuild.

use crate::body::{BodyId, PointMass};
use crate::tree::BoundingRegion;
use crate::Vec2;

/// Index into the node arena
pub(crate) type NodeIndex = usize;

/// Index of the root node
pub(crate) const ROOT: NodeIndex = 0;

/// Copy of the body data the tree needs for force evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeBody {
    /// Registry id of the body
    pub id: BodyId,
    /// Position at insertion time
    pub position: Vec2,
    /// Mass at insertion time
    pub mass: f64,
}

impl PointMass for TreeBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn mass(&self) -> f64 {
        self.mass
    }
}

/// A single quadtree node
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub bounds: BoundingRegion,
    pub mass: f64,
    /// Sum of position * mass over every body inserted below this node
    pub weighted_position: Vec2,
    /// Index of the first of four contiguous children, if internal
    pub children: Option<NodeIndex>,
    pub bodies: Vec<TreeBody>,
    pub depth: u32,
}

impl Node {
    fn new(bounds: BoundingRegion, depth: u32, capacity: usize) -> Self {
        Node {
            bounds,
            mass: 0.0,
            weighted_position: Vec2::zeros(),
            children: None,
            bodies: Vec::with_capacity(capacity),
            depth,
        }
    }

    /// Return the node to a pristine leaf, keeping buffer capacity
    pub fn reset(&mut self, bounds: BoundingRegion, depth: u32) {
        self.bounds = bounds;
        self.mass = 0.0;
        self.weighted_position = Vec2::zeros();
        self.children = None;
        self.bodies.clear();
        self.depth = depth;
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Mass-weighted centroid, or the bounds center for an empty node
    pub fn center_of_mass(&self) -> Vec2 {
        if self.mass > 0.0 {
            self.weighted_position / self.mass
        } else {
            self.bounds.center()
        }
    }
}

/// Statistics for monitoring slot reuse across rebuilds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArenaStats {
    /// Number of times a node slot was reused
    pub reused: usize,
    /// Number of times a new slot had to be allocated
    pub allocated: usize,
    /// Nodes in use by the current tree
    pub in_use: usize,
    /// Peak number of slots ever allocated
    pub peak: usize,
}

impl ArenaStats {
    /// Calculate the reuse rate as a percentage
    pub fn reuse_rate(&self) -> f64 {
        let total = self.reused + self.allocated;
        if total == 0 {
            0.0
        } else {
            (self.reused as f64 / total as f64) * 100.0
        }
    }
}

/// Flat storage for quadtree nodes
#[derive(Debug, Clone)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
    in_use: usize,
    leaf_capacity: usize,
    stats: ArenaStats,
}

impl NodeArena {
    /// Create an arena holding only a root node
    pub fn new(root_bounds: BoundingRegion, leaf_capacity: usize) -> Self {
        NodeArena {
            nodes: vec![Node::new(root_bounds, 0, leaf_capacity)],
            in_use: 1,
            leaf_capacity,
            stats: ArenaStats {
                allocated: 1,
                in_use: 1,
                peak: 1,
                ..ArenaStats::default()
            },
        }
    }

    /// Drop every node but the root and reset the root to an empty leaf
    pub fn rewind(&mut self) {
        let root = &mut self.nodes[ROOT];
        let bounds = root.bounds;
        root.reset(bounds, 0);
        self.in_use = 1;
        self.stats.in_use = 1;
    }

    /// Allocate four contiguous children for the given parent bounds
    ///
    /// Returns the index of the first child.
    pub fn alloc_children(&mut self, parent: &BoundingRegion, depth: u32) -> NodeIndex {
        let first = self.in_use;
        for (offset, bounds) in parent.subdivide().into_iter().enumerate() {
            let index = first + offset;
            if index < self.nodes.len() {
                self.nodes[index].reset(bounds, depth);
                self.stats.reused += 1;
            } else {
                self.nodes.push(Node::new(bounds, depth, self.leaf_capacity));
                self.stats.allocated += 1;
            }
        }
        self.in_use += 4;
        self.stats.in_use = self.in_use;
        if self.nodes.len() > self.stats.peak {
            self.stats.peak = self.nodes.len();
            log::trace!("Node arena grew to {} slots", self.stats.peak);
        }
        first
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index]
    }

    /// Nodes belonging to the current tree
    pub fn live_nodes(&self) -> &[Node] {
        &self.nodes[..self.in_use]
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn stats(&self) -> &ArenaStats {
        &self.stats
    }
}
