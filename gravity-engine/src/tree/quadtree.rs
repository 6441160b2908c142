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
//! Barnes-Hut quadtree
//!
//! Every node aggregates the mass and mass-weighted centroid of all bodies
//! inserted below it. A node starts as a leaf buffering up to `capacity`
//! bodies; the insertion that would overflow it turns it into an internal
//! node with four children, and the buffered bodies sink into the first
//! child (in [`Quadrant::ALL`](crate::tree::Quadrant::ALL) order) whose
//! bounds contain them.
//!
//! # Force evaluation
//!
//! [`QuadTree::calculate_force`] walks the tree top-down. For an internal
//! node with bounds diagonal `s` at distance `d` from the query body:
//!
//! - `s / d >= theta`: the node is too close, descend into its children
//! - `s / d < theta`: treat the node as one pseudo-body at its centroid
//!
//! With `theta = 0` every node is opened and the result equals the exact
//! pairwise sum. Larger values approximate more aggressively.
//!
//! # Coincident bodies
//!
//! Two bodies at the same position can never be separated by subdivision.
//! Leaves at `max_depth` therefore accept bodies beyond their capacity.

use crate::body::{Body, PointMass};
use crate::tree::arena::{ArenaStats, Node, NodeArena, NodeIndex, TreeBody, ROOT};
use crate::tree::BoundingRegion;
use crate::Vec2;

/// Default number of bodies a leaf holds before subdividing
pub const DEFAULT_CAPACITY: usize = 1;

/// Default depth at which leaves stop subdividing
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Default far-field threshold
pub const DEFAULT_THETA: f64 = 2.0;

/// Visitor decision for [`QuadTree::visit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Visit this node's children
    Continue,
    /// Skip this node's children; siblings are still visited
    Skip,
}

/// Read-only handle to a node during traversal
///
/// A node is also a pseudo-body: its [`PointMass`] position is the
/// aggregate centroid and its mass the aggregate mass.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a QuadTree,
    index: NodeIndex,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a Node {
        self.tree.arena.node(self.index)
    }

    /// Region covered by this node
    pub fn bounds(&self) -> BoundingRegion {
        self.node().bounds
    }

    /// Total mass inserted below this node
    pub fn total_mass(&self) -> f64 {
        self.node().mass
    }

    /// Mass-weighted centroid (bounds center if empty)
    pub fn center_of_mass(&self) -> Vec2 {
        self.node().center_of_mass()
    }

    /// Whether this node holds bodies directly
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// Bodies buffered in this leaf (always empty for internal nodes)
    pub fn bodies(&self) -> &'a [TreeBody] {
        &self.node().bodies
    }

    /// Depth below the root
    pub fn depth(&self) -> u32 {
        self.node().depth
    }

    /// The four children in quadrant order, if internal
    pub fn children(&self) -> Option<[NodeRef<'a>; 4]> {
        let first = self.node().children?;
        let tree = self.tree;
        Some([0, 1, 2, 3].map(|offset| NodeRef {
            tree,
            index: first + offset,
        }))
    }
}

impl PointMass for NodeRef<'_> {
    fn position(&self) -> Vec2 {
        self.center_of_mass()
    }

    fn mass(&self) -> f64 {
        self.total_mass()
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("index", &self.index)
            .field("bounds", &self.bounds())
            .field("mass", &self.total_mass())
            .field("leaf", &self.is_leaf())
            .finish()
    }
}

/// Recursive spatial index over bodies with mass aggregation
///
/// # Examples
///
/// ```
/// use gravity_engine::tree::{BoundingRegion, QuadTree};
/// use gravity_engine::{Body, BodyRegistry, Vec2};
///
/// let mut registry = BodyRegistry::new();
/// registry.add(Body::new(Vec2::new(-1.0, -1.0), 2.0));
/// registry.add(Body::new(Vec2::new(1.0, 1.0), 2.0));
///
/// let mut tree = QuadTree::new(BoundingRegion::centered(10.0));
/// assert_eq!(tree.add_all(registry.bodies()), 2);
/// assert_eq!(tree.total_mass(), 4.0);
/// assert_eq!(tree.center_of_mass(), Vec2::zeros());
/// ```
#[derive(Debug, Clone)]
pub struct QuadTree {
    arena: NodeArena,
    capacity: usize,
    max_depth: u32,
    theta: f64,
}

impl QuadTree {
    /// Create an empty tree with default capacity, depth limit and theta
    pub fn new(bounds: BoundingRegion) -> Self {
        Self::with_capacity(bounds, DEFAULT_CAPACITY)
    }

    /// Create an empty tree whose leaves hold up to `capacity` bodies
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(bounds: BoundingRegion, capacity: usize) -> Self {
        assert!(capacity > 0, "Leaf capacity must be at least 1");
        QuadTree {
            arena: NodeArena::new(bounds, capacity),
            capacity,
            max_depth: DEFAULT_MAX_DEPTH,
            theta: DEFAULT_THETA,
        }
    }

    /// Builder-style depth limit setter
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder-style theta setter
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.set_theta(theta);
        self
    }

    /// Set the far-field threshold
    ///
    /// # Panics
    ///
    /// Panics if `theta` is negative or NaN.
    pub fn set_theta(&mut self, theta: f64) {
        assert!(theta >= 0.0, "Theta must be non-negative");
        self.theta = theta;
    }

    /// Current far-field threshold
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Leaf capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Depth at which leaves stop subdividing
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Bounds of the root node
    pub fn bounds(&self) -> BoundingRegion {
        self.arena.node(ROOT).bounds
    }

    /// Read-only handle to the root node
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            index: ROOT,
        }
    }

    /// Aggregate mass of everything inserted since the last clear
    pub fn total_mass(&self) -> f64 {
        self.arena.node(ROOT).mass
    }

    /// Aggregate centroid of everything inserted since the last clear
    pub fn center_of_mass(&self) -> Vec2 {
        self.arena.node(ROOT).center_of_mass()
    }

    /// Number of nodes in the current tree
    pub fn node_count(&self) -> usize {
        self.arena.in_use()
    }

    /// Deepest node depth in the current tree
    pub fn depth(&self) -> u32 {
        self.arena
            .live_nodes()
            .iter()
            .map(|n| n.depth)
            .max()
            .unwrap_or(0)
    }

    /// Number of bodies held by the tree's leaves
    pub fn body_count(&self) -> usize {
        self.arena
            .live_nodes()
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.bodies.len())
            .sum()
    }

    /// Slot reuse statistics of the node arena
    pub fn arena_stats(&self) -> &ArenaStats {
        self.arena.stats()
    }

    /// Remove every body and child, restoring the root to an empty leaf
    ///
    /// Aggregate mass and centroid are reset as well, so aggregates always
    /// reflect only the bodies inserted since the last clear.
    pub fn clear(&mut self) {
        self.arena.rewind();
    }

    /// Insert a body
    ///
    /// Returns `false` without changing the tree if the body is not live or
    /// lies outside the root bounds.
    pub fn try_add(&mut self, body: &Body) -> bool {
        if !body.is_live() {
            return false;
        }
        self.insert(
            ROOT,
            TreeBody {
                id: body.id(),
                position: body.position,
                mass: body.mass(),
            },
        )
    }

    /// Insert every body, silently dropping rejected ones
    ///
    /// Returns the number of bodies inserted.
    pub fn add_all<'b, I>(&mut self, bodies: I) -> usize
    where
        I: IntoIterator<Item = &'b Body>,
    {
        bodies.into_iter().filter(|b| self.try_add(b)).count()
    }

    fn insert(&mut self, index: NodeIndex, body: TreeBody) -> bool {
        let capacity = self.capacity;
        let max_depth = self.max_depth;
        let node = self.arena.node_mut(index);

        if !node.bounds.contains_point(body.position) {
            return false;
        }

        node.mass += body.mass;
        node.weighted_position += body.position * body.mass;

        if let Some(first) = node.children {
            let placed = self.insert_first_fit(first, body);
            debug_assert!(placed, "children must tile their parent");
            return true;
        }

        if node.bodies.len() < capacity || node.depth >= max_depth {
            node.bodies.push(body);
            return true;
        }

        let bounds = node.bounds;
        let depth = node.depth;
        let mut buffered = std::mem::take(&mut node.bodies);

        let first = self.arena.alloc_children(&bounds, depth + 1);
        self.arena.node_mut(index).children = Some(first);

        for sunk in buffered.drain(..) {
            let placed = self.insert_first_fit(first, sunk);
            debug_assert!(placed, "children must tile their parent");
        }
        // Hand the emptied buffer back so its capacity survives the rebuild
        self.arena.node_mut(index).bodies = buffered;

        let placed = self.insert_first_fit(first, body);
        debug_assert!(placed, "children must tile their parent");
        true
    }

    fn insert_first_fit(&mut self, first: NodeIndex, body: TreeBody) -> bool {
        (first..first + 4).any(|child| self.insert(child, body))
    }

    /// Pre-order traversal from the root
    ///
    /// The visitor decides per node whether its children are visited.
    ///
    /// # Examples
    ///
    /// ```
    /// use gravity_engine::tree::{BoundingRegion, QuadTree, Visit};
    ///
    /// let tree = QuadTree::new(BoundingRegion::centered(1.0));
    /// let mut regions = Vec::new();
    /// tree.visit(|node| {
    ///     regions.push(node.bounds());
    ///     Visit::Continue
    /// });
    /// assert_eq!(regions.len(), 1);
    /// ```
    pub fn visit<'t, F>(&'t self, mut visitor: F)
    where
        F: FnMut(NodeRef<'t>) -> Visit,
    {
        self.visit_from(ROOT, &mut visitor);
    }

    fn visit_from<'t, F>(&'t self, index: NodeIndex, visitor: &mut F)
    where
        F: FnMut(NodeRef<'t>) -> Visit,
    {
        let node = NodeRef { tree: self, index };
        if visitor(node) == Visit::Skip {
            return;
        }
        if let Some(first) = self.arena.node(index).children {
            for child in first..first + 4 {
                self.visit_from(child, visitor);
            }
        }
    }

    /// Barnes-Hut acceleration on `query`
    ///
    /// `force` is called once per contributing body or pseudo-body and the
    /// results are summed. The query body never contributes to itself.
    pub fn calculate_force<F>(&self, query: &Body, mut force: F) -> Vec2
    where
        F: FnMut(&Body, &dyn PointMass) -> Vec2,
    {
        let theta = self.theta;
        let mut total = Vec2::zeros();

        self.visit(|node| {
            if node.is_leaf() {
                for occupant in node.bodies() {
                    if !is_same_body(occupant, query) {
                        total += force(query, occupant);
                    }
                }
                return Visit::Skip;
            }

            let distance = (query.position - node.center_of_mass()).norm();
            let ratio = node.bounds().diagonal() / distance;
            if ratio >= theta {
                Visit::Continue
            } else {
                total += force(query, &node);
                Visit::Skip
            }
        });

        total
    }
}

/// Registered bodies match by id; unregistered ones by position and mass
fn is_same_body(occupant: &TreeBody, query: &Body) -> bool {
    if occupant.id.is_assigned() || query.id().is_assigned() {
        occupant.id == query.id()
    } else {
        occupant.position == query.position && occupant.mass == query.mass()
    }
}
