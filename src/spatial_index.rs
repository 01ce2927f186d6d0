/*
 * Spatial Index Module
 *
 * A region quadtree over a fixed rectangle. Leaves hold up to `capacity`
 * entries; when an insertion pushes a leaf past that, the leaf splits into
 * four quadrants and hands its entries down. Circle queries skip every
 * subtree whose bounds cannot intersect the circle.
 *
 * The tree is meant to be thrown away and rebuilt every tick: there is no
 * removal and a split is never undone.
 */

use glam::Vec2;

use crate::bounds::Rectangle;
use crate::error::IndexError;

// Splits deeper than this stop, so stacks of coincident points stay finite
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Child slots of an internal node. The discriminant is the slot index and the
/// declaration order is the order children are tested and visited in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    // The part of `parent` this quadrant covers; neighbouring quadrants share
    // their edges
    pub fn bounds_within(self, parent: &Rectangle) -> Rectangle {
        let c = parent.center();
        match self {
            Quadrant::NorthWest => Rectangle::new(parent.min_x(), c.y, c.x, parent.max_y()),
            Quadrant::NorthEast => Rectangle::new(c.x, c.y, parent.max_x(), parent.max_y()),
            Quadrant::SouthWest => Rectangle::new(parent.min_x(), parent.min_y(), c.x, c.y),
            Quadrant::SouthEast => Rectangle::new(c.x, parent.min_y(), parent.max_x(), c.y),
        }
    }
}

/// An item stored in the tree together with the position it was filed under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<T> {
    pub item: T,
    pub position: Vec2,
}

#[derive(Debug, Clone)]
pub struct SpatialNode<T> {
    bounds: Rectangle,
    capacity: usize,
    depth: usize,
    points: Vec<Entry<T>>,
    // Present exactly when the node has been divided
    children: Option<Box<[SpatialNode<T>; 4]>>,
}

impl<T> SpatialNode<T> {
    fn new(bounds: Rectangle, capacity: usize, depth: usize) -> Self {
        Self {
            bounds,
            capacity,
            depth,
            points: Vec::new(),
            children: None,
        }
    }

    pub fn bounds(&self) -> &Rectangle {
        &self.bounds
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Root is depth 0
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn points(&self) -> &[Entry<T>] {
        &self.points
    }

    pub fn is_divided(&self) -> bool {
        self.children.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> Option<&[SpatialNode<T>; 4]> {
        self.children.as_deref()
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<&SpatialNode<T>> {
        self.children.as_ref().map(|c| &c[quadrant as usize])
    }

    // First child, in NW, NE, SW, SE order, whose bounds hold the point. Callers
    // only pass points inside the parent, which the closed quadrants cover.
    fn slot_for(children: &[SpatialNode<T>; 4], point: Vec2) -> usize {
        children
            .iter()
            .position(|child| child.bounds.contains(point))
            .expect("closed quadrants cover every point of their parent")
    }

    // Leaf -> internal. Entries move to the first quadrant that holds them.
    // Afterwards only the first over-capacity child is split further; any later
    // sibling that is also over capacity stays a leaf until its next insert.
    fn subdivide(&mut self, max_depth: usize) {
        if self.children.is_some() {
            return;
        }
        if self.depth >= max_depth {
            tracing::trace!(
                depth = self.depth,
                points = self.points.len(),
                "leaf at depth limit left over capacity"
            );
            return;
        }

        let mut children = Box::new(Quadrant::ALL.map(|q| {
            SpatialNode::new(q.bounds_within(&self.bounds), self.capacity, self.depth + 1)
        }));

        for entry in self.points.drain(..) {
            let slot = Self::slot_for(&children, entry.position);
            children[slot].points.push(entry);
        }
        self.points = Vec::new();

        if let Some(child) = children
            .iter_mut()
            .find(|child| child.points.len() > self.capacity)
        {
            child.subdivide(max_depth);
        }

        self.children = Some(children);
    }

    fn insert(&mut self, entry: Entry<T>, max_depth: usize) {
        if let Some(children) = self.children.as_mut() {
            let slot = Self::slot_for(children, entry.position);
            children[slot].insert(entry, max_depth);
            return;
        }

        self.points.push(entry);
        if self.points.len() > self.capacity {
            self.subdivide(max_depth);
        }
    }

    fn query_circle(&self, center: Vec2, radius: f32, found: &mut Vec<T>)
    where
        T: Clone,
    {
        match self.children.as_deref() {
            Some(children) => {
                for child in children {
                    if child.bounds.within_distance(center, radius) {
                        child.query_circle(center, radius, found);
                    }
                }
            }
            None => {
                for entry in &self.points {
                    if entry.position.distance(center) <= radius {
                        found.push(entry.item.clone());
                    }
                }
            }
        }
    }

    // Every node holds at most `capacity` entries and every child lies inside
    // its parent
    pub fn is_valid(&self) -> bool {
        if self.points.len() > self.capacity {
            return false;
        }
        match self.children.as_deref() {
            None => true,
            Some(children) => children
                .iter()
                .all(|child| self.bounds.contains_bounds(&child.bounds) && child.is_valid()),
        }
    }
}

/// Owner of a quadtree root. Clearing drops the whole tree and starts again
/// from a single empty leaf over the same bounds.
#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    root: SpatialNode<T>,
    max_depth: usize,
    len: usize,
}

impl<T> SpatialIndex<T> {
    pub fn new(bounds: Rectangle, capacity: usize) -> Self {
        Self::with_max_depth(bounds, capacity, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(bounds: Rectangle, capacity: usize, max_depth: usize) -> Self {
        Self {
            root: SpatialNode::new(bounds, capacity.max(1), 0),
            max_depth,
            len: 0,
        }
    }

    pub fn root(&self) -> &SpatialNode<T> {
        &self.root
    }

    pub fn bounds(&self) -> &Rectangle {
        &self.root.bounds
    }

    pub fn capacity(&self) -> usize {
        self.root.capacity
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // Number of entries inserted since the last clear
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// File `item` under `position`. Points outside the root bounds are
    /// rejected and the tree is not touched.
    pub fn insert(&mut self, item: T, position: Vec2) -> Result<(), IndexError> {
        if !self.root.bounds.contains(position) {
            return Err(IndexError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        }
        self.root.insert(Entry { item, position }, self.max_depth);
        self.len += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.root = SpatialNode::new(self.root.bounds, self.root.capacity, 0);
        self.len = 0;
    }

    // Clear, then insert everything; returns how many items were rejected
    pub fn rebuild<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = (T, Vec2)>,
    {
        self.clear();
        let mut rejected = 0;
        for (item, position) in items {
            if let Err(err) = self.insert(item, position) {
                tracing::warn!(%err, "spatial index rejected an item");
                rejected += 1;
            }
        }
        rejected
    }

    /// Items whose position is within `radius` of `center` (inclusive). The
    /// order follows the NW, NE, SW, SE traversal.
    pub fn query_circle(&self, center: Vec2, radius: f32) -> Vec<T>
    where
        T: Clone,
    {
        let mut found = Vec::new();
        self.query_circle_into(center, radius, &mut found);
        found
    }

    // Same as `query_circle`, appending to a caller-owned buffer
    pub fn query_circle_into(&self, center: Vec2, radius: f32, found: &mut Vec<T>)
    where
        T: Clone,
    {
        self.root.query_circle(center, radius, found);
    }

    // All nodes, parents before children, children in NW, NE, SW, SE order
    pub fn nodes(&self) -> Nodes<'_, T> {
        Nodes {
            stack: vec![&self.root],
        }
    }

    pub fn leaves(&self) -> impl Iterator<Item = &SpatialNode<T>> + '_ {
        self.nodes().filter(|node| node.is_leaf())
    }

    // Partition grid for drawing
    pub fn leaf_bounds(&self) -> impl Iterator<Item = Rectangle> + '_ {
        self.leaves().map(|node| node.bounds)
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    // Deepest node's depth; 0 for an undivided root
    pub fn depth(&self) -> usize {
        self.nodes().map(|node| node.depth).max().unwrap_or(0)
    }

    pub fn is_valid(&self) -> bool {
        self.root.is_valid()
    }
}

pub struct Nodes<'a, T> {
    stack: Vec<&'a SpatialNode<T>>,
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = &'a SpatialNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children.as_deref() {
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}
