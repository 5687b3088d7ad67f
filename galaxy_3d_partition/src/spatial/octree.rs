/// Octree: loose-placement spatial index over axis-aligned bounds.
///
/// Each object is stored in exactly one node: the shallowest node that
/// fully contains its bound once no child of that node does. Nodes split
/// lazily when their object count exceeds `max_objects_per_node`, and are
/// never merged back; `clear` is the only way to shrink the tree.
///
/// Nodes live in a flat arena. A node's children are all-or-nothing,
/// stored as a single `Option<[NodeId; 8]>` indexed with the octant bit
/// layout of `Bound::octant_of` (bit0 = X, bit1 = Y, bit2 = Z).
///
/// The tree does not own the objects it indexes. Entries keep the bound
/// they were inserted with, so removal must be given that same bound.

use std::fmt::Write;
use glam::Vec3;
use crate::camera::{Frustum, FrustumTest};
use crate::math::{Bound, Ray};
use crate::spatial_debug;
use super::debug_draw::{self, DebugLineSink};

const LOG_SOURCE: &str = "galaxy3d::Octree";

/// Index of a node in the octree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node, present for the whole life of the tree.
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

// ===== CONFIGURATION =====

/// Subdivision limits for an octree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctreeConfig {
    /// Deepest level a node may be created at (root = 0)
    pub max_depth: u32,
    /// Objects a node holds before it splits
    pub max_objects_per_node: usize,
}

impl OctreeConfig {
    pub const DEFAULT_MAX_DEPTH: u32 = 5;
    pub const DEFAULT_MAX_OBJECTS_PER_NODE: usize = 5;
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_objects_per_node: Self::DEFAULT_MAX_OBJECTS_PER_NODE,
        }
    }
}

// ===== NODE =====

struct OctreeNode<K> {
    /// World-space bound of this node
    bound: Bound,
    /// Root = 0
    depth: u32,
    /// Objects that fit no single child, with the bound they were inserted with
    objects: Vec<(K, Bound)>,
    /// Either all 8 children or none
    children: Option<[NodeId; 8]>,
}

impl<K> OctreeNode<K> {
    fn new(bound: Bound, depth: u32) -> Self {
        Self {
            bound,
            depth,
            objects: Vec::new(),
            children: None,
        }
    }
}

// ===== OCTREE =====

pub struct Octree<K> {
    nodes: Vec<OctreeNode<K>>,
    config: OctreeConfig,
}

impl<K: Copy + PartialEq> Octree<K> {
    /// Create an octree holding only its root node.
    ///
    /// A zero-volume root is accepted; every object then stays at the root.
    pub fn new(bound: Bound, config: OctreeConfig) -> Self {
        Self {
            nodes: vec![OctreeNode::new(bound, 0)],
            config,
        }
    }

    pub fn bound(&self) -> Bound {
        self.node(NodeId::ROOT).bound
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    fn node(&self, id: NodeId) -> &OctreeNode<K> {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut OctreeNode<K> {
        &mut self.nodes[id.index()]
    }

    // ===== PLACEMENT =====

    /// Octant of the child of `id` that fully contains `bound`, if any.
    ///
    /// The octant holding the bound's center is tried first since it is
    /// the only candidate for any bound with non-zero extent.
    fn fitting_octant(&self, id: NodeId, bound: &Bound) -> Option<usize> {
        let node = self.node(id);
        let children = node.children?;

        let preferred = node.bound.octant_of(bound.center());
        if self.node(children[preferred]).bound.contains(bound) {
            return Some(preferred);
        }

        (0..8)
            .filter(|&octant| octant != preferred)
            .find(|&octant| self.node(children[octant]).bound.contains(bound))
    }

    /// Insert an object with its current bound.
    ///
    /// Descends while some child fully contains `bound`, appends the object
    /// to the node where descent stops, then splits that node if it now
    /// exceeds its capacity.
    pub fn insert(&mut self, key: K, bound: Bound) {
        self.insert_at(NodeId::ROOT, key, bound);
    }

    fn insert_at(&mut self, start: NodeId, key: K, bound: Bound) {
        let mut current = start;
        while let Some(octant) = self.fitting_octant(current, &bound) {
            // fitting_octant only succeeds on nodes with children
            if let Some(children) = self.node(current).children {
                current = children[octant];
            }
        }

        self.node_mut(current).objects.push((key, bound));
        self.split_if_needed(current);
    }

    fn should_split(&self, id: NodeId, incoming: usize) -> bool {
        let node = self.node(id);
        node.children.is_none()
            && node.objects.len() + incoming > self.config.max_objects_per_node
            && node.depth < self.config.max_depth
    }

    /// Allocate the 8 children of `id` and return their ids.
    fn create_children(&mut self, id: NodeId) -> [NodeId; 8] {
        let (bound, depth) = {
            let node = self.node(id);
            (node.bound, node.depth)
        };

        let first = self.nodes.len() as u32;
        let children: [NodeId; 8] = std::array::from_fn(|octant| NodeId(first + octant as u32));
        for octant in 0..8 {
            self.nodes.push(OctreeNode::new(bound.create_octant(octant), depth + 1));
        }
        self.node_mut(id).children = Some(children);
        children
    }

    /// Split `id` if it exceeds capacity, pushing down every object that
    /// now fits a single child. Objects fitting no child stay put.
    fn split_if_needed(&mut self, id: NodeId) {
        if !self.should_split(id, 0) {
            return;
        }

        let children = self.create_children(id);
        let objects = std::mem::take(&mut self.node_mut(id).objects);
        let total = objects.len();
        let mut kept = Vec::new();

        for (key, bound) in objects {
            match self.fitting_octant(id, &bound) {
                Some(octant) => self.insert_at(children[octant], key, bound),
                None => kept.push((key, bound)),
            }
        }

        let kept_count = kept.len();
        self.node_mut(id).objects = kept;

        let node = self.node(id);
        spatial_debug!(
            LOG_SOURCE,
            "Split node {} at depth {}: {} objects, {} pushed down, {} kept",
            id.0, node.depth, total, total - kept_count, kept_count
        );
    }

    /// Insert many objects in one pass.
    ///
    /// Objects are grouped per octant at each level and each group is
    /// handed to its child in one go. The resulting placement matches
    /// inserting the objects one at a time.
    pub fn bulk_insert(&mut self, items: Vec<(K, Bound)>) {
        self.bulk_insert_at(NodeId::ROOT, items);
    }

    fn bulk_insert_at(&mut self, id: NodeId, mut items: Vec<(K, Bound)>) {
        if items.is_empty() {
            return;
        }

        let existing_children = self.node(id).children;
        let children = match existing_children {
            Some(children) => children,
            None => {
                if !self.should_split(id, items.len()) {
                    self.node_mut(id).objects.append(&mut items);
                    return;
                }
                // Existing objects take part in the redistribution
                let mut existing = std::mem::take(&mut self.node_mut(id).objects);
                existing.append(&mut items);
                items = existing;
                self.create_children(id)
            }
        };

        let mut groups: [Vec<(K, Bound)>; 8] = Default::default();
        for (key, bound) in items {
            match self.fitting_octant(id, &bound) {
                Some(octant) => groups[octant].push((key, bound)),
                None => self.node_mut(id).objects.push((key, bound)),
            }
        }

        for (octant, group) in groups.into_iter().enumerate() {
            self.bulk_insert_at(children[octant], group);
        }
    }

    /// Remove an object, given the bound it was inserted with.
    ///
    /// Returns `false` if the object was not found along that bound's path.
    pub fn remove(&mut self, key: K, bound: &Bound) -> bool {
        let mut current = NodeId::ROOT;
        loop {
            let objects = &mut self.node_mut(current).objects;
            if let Some(pos) = objects.iter().position(|(k, _)| *k == key) {
                objects.swap_remove(pos);
                return true;
            }

            let next = self
                .fitting_octant(current, bound)
                .zip(self.node(current).children)
                .map(|(octant, children)| children[octant]);
            match next {
                Some(child) => current = child,
                None => return false,
            }
        }
    }

    /// Move an object: `remove(old)` followed by `insert(new)`.
    ///
    /// The object is inserted even if it was not found under `old_bound`.
    pub fn update(&mut self, key: K, old_bound: &Bound, new_bound: Bound) -> bool {
        let removed = self.remove(key, old_bound);
        self.insert(key, new_bound);
        removed
    }

    /// Drop every object and every child node, keeping the root bound.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = self.node_mut(NodeId::ROOT);
        root.objects.clear();
        root.children = None;
    }

    // ===== QUERIES =====

    /// Objects whose bound is hit by `ray`.
    ///
    /// A subtree is visited only if the ray hits its node bound. Root
    /// entries are always tested since they may extend past the root.
    pub fn query_ray(&self, ray: &Ray) -> Vec<K> {
        let mut results = Vec::new();
        self.collect_matching(NodeId::ROOT, &mut results, &|bound: &Bound| bound.intersects_ray(ray));
        results
    }

    /// Objects whose bound intersects (or touches) `volume`.
    pub fn query_volume(&self, volume: &Bound) -> Vec<K> {
        let mut results = Vec::new();
        self.collect_matching(NodeId::ROOT, &mut results, &|bound: &Bound| bound.intersects(volume));
        results
    }

    fn collect_matching(&self, id: NodeId, results: &mut Vec<K>, test: &dyn Fn(&Bound) -> bool) {
        let node = self.node(id);
        results.extend(
            node.objects
                .iter()
                .filter(|(_, bound)| test(bound))
                .map(|(key, _)| *key),
        );

        if let Some(children) = node.children {
            for child in children {
                if test(&self.node(child).bound) {
                    self.collect_matching(child, results, test);
                }
            }
        }
    }

    /// Objects whose bound is visible in `frustum`.
    ///
    /// Per node, 3-way classification:
    /// - `Outside` → skip the subtree
    /// - `Inside` → take every object of the subtree untested
    /// - `Partial` → test the node's objects, recurse into children
    pub fn query_frustum(&self, frustum: &Frustum) -> Vec<K> {
        let mut results = Vec::new();
        let root = self.node(NodeId::ROOT);

        // Root entries may lie outside the root bound
        results.extend(
            root.objects
                .iter()
                .filter(|(_, bound)| frustum.is_visible(bound))
                .map(|(key, _)| *key),
        );

        if let Some(children) = root.children {
            for child in children {
                self.collect_frustum(child, frustum, &mut results);
            }
        }
        results
    }

    fn collect_frustum(&self, id: NodeId, frustum: &Frustum, results: &mut Vec<K>) {
        let node = self.node(id);
        match frustum.classify(&node.bound) {
            FrustumTest::Outside => {}
            FrustumTest::Inside => self.collect_all(id, results),
            FrustumTest::Partial => {
                results.extend(
                    node.objects
                        .iter()
                        .filter(|(_, bound)| frustum.is_visible(bound))
                        .map(|(key, _)| *key),
                );
                if let Some(children) = node.children {
                    for child in children {
                        self.collect_frustum(child, frustum, results);
                    }
                }
            }
        }
    }

    fn collect_all(&self, id: NodeId, results: &mut Vec<K>) {
        let node = self.node(id);
        results.extend(node.objects.iter().map(|(key, _)| *key));
        if let Some(children) = node.children {
            for child in children {
                self.collect_all(child, results);
            }
        }
    }

    // ===== DIAGNOSTICS =====

    /// Number of nodes currently allocated, root included.
    pub fn total_node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of objects held across all nodes.
    pub fn total_object_count(&self) -> usize {
        self.nodes.iter().map(|node| node.objects.len()).sum()
    }

    /// Depth of the deepest allocated node, whether or not it holds objects.
    pub fn max_occupied_depth(&self) -> u32 {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Depth-first text dump, one line per node, indented by depth.
    pub fn dump(&self) -> String {
        let mut out = String::from("===== OCTREE DUMP BEGIN =====\n");
        self.dump_node(NodeId::ROOT, &mut out);
        out.push_str("===== OCTREE DUMP END =====\n");
        out
    }

    fn dump_node(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        let Bound { min, max } = node.bound;
        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "{:indent$}[Octree] depth={}, objects={}, bounds=[({:.1},{:.1},{:.1})-({:.1},{:.1},{:.1})]",
            "",
            node.depth,
            node.objects.len(),
            min.x, min.y, min.z,
            max.x, max.y, max.z,
            indent = node.depth as usize * 2,
        );
        if let Some(children) = node.children {
            for child in children {
                self.dump_node(child, out);
            }
        }
    }

    /// Log the dump at Debug severity, one entry per line.
    pub fn debug_dump(&self) {
        if !crate::log::enabled(crate::log::LogSeverity::Debug) {
            return;
        }
        for line in self.dump().lines() {
            spatial_debug!(LOG_SOURCE, "{}", line);
        }
    }

    /// Emit the 12 edges of every node, colored by depth.
    pub fn debug_draw(&self, sink: &mut dyn DebugLineSink) {
        let edge_count = self.nodes.len() * 12;
        let mut starts: Vec<Vec3> = Vec::with_capacity(edge_count);
        let mut ends: Vec<Vec3> = Vec::with_capacity(edge_count);
        let mut colors = Vec::with_capacity(edge_count);

        for node in &self.nodes {
            let color = debug_draw::depth_color(node.depth);
            for (start, end) in debug_draw::bound_edges(&node.bound) {
                starts.push(start);
                ends.push(end);
                colors.push(color);
            }
        }

        sink.add_lines(&starts, &ends, &colors);
    }
}

#[cfg(test)]
#[path = "octree_tests.rs"]
mod tests;
