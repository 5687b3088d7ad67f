/// Debug line geometry for visualizing the octree.
///
/// The partition core never draws anything itself. It produces line
/// segments (start, end, color) and hands them to a `DebugLineSink`
/// supplied by the renderer.

use glam::{Vec3, Vec4};
use crate::math::Bound;

/// Node colors, cycled by depth: green, light blue, orange.
pub const DEPTH_COLORS: [Vec4; 3] = [
    Vec4::new(0.0, 1.0, 0.0, 1.0),
    Vec4::new(0.2, 0.8, 1.0, 1.0),
    Vec4::new(1.0, 0.6, 0.1, 1.0),
];

/// Corner index pairs forming the 12 edges of a box.
///
/// Corner indices follow `Bound::corners` (bit0 = X, bit1 = Y, bit2 = Z).
const EDGES: [(usize, usize); 12] = [
    // Along X
    (0, 1), (2, 3), (4, 5), (6, 7),
    // Along Y
    (0, 2), (1, 3), (4, 6), (5, 7),
    // Along Z
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Receiver for debug line batches.
///
/// The three slices always have the same length; entry `i` describes
/// one segment from `starts[i]` to `ends[i]` drawn with `colors[i]`.
pub trait DebugLineSink {
    fn add_lines(&mut self, starts: &[Vec3], ends: &[Vec3], colors: &[Vec4]);
}

/// Color used for a node at the given depth.
pub fn depth_color(depth: u32) -> Vec4 {
    DEPTH_COLORS[depth as usize % DEPTH_COLORS.len()]
}

/// The 12 edges of a bound as (start, end) pairs.
pub fn bound_edges(bound: &Bound) -> [(Vec3, Vec3); 12] {
    let corners = bound.corners();
    EDGES.map(|(a, b)| (corners[a], corners[b]))
}

/// Sink that keeps every line it receives.
///
/// Useful for tests and for renderers that upload lines once per frame.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    pub starts: Vec<Vec3>,
    pub ends: Vec<Vec3>,
    pub colors: Vec<Vec4>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered segments.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn clear(&mut self) {
        self.starts.clear();
        self.ends.clear();
        self.colors.clear();
    }
}

impl DebugLineSink for LineBuffer {
    fn add_lines(&mut self, starts: &[Vec3], ends: &[Vec3], colors: &[Vec4]) {
        self.starts.extend_from_slice(starts);
        self.ends.extend_from_slice(ends);
        self.colors.extend_from_slice(colors);
    }
}

#[cfg(test)]
#[path = "debug_draw_tests.rs"]
mod tests;
