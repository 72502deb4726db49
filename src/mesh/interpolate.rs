//! Barycentric interpolation of node values.
//!
//! A located point inside a triangle gets three node weights from the
//! sub-triangle areas; a point outside the mesh gets the full weight on
//! its nearest node. The weight normalization uses absolute sub-areas and
//! is only meaningful for points inside or on the triangle, which is why
//! [`MeshIndex::locate`] gates every interpolation — weights are never
//! produced from an unlocated triangle.

use log::debug;

use super::index::{ElementId, MeshIndex, NodeId};
use super::locate::Location;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Node weights of one interpolated point: `(node, weight)` pairs summing
/// to 1.0. Three pairs for an interior point, a single `(nearest, 1.0)`
/// pair for an outside point.
pub type NodeWeights = Vec<(NodeId, f64)>;

/// Combine node weights with a per-node value row (1-based nodes).
pub fn apply_weights(weights: &[(NodeId, f64)], values: &[f64]) -> f64 {
    weights
        .iter()
        .map(|&(node, w)| w * values[(node - 1) as usize])
        .sum()
}

impl MeshIndex {
    /// Barycentric weights of `(x, y)` in a triangle, paired with the
    /// triangle's nodes.
    ///
    /// Each weight is the absolute cross product of the point with the
    /// opposite edge, divided by the sum of the three. Only valid for
    /// points inside or on the triangle.
    pub fn barycentric_weights(&self, element: ElementId, x: f64, y: f64) -> [(NodeId, f64); 3] {
        let [n1, n2, n3] = self.triangle_nodes(element);
        let (x1, y1) = self.node_coord(n1);
        let (x2, y2) = self.node_coord(n2);
        let (x3, y3) = self.node_coord(n3);

        // a = |PB x PC|, b = |PC x PA|, c = |PA x PB|
        let a = ((x2 - x) * (y3 - y) - (y2 - y) * (x3 - x)).abs();
        let b = ((x3 - x) * (y1 - y) - (y3 - y) * (x1 - x)).abs();
        let c = ((x1 - x) * (y2 - y) - (y1 - y) * (x2 - x)).abs();

        let total = a + b + c;
        [(n1, a / total), (n2, b / total), (n3, c / total)]
    }

    /// Node weights of a point: three barycentric weights when a triangle
    /// contains it, `[(nearest_node, 1.0)]` when it lies outside the mesh.
    ///
    /// The outside case is an explicit fallback, not an error.
    pub fn interpolate_point(&self, x: f64, y: f64) -> NodeWeights {
        match self.locate(x, y) {
            Location::Element(element) => self.barycentric_weights(element, x, y).to_vec(),
            Location::Outside => {
                debug!(
                    "point ({}, {}) is outside the mesh, using the nearest node",
                    x, y
                );
                vec![(self.nearest_node(x, y), 1.0)]
            }
        }
    }

    /// Node weights of each point in turn.
    pub fn interpolate_batch(&self, points: &[(f64, f64)]) -> Vec<NodeWeights> {
        points
            .iter()
            .map(|&(x, y)| self.interpolate_point(x, y))
            .collect()
    }

    /// Parallel batch interpolation; points are independent.
    #[cfg(feature = "parallel")]
    pub fn interpolate_batch_parallel(&self, points: &[(f64, f64)]) -> Vec<NodeWeights> {
        points
            .par_iter()
            .map(|&(x, y)| self.interpolate_point(x, y))
            .collect()
    }
}
