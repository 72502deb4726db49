//! Point location without a spatial index.
//!
//! The containing-element search orders all triangles by squared distance
//! from the query point to their barycenter and tests containment in that
//! order. On locally coherent meshes the first few candidates almost
//! always hit; the worst case is O(E log E) per query. A spatial index
//! (e.g. an R-tree over triangle bounding boxes) could replace the
//! ordering without changing the containment contract.

use super::index::{ElementId, MeshIndex, NodeId};

/// Containment tolerance: points this close to an edge count as inside,
/// so that queries on triangle boundaries do not fall through to the
/// nearest-node fallback.
const INSIDE_TOL: f64 = 1e-12;

/// Where a query point sits relative to the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// Contained in this triangle (1-based)
    Element(ElementId),
    /// Outside every triangle; an explicit non-error sentinel
    Outside,
}

impl Location {
    /// The containing element, if any.
    pub fn element(self) -> Option<ElementId> {
        match self {
            Location::Element(e) => Some(e),
            Location::Outside => None,
        }
    }

    pub fn is_outside(self) -> bool {
        matches!(self, Location::Outside)
    }
}

impl MeshIndex {
    /// Find the triangle containing `(x, y)`, or [`Location::Outside`].
    ///
    /// Triangles are tested in ascending order of squared barycenter
    /// distance (the square root is never needed for ordering); the first
    /// containing triangle wins.
    pub fn locate(&self, x: f64, y: f64) -> Location {
        let mut order: Vec<(f64, ElementId)> = (1..=self.nb_triangles() as ElementId)
            .map(|e| {
                let (bx, by) = self.barycenter(e);
                let dx = bx - x;
                let dy = by - y;
                (dx * dx + dy * dy, e)
            })
            .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, element) in order {
            if self.triangle_contains(element, x, y) {
                return Location::Element(element);
            }
        }
        Location::Outside
    }

    /// Whether a triangle contains `(x, y)` (boundary included).
    ///
    /// Sign-consistent half-plane test, independent of the triangle's
    /// winding order.
    pub fn triangle_contains(&self, element: ElementId, x: f64, y: f64) -> bool {
        let [n1, n2, n3] = self.triangle_nodes(element);
        let (x1, y1) = self.node_coord(n1);
        let (x2, y2) = self.node_coord(n2);
        let (x3, y3) = self.node_coord(n3);

        let d1 = (x2 - x1) * (y - y1) - (y2 - y1) * (x - x1);
        let d2 = (x3 - x2) * (y - y2) - (y3 - y2) * (x - x2);
        let d3 = (x1 - x3) * (y - y3) - (y1 - y3) * (x - x3);

        let has_neg = d1 < -INSIDE_TOL || d2 < -INSIDE_TOL || d3 < -INSIDE_TOL;
        let has_pos = d1 > INSIDE_TOL || d2 > INSIDE_TOL || d3 > INSIDE_TOL;
        !(has_neg && has_pos)
    }

    /// The node closest to `(x, y)`; ties resolve to the lowest id.
    pub fn nearest_node(&self, x: f64, y: f64) -> NodeId {
        let mut nearest = 1;
        let mut best = f64::INFINITY;
        for node in 1..=self.nb_nodes() as NodeId {
            let (nx, ny) = self.node_coord(node);
            let dist = (nx - x) * (nx - x) + (ny - y) * (ny - y);
            if dist < best {
                best = dist;
                nearest = node;
            }
        }
        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::index::tests::unit_square_header;

    fn unit_square() -> MeshIndex {
        MeshIndex::build(&unit_square_header()).unwrap()
    }

    #[test]
    fn test_locate_inside_each_triangle() {
        let mesh = unit_square();
        assert_eq!(mesh.locate(0.25, 0.25), Location::Element(1));
        assert_eq!(mesh.locate(0.75, 0.75), Location::Element(2));
    }

    #[test]
    fn test_locate_outside() {
        let mesh = unit_square();
        assert_eq!(mesh.locate(2.0, 2.0), Location::Outside);
        assert_eq!(mesh.locate(-0.1, 0.5), Location::Outside);
        assert!(mesh.locate(2.0, 2.0).is_outside());
    }

    #[test]
    fn test_locate_on_shared_edge() {
        // The diagonal from (1,0) to (0,1) belongs to both triangles;
        // a point on it must locate somewhere, not fall outside.
        let mesh = unit_square();
        assert!(mesh.locate(0.5, 0.5).element().is_some());
    }

    #[test]
    fn test_locate_on_vertex() {
        let mesh = unit_square();
        assert!(!mesh.locate(0.0, 0.0).is_outside());
    }

    #[test]
    fn test_nearest_node() {
        let mesh = unit_square();
        assert_eq!(mesh.nearest_node(0.1, 0.1), 1);
        assert_eq!(mesh.nearest_node(0.9, -0.2), 2);
        assert_eq!(mesh.nearest_node(5.0, 5.0), 4);
    }

    #[test]
    fn test_nearest_node_tie_takes_lowest_id() {
        // The center is equidistant from all four nodes.
        let mesh = unit_square();
        assert_eq!(mesh.nearest_node(0.5, 0.5), 1);
    }
}
