//! Flattened triangle mesh derived from a header.

use std::collections::HashMap;

use thiserror::Error;

use crate::serafin::Header;

/// 1-based node identifier.
pub type NodeId = u32;

/// 1-based identifier of a 2D triangle.
pub type ElementId = u32;

/// Error building the derived mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// 3D element count not divisible by (plane count - 1)
    #[error("{nb_elements} elements is not divisible by {nb_planes} planes - 1")]
    ElementCount { nb_elements: usize, nb_planes: i32 },

    /// A connectivity entry points past the node set
    #[error("element {element} references node {node}, the mesh has {nb_nodes} nodes")]
    NodeOutOfRange {
        element: ElementId,
        node: NodeId,
        nb_nodes: usize,
    },

    /// More than two triangles share one edge
    #[error("edge ({n1}, {n2}) is shared by more than two triangles")]
    NonManifoldEdge { n1: NodeId, n2: NodeId },
}

/// Immutable 2D triangle view of a mesh: connectivity, barycenters and
/// the triangle-neighbor table.
///
/// For a 3D prism mesh the triangles are the bottom layer: the first
/// three nodes of each of the first `nb_elements / (nb_planes - 1)`
/// elements.
#[derive(Clone, Debug)]
pub struct MeshIndex {
    nb_nodes: usize,
    x: Vec<f64>,
    y: Vec<f64>,
    triangles: Vec<[NodeId; 3]>,
    barycenters: Vec<(f64, f64)>,
    neighbors: Vec<[Option<ElementId>; 3]>,
}

impl MeshIndex {
    /// Project the header's connectivity into triangles and derive
    /// barycenters and adjacency.
    pub fn build(header: &Header) -> Result<Self, MeshError> {
        let triangles = project_triangles(header)?;
        let nb_nodes = header.nb_nodes_2d();

        for (i, tri) in triangles.iter().enumerate() {
            for &node in tri {
                if node == 0 || node as usize > nb_nodes {
                    return Err(MeshError::NodeOutOfRange {
                        element: (i + 1) as ElementId,
                        node,
                        nb_nodes,
                    });
                }
            }
        }

        let x = header.x[..nb_nodes].to_vec();
        let y = header.y[..nb_nodes].to_vec();
        let barycenters = compute_barycenters(&triangles, &x, &y);
        let neighbors = compute_adjacency(&triangles)?;

        Ok(Self {
            nb_nodes,
            x,
            y,
            triangles,
            barycenters,
            neighbors,
        })
    }

    /// Number of 2D triangles.
    pub fn nb_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of nodes in the 2D plane.
    pub fn nb_nodes(&self) -> usize {
        self.nb_nodes
    }

    /// The three nodes of a triangle (1-based).
    pub fn triangle_nodes(&self, element: ElementId) -> [NodeId; 3] {
        self.triangles[(element - 1) as usize]
    }

    /// X and Y coordinates of a node (1-based).
    pub fn node_coord(&self, node: NodeId) -> (f64, f64) {
        let i = (node - 1) as usize;
        (self.x[i], self.y[i])
    }

    /// Barycenter of a triangle (1-based).
    pub fn barycenter(&self, element: ElementId) -> (f64, f64) {
        self.barycenters[(element - 1) as usize]
    }

    /// Neighbor across each edge of a triangle, in edge order
    /// (n0,n1), (n1,n2), (n2,n0); `None` on the outer boundary.
    pub fn neighbors(&self, element: ElementId) -> [Option<ElementId>; 3] {
        self.neighbors[(element - 1) as usize]
    }

    /// Node identifiers shared by two triangles.
    pub fn common_nodes(&self, a: ElementId, b: ElementId) -> Vec<NodeId> {
        let nodes_b = self.triangle_nodes(b);
        self.triangle_nodes(a)
            .into_iter()
            .filter(|n| nodes_b.contains(n))
            .collect()
    }
}

/// Identity reshape for 2D; bottom-layer slab for 3D.
fn project_triangles(header: &Header) -> Result<Vec<[NodeId; 3]>, MeshError> {
    let ndp = header.nb_nodes_per_elem;
    if header.is_2d() {
        let triangles = header
            .ikle
            .chunks_exact(ndp)
            .map(|row| [row[0], row[1], row[2]])
            .collect();
        return Ok(triangles);
    }

    let nb_planes = header.nb_planes();
    let nb_layers = nb_planes as usize - 1;
    let nb_triangles = header.nb_elements / nb_layers;
    if nb_triangles * nb_layers != header.nb_elements {
        return Err(MeshError::ElementCount {
            nb_elements: header.nb_elements,
            nb_planes,
        });
    }

    // First three columns of each bottom-layer prism
    let triangles = header
        .ikle
        .chunks_exact(ndp)
        .take(nb_triangles)
        .map(|row| [row[0], row[1], row[2]])
        .collect();
    Ok(triangles)
}

/// Per-triangle mean of its three nodes' coordinates.
fn compute_barycenters(triangles: &[[NodeId; 3]], x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    triangles
        .iter()
        .map(|tri| {
            let (mut bx, mut by) = (0.0, 0.0);
            for &node in tri {
                bx += x[(node - 1) as usize];
                by += y[(node - 1) as usize];
            }
            (bx / 3.0, by / 3.0)
        })
        .collect()
}

/// For each triangle edge, the unique other triangle sharing both nodes.
fn compute_adjacency(
    triangles: &[[NodeId; 3]],
) -> Result<Vec<[Option<ElementId>; 3]>, MeshError> {
    // Edge key (min, max) -> up to two (triangle, edge slot) owners
    let mut edge_owners: HashMap<(NodeId, NodeId), Vec<(usize, usize)>> =
        HashMap::with_capacity(triangles.len() * 3 / 2);
    for (t, tri) in triangles.iter().enumerate() {
        for slot in 0..3 {
            let (a, b) = (tri[slot], tri[(slot + 1) % 3]);
            let key = (a.min(b), a.max(b));
            edge_owners.entry(key).or_default().push((t, slot));
        }
    }

    let mut neighbors = vec![[None; 3]; triangles.len()];
    for ((n1, n2), owners) in edge_owners {
        match owners.as_slice() {
            [_] => {} // boundary edge
            [(t1, s1), (t2, s2)] => {
                neighbors[*t1][*s1] = Some((*t2 + 1) as ElementId);
                neighbors[*t2][*s2] = Some((*t1 + 1) as ElementId);
            }
            _ => return Err(MeshError::NonManifoldEdge { n1, n2 }),
        }
    }
    Ok(neighbors)
}
