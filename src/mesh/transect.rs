//! Transect walks: sampling a straight segment across the mesh.
//!
//! A walk yields the segment's two endpoints plus one sample per triangle
//! edge the segment crosses, in order. The samples carry node weights, so
//! a caller can pull per-frame values and integrate a cross-section (e.g.
//! trapezoidal discharge from depth and normal velocity); that integration
//! lives with the caller, not here.
//!
//! The walk advances through the triangle-neighbor table, never revisiting
//! the element it just left. When the segment passes near a vertex shared
//! by three or more triangles, the first crossing edge found is taken; the
//! choice among simultaneous crossings is not further disambiguated. An
//! endpoint sitting exactly on a shared edge is reported once, as the
//! endpoint sample; an endpoint exactly on a shared vertex keeps the
//! near-vertex ambiguity above and may fail with [`NoCrossingEdge`].
//!
//! [`NoCrossingEdge`]: TraversalError::NoCrossingEdge

use thiserror::Error;

use super::index::{ElementId, MeshIndex, NodeId};
use super::interpolate::NodeWeights;

/// A transect walk cannot continue; samples yielded before the error
/// remain valid.
#[derive(Debug, Error)]
pub enum TraversalError {
    /// A transect endpoint lies outside every mesh element
    #[error("transect endpoint ({x}, {y}) is outside the mesh")]
    OutsideMesh { x: f64, y: f64 },

    /// No neighbor edge of the current element crosses the segment
    #[error("no neighbor edge of element {element} crosses the transect")]
    NoCrossingEdge { element: ElementId },

    /// Two adjacent triangles do not share exactly two nodes
    #[error("elements {a} and {b} share {found} node(s), expected exactly 2")]
    SharedNodes {
        a: ElementId,
        b: ElementId,
        found: usize,
    },

    /// The walk did not reach the target element within the step limit
    #[error("transect walk exceeded {limit} steps without reaching the target")]
    StepLimit { limit: usize },
}

/// One transect sample: a position on the segment and its node weights.
#[derive(Clone, Debug, PartialEq)]
pub struct TransectSample {
    /// Position on the segment
    pub position: (f64, f64),
    /// Node weights at that position; two nodes on a crossed edge, three
    /// inside an endpoint's triangle, one for an outside endpoint
    pub weights: NodeWeights,
}

/// Cumulative distance along a sequence of samples, starting at 0.
pub fn cumulative_distances(samples: &[TransectSample]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(samples.len());
    let mut total = 0.0;
    for (i, sample) in samples.iter().enumerate() {
        if i > 0 {
            let (x0, y0) = samples[i - 1].position;
            let (x1, y1) = sample.position;
            total += ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        }
        distances.push(total);
    }
    distances
}

enum WalkState {
    AtStart,
    Traversing {
        current: ElementId,
        target: ElementId,
        previous: Option<ElementId>,
        steps: usize,
    },
    AtEnd,
    Failing(TraversalError),
    Done,
}

/// Finite, forward-only, non-restartable iterator of transect samples.
///
/// Yields `(A, weights)`, one `(intersection, weights)` per crossed edge,
/// then `(B, weights)`. A zero-length transect (`a == b` exactly) yields
/// the single sample at `a`. Cancellation is simply ceasing to pull
/// further elements.
pub struct TransectWalk<'a> {
    mesh: &'a MeshIndex,
    a: (f64, f64),
    b: (f64, f64),
    state: WalkState,
}

impl MeshIndex {
    /// Walk the straight segment from `a` to `b`.
    pub fn walk(&self, a: (f64, f64), b: (f64, f64)) -> TransectWalk<'_> {
        TransectWalk {
            mesh: self,
            a,
            b,
            state: WalkState::AtStart,
        }
    }
}

impl TransectWalk<'_> {
    fn start(&mut self) -> TransectSample {
        let (xa, ya) = self.a;
        let sample = TransectSample {
            position: self.a,
            weights: self.mesh.interpolate_point(xa, ya),
        };

        self.state = if self.a == self.b {
            // Degenerate zero-length transect: one sample only
            WalkState::Done
        } else {
            let (xb, yb) = self.b;
            match (
                self.mesh.locate(xa, ya).element(),
                self.mesh.locate(xb, yb).element(),
            ) {
                (None, _) => WalkState::Failing(TraversalError::OutsideMesh { x: xa, y: ya }),
                (_, None) => WalkState::Failing(TraversalError::OutsideMesh { x: xb, y: yb }),
                (Some(current), Some(target)) if current == target => WalkState::AtEnd,
                (Some(current), Some(target)) => WalkState::Traversing {
                    current,
                    target,
                    previous: None,
                    steps: 0,
                },
            }
        };
        sample
    }

    /// One traversal step: find the neighbor edge the segment crosses,
    /// move across it and produce the intersection sample.
    ///
    /// A crossing exactly at the transect's far endpoint produces no edge
    /// sample of its own (the endpoint sample covers it) and is taken only
    /// when it lands the walk in `target`.
    fn step(
        &self,
        current: ElementId,
        previous: Option<ElementId>,
        target: ElementId,
    ) -> Result<(Option<TransectSample>, ElementId), TraversalError> {
        for neighbor in self.mesh.neighbors(current).into_iter().flatten() {
            if Some(neighbor) == previous {
                continue;
            }
            let mut shared = self.mesh.common_nodes(current, neighbor);
            if shared.len() != 2 {
                return Err(TraversalError::SharedNodes {
                    a: current,
                    b: neighbor,
                    found: shared.len(),
                });
            }
            shared.sort();
            let (n1, n2) = (shared[0], shared[1]);

            if let Some((position, t, along_transect)) = self.crossing(n1, n2) {
                if along_transect < 1.0 {
                    let sample = TransectSample {
                        position,
                        weights: vec![(n1, 1.0 - t), (n2, t)],
                    };
                    return Ok((Some(sample), neighbor));
                }
                if neighbor == target {
                    return Ok((None, neighbor));
                }
            }
        }
        Err(TraversalError::NoCrossingEdge { element: current })
    }

    /// Intersection of the transect with the open edge `n1`-`n2`.
    ///
    /// Returns the intersection point, its normalized position `t` along
    /// the edge (0 at `n1`, 1 at `n2`) and its normalized position along
    /// the transect (which may equal 1 when the transect ends exactly on
    /// the edge), or `None` when the segments do not cross (parallel,
    /// disjoint, or merely touching a vertex).
    fn crossing(&self, n1: NodeId, n2: NodeId) -> Option<((f64, f64), f64, f64)> {
        let (xa, ya) = self.a;
        let (xb, yb) = self.b;
        let (x1, y1) = self.mesh.node_coord(n1);
        let (x2, y2) = self.mesh.node_coord(n2);

        let (rx, ry) = (xb - xa, yb - ya);
        let (sx, sy) = (x2 - x1, y2 - y1);
        let denom = rx * sy - ry * sx;
        if denom == 0.0 {
            return None; // parallel or collinear
        }

        let (qx, qy) = (x1 - xa, y1 - ya);
        let along_transect = (qx * sy - qy * sx) / denom;
        let along_edge = (qx * ry - qy * rx) / denom;
        if !(0.0 < along_transect && along_transect <= 1.0)
            || !(0.0 < along_edge && along_edge < 1.0)
        {
            return None;
        }
        let position = (x1 + along_edge * sx, y1 + along_edge * sy);
        Some((position, along_edge, along_transect))
    }
}

impl Iterator for TransectWalk<'_> {
    type Item = Result<TransectSample, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, WalkState::Done) {
            WalkState::AtStart => Some(Ok(self.start())),
            WalkState::Traversing {
                current,
                target,
                previous,
                steps,
            } => {
                // Excluding the previous element prevents immediate
                // backtracking but not larger cycles on degenerate
                // adjacency; the step limit bounds those.
                let limit = 2 * self.mesh.nb_triangles();
                if steps >= limit {
                    return Some(Err(TraversalError::StepLimit { limit }));
                }
                match self.step(current, previous, target) {
                    Ok((sample, next_element)) => {
                        self.state = if next_element == target {
                            WalkState::AtEnd
                        } else {
                            WalkState::Traversing {
                                current: next_element,
                                target,
                                previous: Some(current),
                                steps: steps + 1,
                            }
                        };
                        match sample {
                            Some(sample) => Some(Ok(sample)),
                            // Crossing at B itself: go straight to the
                            // endpoint sample.
                            None => self.next(),
                        }
                    }
                    Err(err) => Some(Err(err)),
                }
            }
            WalkState::AtEnd => {
                let (xb, yb) = self.b;
                Some(Ok(TransectSample {
                    position: self.b,
                    weights: self.mesh.interpolate_point(xb, yb),
                }))
            }
            WalkState::Failing(err) => Some(Err(err)),
            WalkState::Done => None,
        }
    }
}
