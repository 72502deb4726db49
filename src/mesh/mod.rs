//! Derived 2D triangle mesh and spatial queries.
//!
//! This module provides:
//! - **MeshIndex**: the flattened 2D triangle view of a decoded header
//!   (identity for 2D files, bottom layer for 3D prisms) with barycenters
//!   and the triangle-neighbor table
//! - **Point location**: containing-element search with an explicit
//!   [`Location::Outside`] sentinel, and nearest-node lookup
//! - **Interpolation**: barycentric node weights with a nearest-node
//!   fallback for outside points, single point and batch
//! - **Transect walks**: a forward-only iterator of samples along a
//!   straight segment, crossing from triangle to triangle
//!
//! A [`MeshIndex`] is built once from a header snapshot and is immutable
//! afterwards; it holds its own copy of the coordinates, so it stays valid
//! whatever happens to the header. It is `Sync` and may be shared
//! read-only across threads; the query operations have no shared mutable
//! state.
//!
//! All node and element identifiers are 1-based, matching the Serafin
//! IKLE convention.

mod index;
mod interpolate;
mod locate;
mod transect;

pub use index::{ElementId, MeshError, MeshIndex, NodeId};
pub use interpolate::{NodeWeights, apply_weights};
pub use locate::Location;
pub use transect::{TransectSample, TransectWalk, TraversalError, cumulative_distances};
