//! # serafin-rs
//!
//! A library for reading and writing Serafin (Telemac) result files and
//! sampling their unstructured triangular meshes.
//!
//! This crate provides the core building blocks for post-processing
//! hydrodynamic results:
//! - Binary header codec for the Serafin format (2D and 3D, single and
//!   double precision)
//! - Random-access frame reads with O(1) seek arithmetic, plus frame append
//! - Variable catalogue mapping file variable names to short identifiers
//! - Derived 2D triangle mesh (barycenters, neighbor adjacency)
//! - Point location and barycentric interpolation
//! - Transect walks across the mesh for cross-section sampling
//!
//! ## Example
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use serafin_rs::serafin::{decode, frames, VariableCatalogue};
//! use serafin_rs::mesh::MeshIndex;
//!
//! let file = File::open("r2d.slf").unwrap();
//! let mut reader = BufReader::new(file);
//! let header = decode(&mut reader, &VariableCatalogue::default()).unwrap();
//! let sizes = header.compute_sizes();
//! let time = frames::index_time(&mut reader, &sizes).unwrap();
//! let depth = frames::read_frame_var(&mut reader, &header, &sizes, 0, "H").unwrap();
//!
//! let mesh = MeshIndex::build(&header).unwrap();
//! let weights = mesh.interpolate_point(12.5, 3.75);
//! # let _ = (time, depth, weights);
//! ```

pub mod mesh;
pub mod serafin;

// Re-export main types for convenience
pub use mesh::{
    Location, MeshError, MeshIndex, TransectSample, TransectWalk, TraversalError, apply_weights,
    cumulative_distances,
};
pub use serafin::{
    FloatKind, FormatError, Header, RequestError, SerafinError, Sizes, Variable,
    VariableCatalogue, decode, encode,
};
