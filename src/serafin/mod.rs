//! Serafin binary format I/O.
//!
//! The Serafin format stores a time series of scalar fields on an
//! unstructured mesh as a fixed-layout header followed by consecutive
//! frames. Every record is framed Fortran-style: a big-endian 4-byte
//! length marker before and after the payload.
//!
//! ## File Layout
//!
//! ```text
//! +--------------------------------------------------+
//! | title (72 bytes) + file-type tag (8 bytes)       |
//! | nb_var, nb_var_quadratic (2 x i32)               |
//! | per variable: name (16 bytes) + unit (16 bytes)  |
//! | parameters (10 x i32)                            |
//! | start date (6 x i32, only if param[9] == 1)      |
//! | nb_elements, nb_nodes, ndp, magic (4 x i32)      |
//! | IKLE connectivity (nb_elements * ndp x i32)      |
//! | IPOBO boundary markers (nb_nodes x i32)          |
//! | X coordinates (nb_nodes floats)                  |
//! | Y coordinates (nb_nodes floats)                  |
//! +--------------------------------------------------+
//! | frame 0: time (f32), one record per variable     |
//! | frame 1: ...                                     |
//! +--------------------------------------------------+
//! ```
//!
//! The file-type tag selects the element width: `"SERAFIN "` stores values
//! as big-endian f32, `"SERAFIND"` as big-endian f64. The time-stamp record
//! of each frame is a fixed 12 bytes (f32) in both variants.
//!
//! All node and element indices crossing this module's API are 1-based,
//! matching the on-disk IKLE convention.
//!
//! Streams are plain `Read + Seek` handles owned by the caller; dropping
//! the handle releases the file on every exit path. The codec functions
//! are stateless and never retain the stream.

mod error;
pub mod frames;
mod header;
mod records;
mod variables;

pub use error::{FormatError, RequestError, SerafinError};
pub use header::{FloatKind, Header, Sizes, Variable, decode, encode};
pub use variables::VariableCatalogue;
