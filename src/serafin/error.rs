//! Error types for Serafin file operations.

use thiserror::Error;

/// Structural violation of the binary layout.
///
/// Decoding aborts on the first such error; no partial header is returned.
#[derive(Debug, Error)]
pub enum FormatError {
    /// IO error reading or writing the stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File-type tag is neither "SERAFIN " nor "SERAFIND"
    #[error("unknown file-type tag {0:?} (expected \"SERAFIN \" or \"SERAFIND\")")]
    UnknownFileType(String),

    /// A declared count field is negative
    #[error("{field} is {value}, expected a non-negative count")]
    BadCount { field: &'static str, value: i32 },

    /// The quadratic variable count must be zero
    #[error("number of quadratic variables is {0}, expected 0")]
    QuadraticVariables(i32),

    /// The magic validation integer must equal 1
    #[error("magic number is {0}, expected 1")]
    BadMagic(i32),

    /// Nodes per element inconsistent with the 2D/3D determination
    #[error(
        "{found} nodes per element but {nb_planes} plane(s): \
         a 2D mesh requires 3, a 3D mesh requires 6"
    )]
    NodesPerElement { found: i32, nb_planes: i32 },

    /// A 3D file must declare at least 2 planes
    #[error("number of planes is {0}, a 3D file requires at least 2")]
    PlaneCount(i32),

    /// 3D element count not divisible by (plane count - 1)
    #[error("{nb_elements} elements is not divisible by {nb_planes} planes - 1")]
    ElementCount { nb_elements: usize, nb_planes: i32 },

    /// File size is not header_size + n * frame_size for integer n
    #[error(
        "file size {file_size} does not match header size {header_size} \
         plus a whole number of {frame_size}-byte frames"
    )]
    FrameSizeMismatch {
        file_size: u64,
        header_size: u64,
        frame_size: u64,
    },

    /// A fixed-width text field exceeds its on-disk width (encode only)
    #[error("{field} {value:?} is longer than {limit} characters")]
    FieldTooLong {
        field: &'static str,
        value: String,
        limit: usize,
    },

    /// Frame values do not cover the declared variable catalogue
    #[error("frame carries {found} variable(s), the header declares {expected}")]
    VariableCountMismatch { expected: usize, found: usize },

    /// A variable record does not hold one value per node
    #[error("variable {id:?} carries {found} value(s), the mesh has {nb_nodes} nodes")]
    ValueCountMismatch {
        id: String,
        found: usize,
        nb_nodes: usize,
    },
}

/// A per-call lookup failure; retained state is untouched.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Requested variable identifier is absent from the header catalogue
    #[error("unknown variable {id:?}, possible variables are {available:?}")]
    UnknownVariable { id: String, available: Vec<String> },

    /// Requested time value is not present in the time index (exact match)
    #[error("no frame at time {0}")]
    UnknownTime(f64),

    /// Requested frame index is past the end of the file
    #[error("frame index {index} out of range, the file has {nb_frames} frame(s)")]
    FrameOutOfRange { index: usize, nb_frames: usize },
}

/// Combined error for operations that can fail either way.
#[derive(Debug, Error)]
pub enum SerafinError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl From<std::io::Error> for SerafinError {
    fn from(err: std::io::Error) -> Self {
        SerafinError::Format(FormatError::Io(err))
    }
}
