//! Serafin header codec.
//!
//! [`decode`] and [`encode`] are stateless: they advance the stream past
//! the header and retain nothing. [`Header::compute_sizes`] derives the
//! exact header and frame byte counts that [`super::frames`] uses for
//! random access.

use std::io::{Read, Write};

use log::debug;

use super::error::FormatError;
use super::records;
use super::variables::VariableCatalogue;

/// Element width selected by the file-type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatKind {
    /// `"SERAFIN "`: values stored as big-endian f32
    Single,
    /// `"SERAFIND"`: values stored as big-endian f64
    Double,
}

impl FloatKind {
    /// Element width in bytes (4 or 8).
    pub fn width(self) -> usize {
        match self {
            FloatKind::Single => 4,
            FloatKind::Double => 8,
        }
    }

    /// The 8-byte file-type tag.
    pub fn tag(self) -> &'static str {
        match self {
            FloatKind::Single => "SERAFIN ",
            FloatKind::Double => "SERAFIND",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "SERAFIN" | "SERAFIN " => Some(FloatKind::Single),
            "SERAFIND" => Some(FloatKind::Double),
            _ => None,
        }
    }
}

/// One declared variable: on-disk name/unit plus the resolved identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// 16-byte on-disk name, trailing blanks trimmed
    pub name: String,
    /// 16-byte on-disk unit, trailing blanks trimmed
    pub unit: String,
    /// Short identifier from the catalogue, or the trimmed name when the
    /// catalogue has no entry for it
    pub id: String,
}

/// Derived byte counts for random frame access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sizes {
    /// Exact byte count of the header, framing included
    pub header_size: u64,
    /// Byte count of one frame: 12-byte time record plus one framed
    /// record of `nb_nodes` values per variable
    pub frame_size: u64,
}

/// Decoded file-wide metadata and mesh geometry.
///
/// Node and element indices are 1-based everywhere, matching the on-disk
/// IKLE convention. Coordinates are widened to f64 on read and narrowed
/// back to the variant's element width on write.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// Title, at most 72 characters, trailing blanks trimmed
    pub title: String,
    /// Element width variant
    pub float_kind: FloatKind,
    /// Declared variables, in file order
    pub variables: Vec<Variable>,
    /// The ten reserved integer parameters; `params[6]` is the plane
    /// count, `params[9]` the date flag
    pub params: [i32; 10],
    /// Simulation start date, present iff `params[9] == 1`
    pub date: Option<[i32; 6]>,
    /// Number of elements (3D: prisms over all layers)
    pub nb_elements: usize,
    /// Number of nodes (3D: over all planes)
    pub nb_nodes: usize,
    /// Nodes per element: 3 for 2D triangles, 6 for 3D prisms
    pub nb_nodes_per_elem: usize,
    /// Connectivity, one row of `nb_nodes_per_elem` 1-based node ids per
    /// element, flattened row-major
    pub ikle: Vec<u32>,
    /// Boundary-point markers, one per node
    pub ipobo: Vec<i32>,
    /// Node X coordinates
    pub x: Vec<f64>,
    /// Node Y coordinates
    pub y: Vec<f64>,
}

impl Header {
    /// Number of declared variables.
    pub fn nb_var(&self) -> usize {
        self.variables.len()
    }

    /// Plane count; 0 for a 2D file.
    pub fn nb_planes(&self) -> i32 {
        self.params[6]
    }

    /// A file is 2D iff its plane count is zero.
    pub fn is_2d(&self) -> bool {
        self.nb_planes() == 0
    }

    /// Number of nodes in one horizontal plane.
    pub fn nb_nodes_2d(&self) -> usize {
        if self.is_2d() {
            self.nb_nodes
        } else {
            self.nb_nodes / self.nb_planes() as usize
        }
    }

    /// Position of a variable in the declared order, by identifier.
    pub fn var_position(&self, id: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.id == id)
    }

    /// Declared variable identifiers, in file order.
    pub fn var_ids(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.id.clone()).collect()
    }

    /// X and Y coordinates of a node (1-based).
    pub fn node_coord(&self, node: u32) -> (f64, f64) {
        let i = (node - 1) as usize;
        (self.x[i], self.y[i])
    }

    /// Derive the exact header and frame sizes.
    ///
    /// The header size is the sum of every fixed field width plus 8 bytes
    /// of framing per record; the frame size is the fixed 12-byte time
    /// record plus one framed record of `nb_nodes` values per variable.
    pub fn compute_sizes(&self) -> Sizes {
        let w = self.float_kind.width() as u64;
        let nb_var = self.nb_var() as u64;
        let nb_nodes = self.nb_nodes as u64;
        let ikle_bytes = 4 * (self.nb_elements * self.nb_nodes_per_elem) as u64;
        let date_bytes = if self.date.is_some() { 24 + 8 } else { 0 };

        let header_size = (80 + 8)
            + (8 + 8)
            + nb_var * (32 + 8)
            + (40 + 8)
            + date_bytes
            + (16 + 8)
            + (ikle_bytes + 8)
            + (4 * nb_nodes + 8)
            + 2 * (w * nb_nodes + 8);
        let frame_size = 12 + nb_var * (8 + w * nb_nodes);

        Sizes {
            header_size,
            frame_size,
        }
    }

    /// Derive a header for writing with a different variable set, keeping
    /// the mesh, parameters and date.
    ///
    /// Each identifier is resolved through the catalogue; identifiers the
    /// catalogue does not know are written with the identifier itself as
    /// name and an empty unit.
    pub fn copy_with_variables(
        &self,
        catalogue: &VariableCatalogue,
        ids: &[&str],
    ) -> Result<Header, FormatError> {
        let mut variables = Vec::with_capacity(ids.len());
        for id in ids {
            let (name, unit) = match catalogue.by_id(id) {
                Some(entry) => (entry.name.clone(), entry.unit.clone()),
                None => (id.to_string(), String::new()),
            };
            if name.len() > 16 {
                return Err(FormatError::FieldTooLong {
                    field: "variable name",
                    value: name,
                    limit: 16,
                });
            }
            variables.push(Variable {
                name,
                unit,
                id: id.to_string(),
            });
        }
        Ok(Header {
            variables,
            ..self.clone()
        })
    }

    /// Whether two headers describe the same mesh (type and counts).
    pub fn same_mesh(&self, other: &Header) -> bool {
        self.is_2d() == other.is_2d()
            && self.nb_nodes == other.nb_nodes
            && self.nb_elements == other.nb_elements
    }

    /// Variable identifiers declared by both headers, in this header's order.
    pub fn common_variables(&self, other: &Header) -> Vec<String> {
        self.variables
            .iter()
            .filter(|v| other.var_position(&v.id).is_some())
            .map(|v| v.id.clone())
            .collect()
    }

    /// Shift all node coordinates by `(dx, dy)`.
    ///
    /// Any [`crate::mesh::MeshIndex`] built from this header must be
    /// rebuilt afterwards.
    pub fn shift(&mut self, dx: f64, dy: f64) {
        for x in &mut self.x {
            *x += dx;
        }
        for y in &mut self.y {
            *y += dy;
        }
    }

    /// Rotate all node coordinates around `center` by `angle_deg` degrees
    /// counter-clockwise.
    pub fn rotate(&mut self, center: (f64, f64), angle_deg: f64) {
        let (xc, yc) = center;
        let angle = angle_deg.to_radians();
        let (sin, cos) = angle.sin_cos();
        for i in 0..self.nb_nodes {
            let (x, y) = (self.x[i], self.y[i]);
            self.x[i] = xc + (x - xc) * cos - (y - yc) * sin;
            self.y[i] = yc + (x - xc) * sin + (y - yc) * cos;
        }
    }

    /// Scale all node coordinates about `center` by `ratio`.
    pub fn homothety(&mut self, center: (f64, f64), ratio: f64) {
        let (xc, yc) = center;
        for x in &mut self.x {
            *x = xc + ratio * (*x - xc);
        }
        for y in &mut self.y {
            *y = yc + ratio * (*y - yc);
        }
    }
}

/// Decode a Serafin header from the current stream position.
///
/// Reads the fixed record sequence, validates the structural invariants
/// and resolves variable identifiers through `catalogue`. On error the
/// stream position is unspecified and no partial header is returned.
pub fn decode<R: Read>(
    reader: &mut R,
    catalogue: &VariableCatalogue,
) -> Result<Header, FormatError> {
    // Title and file-type tag
    records::skip_marker(reader)?;
    let title = records::read_fixed_str(reader, 72)?;
    let tag = records::read_fixed_str(reader, 8)?;
    records::skip_marker(reader)?;
    let float_kind =
        FloatKind::from_tag(&tag).ok_or_else(|| FormatError::UnknownFileType(tag.clone()))?;
    debug!("file type {:?}, title {:?}", float_kind, title);

    // Linear and quadratic variable counts
    records::skip_marker(reader)?;
    let nb_var = records::read_i32(reader)?;
    let nb_var_quadratic = records::read_i32(reader)?;
    records::skip_marker(reader)?;
    if nb_var_quadratic != 0 {
        return Err(FormatError::QuadraticVariables(nb_var_quadratic));
    }
    if nb_var < 0 {
        return Err(FormatError::BadCount {
            field: "number of variables",
            value: nb_var,
        });
    }

    // Variable names and units
    let mut raw_names = Vec::with_capacity(nb_var as usize);
    for _ in 0..nb_var {
        records::skip_marker(reader)?;
        let name = records::read_fixed_str(reader, 16)?;
        let unit = records::read_fixed_str(reader, 16)?;
        records::skip_marker(reader)?;
        raw_names.push((name, unit));
    }

    // The ten reserved parameters
    records::skip_marker(reader)?;
    let raw_params = records::read_i32_array(reader, 10)?;
    records::skip_marker(reader)?;
    let mut params = [0i32; 10];
    params.copy_from_slice(&raw_params);
    let nb_planes = params[6];

    // Optional start date
    let date = if params[9] == 1 {
        records::skip_marker(reader)?;
        let raw_date = records::read_i32_array(reader, 6)?;
        records::skip_marker(reader)?;
        let mut date = [0i32; 6];
        date.copy_from_slice(&raw_date);
        Some(date)
    } else {
        None
    };

    // Mesh sizes and the magic check
    records::skip_marker(reader)?;
    let nb_elements = records::read_i32(reader)?;
    let nb_nodes = records::read_i32(reader)?;
    let nb_nodes_per_elem = records::read_i32(reader)?;
    let magic = records::read_i32(reader)?;
    records::skip_marker(reader)?;
    if magic != 1 {
        return Err(FormatError::BadMagic(magic));
    }
    if nb_elements < 0 {
        return Err(FormatError::BadCount {
            field: "number of elements",
            value: nb_elements,
        });
    }
    if nb_nodes < 0 {
        return Err(FormatError::BadCount {
            field: "number of nodes",
            value: nb_nodes,
        });
    }

    // Consistency of nodes-per-element with the 2D/3D determination
    let is_2d = nb_planes == 0;
    if is_2d {
        if nb_nodes_per_elem != 3 {
            return Err(FormatError::NodesPerElement {
                found: nb_nodes_per_elem,
                nb_planes,
            });
        }
    } else {
        if nb_nodes_per_elem != 6 {
            return Err(FormatError::NodesPerElement {
                found: nb_nodes_per_elem,
                nb_planes,
            });
        }
        if nb_planes < 2 {
            return Err(FormatError::PlaneCount(nb_planes));
        }
        if nb_elements as usize % (nb_planes as usize - 1) != 0 {
            return Err(FormatError::ElementCount {
                nb_elements: nb_elements as usize,
                nb_planes,
            });
        }
    }
    let nb_elements = nb_elements as usize;
    let nb_nodes = nb_nodes as usize;
    let nb_nodes_per_elem = nb_nodes_per_elem as usize;

    // IKLE connectivity
    records::skip_marker(reader)?;
    let raw_ikle = records::read_i32_array(reader, nb_elements * nb_nodes_per_elem)?;
    records::skip_marker(reader)?;
    let ikle: Vec<u32> = raw_ikle.into_iter().map(|v| v as u32).collect();

    // IPOBO boundary markers
    records::skip_marker(reader)?;
    let ipobo = records::read_i32_array(reader, nb_nodes)?;
    records::skip_marker(reader)?;

    // Coordinates
    let width = float_kind.width();
    records::skip_marker(reader)?;
    let x = records::read_float_array(reader, nb_nodes, width)?;
    records::skip_marker(reader)?;
    records::skip_marker(reader)?;
    let y = records::read_float_array(reader, nb_nodes, width)?;
    records::skip_marker(reader)?;

    // Resolve variable identifiers; names the catalogue does not know
    // keep their trimmed name as identifier.
    let variables = raw_names
        .into_iter()
        .map(|(name, unit)| {
            let id = catalogue
                .resolve(&name)
                .map(|e| e.id.clone())
                .unwrap_or_else(|| name.clone());
            Variable { name, unit, id }
        })
        .collect();

    debug!(
        "decoded {} header: {} elements, {} nodes, {} plane(s)",
        if is_2d { "2D" } else { "3D" },
        nb_elements,
        nb_nodes,
        nb_planes
    );

    Ok(Header {
        title,
        float_kind,
        variables,
        params,
        date,
        nb_elements,
        nb_nodes,
        nb_nodes_per_elem,
        ikle,
        ipobo,
        x,
        y,
    })
}

/// Encode a Serafin header at the current stream position.
///
/// Writes the identical record layout [`decode`] expects, with symmetric
/// record-length markers around every payload.
pub fn encode<W: Write>(header: &Header, writer: &mut W) -> Result<(), FormatError> {
    if header.title.len() > 72 {
        return Err(FormatError::FieldTooLong {
            field: "title",
            value: header.title.clone(),
            limit: 72,
        });
    }
    for variable in &header.variables {
        if variable.name.len() > 16 {
            return Err(FormatError::FieldTooLong {
                field: "variable name",
                value: variable.name.clone(),
                limit: 16,
            });
        }
        if variable.unit.len() > 16 {
            return Err(FormatError::FieldTooLong {
                field: "variable unit",
                value: variable.unit.clone(),
                limit: 16,
            });
        }
    }

    // Title and file-type tag
    records::write_marker(writer, 80)?;
    records::write_fixed_str(writer, &header.title, 72)?;
    records::write_fixed_str(writer, header.float_kind.tag(), 8)?;
    records::write_marker(writer, 80)?;

    // Variable counts; the quadratic count is always zero
    records::write_i32_record(writer, &[header.nb_var() as i32, 0])?;

    // Variable names and units
    for variable in &header.variables {
        records::write_marker(writer, 32)?;
        records::write_fixed_str(writer, &variable.name, 16)?;
        records::write_fixed_str(writer, &variable.unit, 16)?;
        records::write_marker(writer, 32)?;
    }

    // Parameters and optional date; the date flag must agree with the
    // date's presence, so it is rewritten here.
    let mut params = header.params;
    params[9] = if header.date.is_some() { 1 } else { 0 };
    records::write_i32_record(writer, &params)?;
    if let Some(date) = header.date {
        records::write_i32_record(writer, &date)?;
    }

    // Mesh sizes and the magic integer
    records::write_i32_record(
        writer,
        &[
            header.nb_elements as i32,
            header.nb_nodes as i32,
            header.nb_nodes_per_elem as i32,
            1,
        ],
    )?;

    // IKLE, IPOBO, X, Y
    let ikle: Vec<i32> = header.ikle.iter().map(|&v| v as i32).collect();
    records::write_i32_record(writer, &ikle)?;
    records::write_i32_record(writer, &header.ipobo)?;
    let width = header.float_kind.width();
    records::write_float_record(writer, &header.x, width)?;
    records::write_float_record(writer, &header.y, width)?;

    Ok(())
}
