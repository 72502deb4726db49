//! Random-access frame reads and appends.
//!
//! Frames are stored consecutively after the header; every read seeks
//! directly to its target using the derived [`Sizes`], so reading one
//! variable of one frame never materializes anything else. Nothing is
//! cached between calls: each function is a plain seek-then-read against
//! the caller's stream handle.

use std::io::{Read, Seek, SeekFrom, Write};

use log::{debug, info};

use super::error::{FormatError, RequestError, SerafinError};
use super::header::{Header, Sizes};
use super::records;

/// Scan the frame boundaries and return the time value of every frame.
///
/// Fails with [`FormatError::FrameSizeMismatch`] when the byte count after
/// the header is not an exact multiple of the frame size.
pub fn index_time<R: Read + Seek>(reader: &mut R, sizes: &Sizes) -> Result<Vec<f64>, FormatError> {
    let file_size = reader.seek(SeekFrom::End(0))?;
    let data_size = file_size.checked_sub(sizes.header_size).ok_or(
        FormatError::FrameSizeMismatch {
            file_size,
            header_size: sizes.header_size,
            frame_size: sizes.frame_size,
        },
    )?;
    let nb_frames = data_size / sizes.frame_size;
    if nb_frames * sizes.frame_size != data_size {
        return Err(FormatError::FrameSizeMismatch {
            file_size,
            header_size: sizes.header_size,
            frame_size: sizes.frame_size,
        });
    }

    reader.seek(SeekFrom::Start(sizes.header_size))?;
    let mut time = Vec::with_capacity(nb_frames as usize);
    for _ in 0..nb_frames {
        records::skip_marker(reader)?;
        time.push(records::read_f32(reader)? as f64);
        records::skip_marker(reader)?;
        reader.seek(SeekFrom::Current(sizes.frame_size as i64 - 12))?;
    }
    debug!("indexed {} frame(s)", time.len());
    Ok(time)
}

/// Position of an exactly matching time value in the time index.
///
/// No tolerance and no interpolation across frames: the requested value
/// must compare equal to an indexed one.
pub fn frame_at_time(time_index: &[f64], time: f64) -> Result<usize, RequestError> {
    time_index
        .iter()
        .position(|&t| t == time)
        .ok_or(RequestError::UnknownTime(time))
}

/// Read one variable of one frame, by frame index.
pub fn read_frame_var<R: Read + Seek>(
    reader: &mut R,
    header: &Header,
    sizes: &Sizes,
    frame_index: usize,
    var_id: &str,
) -> Result<Vec<f64>, SerafinError> {
    let values = read_frame_vars(reader, header, sizes, frame_index, &[var_id])?;
    Ok(values.into_iter().next().unwrap())
}

/// Read a subset of variables of one frame, by frame index.
///
/// Returns one row of `nb_nodes` values per requested identifier, in the
/// requested order. Each variable is read with a direct seek; variables
/// outside the subset are never touched.
pub fn read_frame_vars<R: Read + Seek>(
    reader: &mut R,
    header: &Header,
    sizes: &Sizes,
    frame_index: usize,
    var_ids: &[&str],
) -> Result<Vec<Vec<f64>>, SerafinError> {
    check_frame_index(reader, sizes, frame_index)?;

    let positions: Vec<usize> = var_ids
        .iter()
        .map(|id| {
            header
                .var_position(id)
                .ok_or_else(|| RequestError::UnknownVariable {
                    id: id.to_string(),
                    available: header.var_ids(),
                })
        })
        .collect::<Result<_, _>>()?;

    let width = header.float_kind.width() as u64;
    let nb_nodes = header.nb_nodes;
    let frame_start = sizes.header_size + frame_index as u64 * sizes.frame_size;

    let mut values = Vec::with_capacity(var_ids.len());
    for (id, position) in var_ids.iter().zip(positions) {
        debug!("reading variable {:?} in frame {}", id, frame_index);
        let offset = frame_start + 12 + position as u64 * (8 + width * nb_nodes as u64);
        reader.seek(SeekFrom::Start(offset))?;
        records::skip_marker(reader).map_err(FormatError::Io)?;
        let row = records::read_float_array(reader, nb_nodes, width as usize)
            .map_err(FormatError::Io)?;
        values.push(row);
    }
    Ok(values)
}

/// Read every declared variable of one frame, by frame index.
pub fn read_frame<R: Read + Seek>(
    reader: &mut R,
    header: &Header,
    sizes: &Sizes,
    frame_index: usize,
) -> Result<Vec<Vec<f64>>, SerafinError> {
    let ids = header.var_ids();
    let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
    read_frame_vars(reader, header, sizes, frame_index, &ids)
}

/// Read one variable of the frame with the given exact time value.
pub fn read_var_at_time<R: Read + Seek>(
    reader: &mut R,
    header: &Header,
    sizes: &Sizes,
    time_index: &[f64],
    time: f64,
    var_id: &str,
) -> Result<Vec<f64>, SerafinError> {
    info!("reading variable {:?} at time {}", var_id, time);
    let frame_index = frame_at_time(time_index, time)?;
    read_frame_var(reader, header, sizes, frame_index, var_id)
}

/// Time values present in both indexes, in `a`'s order.
///
/// Supports differencing two result files frame by frame; matching is
/// exact, like [`frame_at_time`].
pub fn common_times(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().copied().filter(|t| b.contains(t)).collect()
}

/// Append one frame at the current write position.
///
/// `values` must hold one row of `nb_nodes` values per declared variable,
/// in declared order; partial frames are not supported. Callers wanting a
/// different variable set write through a header derived with
/// [`Header::copy_with_variables`].
pub fn write_frame<W: Write>(
    writer: &mut W,
    header: &Header,
    time: f64,
    values: &[Vec<f64>],
) -> Result<(), FormatError> {
    if values.len() != header.nb_var() {
        return Err(FormatError::VariableCountMismatch {
            expected: header.nb_var(),
            found: values.len(),
        });
    }
    for (variable, row) in header.variables.iter().zip(values) {
        if row.len() != header.nb_nodes {
            return Err(FormatError::ValueCountMismatch {
                id: variable.id.clone(),
                found: row.len(),
                nb_nodes: header.nb_nodes,
            });
        }
    }

    // Fixed 12-byte time record, f32 in both variants
    records::write_marker(writer, 4)?;
    records::write_f32(writer, time as f32)?;
    records::write_marker(writer, 4)?;

    let width = header.float_kind.width();
    for row in values {
        records::write_float_record(writer, row, width)?;
    }
    Ok(())
}

/// Bounds-check a frame index against the stream length.
fn check_frame_index<R: Read + Seek>(
    reader: &mut R,
    sizes: &Sizes,
    frame_index: usize,
) -> Result<(), SerafinError> {
    let file_size = reader.seek(SeekFrom::End(0)).map_err(FormatError::Io)?;
    let nb_frames =
        (file_size.saturating_sub(sizes.header_size) / sizes.frame_size) as usize;
    if frame_index >= nb_frames {
        return Err(RequestError::FrameOutOfRange {
            index: frame_index,
            nb_frames,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serafin::header::{FloatKind, Header, Variable, encode};
    use std::io::Cursor;

    fn two_frame_file(float_kind: FloatKind) -> (Header, Cursor<Vec<u8>>) {
        let header = Header {
            title: "frame tests".to_string(),
            float_kind,
            variables: vec![
                Variable {
                    name: "WATER DEPTH".to_string(),
                    unit: "M".to_string(),
                    id: "H".to_string(),
                },
                Variable {
                    name: "VELOCITY U".to_string(),
                    unit: "M/S".to_string(),
                    id: "U".to_string(),
                },
            ],
            params: [0; 10],
            date: None,
            nb_elements: 2,
            nb_nodes: 4,
            nb_nodes_per_elem: 3,
            ikle: vec![1, 2, 3, 2, 4, 3],
            ipobo: vec![1, 2, 3, 4],
            x: vec![0.0, 1.0, 0.0, 1.0],
            y: vec![0.0, 0.0, 1.0, 1.0],
        };

        let mut buf = Vec::new();
        encode(&header, &mut buf).unwrap();
        write_frame(
            &mut buf,
            &header,
            0.0,
            &[vec![1.0, 1.0, 1.0, 1.0], vec![0.5, 0.5, 0.5, 0.5]],
        )
        .unwrap();
        write_frame(
            &mut buf,
            &header,
            1.0,
            &[vec![2.0, 2.0, 2.0, 2.0], vec![0.25, 0.25, 0.25, 0.25]],
        )
        .unwrap();
        (header, Cursor::new(buf))
    }

    #[test]
    fn test_index_time() {
        for float_kind in [FloatKind::Single, FloatKind::Double] {
            let (header, mut stream) = two_frame_file(float_kind);
            let sizes = header.compute_sizes();
            let time = index_time(&mut stream, &sizes).unwrap();
            assert_eq!(time, vec![0.0, 1.0]);
        }
    }

    #[test]
    fn test_truncated_file_fails() {
        let (header, stream) = two_frame_file(FloatKind::Single);
        let sizes = header.compute_sizes();
        let mut buf = stream.into_inner();
        buf.pop(); // one byte short of a whole frame
        match index_time(&mut Cursor::new(buf), &sizes) {
            Err(FormatError::FrameSizeMismatch { .. }) => {}
            other => panic!("expected FrameSizeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_read_subset_in_any_order() {
        let (header, mut stream) = two_frame_file(FloatKind::Single);
        let sizes = header.compute_sizes();

        // Request order differs from declared order
        let values = read_frame_vars(&mut stream, &header, &sizes, 1, &["U", "H"]).unwrap();
        assert_eq!(values[0], vec![0.25, 0.25, 0.25, 0.25]);
        assert_eq!(values[1], vec![2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_read_full_frame_double_precision() {
        let (header, mut stream) = two_frame_file(FloatKind::Double);
        let sizes = header.compute_sizes();
        let values = read_frame(&mut stream, &header, &sizes, 0).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], vec![1.0; 4]);
        assert_eq!(values[1], vec![0.5; 4]);
    }

    #[test]
    fn test_read_by_time_exact_match_only() {
        let (header, mut stream) = two_frame_file(FloatKind::Single);
        let sizes = header.compute_sizes();
        let time = index_time(&mut stream, &sizes).unwrap();

        let h = read_var_at_time(&mut stream, &header, &sizes, &time, 1.0, "H").unwrap();
        assert_eq!(h, vec![2.0; 4]);

        match read_var_at_time(&mut stream, &header, &sizes, &time, 0.5, "H") {
            Err(SerafinError::Request(RequestError::UnknownTime(t))) => assert_eq!(t, 0.5),
            other => panic!("expected UnknownTime, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_variable_lists_available() {
        let (header, mut stream) = two_frame_file(FloatKind::Single);
        let sizes = header.compute_sizes();
        match read_frame_var(&mut stream, &header, &sizes, 0, "V") {
            Err(SerafinError::Request(RequestError::UnknownVariable { id, available })) => {
                assert_eq!(id, "V");
                assert_eq!(available, vec!["H".to_string(), "U".to_string()]);
            }
            other => panic!("expected UnknownVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_frame_index_out_of_range() {
        let (header, mut stream) = two_frame_file(FloatKind::Single);
        let sizes = header.compute_sizes();
        match read_frame_var(&mut stream, &header, &sizes, 2, "H") {
            Err(SerafinError::Request(RequestError::FrameOutOfRange {
                index: 2,
                nb_frames: 2,
            })) => {}
            other => panic!("expected FrameOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_common_times() {
        let a = vec![0.0, 600.0, 1200.0, 1800.0];
        let b = vec![600.0, 1800.0, 2400.0];
        assert_eq!(common_times(&a, &b), vec![600.0, 1800.0]);
        assert!(common_times(&a, &[]).is_empty());
    }

    #[test]
    fn test_write_frame_validates_shape() {
        let (header, _) = two_frame_file(FloatKind::Single);
        let mut buf = Vec::new();
        match write_frame(&mut buf, &header, 2.0, &[vec![1.0; 4]]) {
            Err(FormatError::VariableCountMismatch {
                expected: 2,
                found: 1,
            }) => {}
            other => panic!("expected VariableCountMismatch, got {:?}", other),
        }
        match write_frame(&mut buf, &header, 2.0, &[vec![1.0; 4], vec![1.0; 3]]) {
            Err(FormatError::ValueCountMismatch { found: 3, .. }) => {}
            other => panic!("expected ValueCountMismatch, got {:?}", other),
        }
    }
}
