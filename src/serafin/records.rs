//! Fortran-framed big-endian record primitives.
//!
//! Every Serafin record is wrapped in a 4-byte big-endian length marker on
//! both sides. The reader skips markers without validating their value
//! (the derived size arithmetic in [`super::header`] is the consistency
//! check); the writer emits symmetric markers so that written files read
//! back byte-for-byte.

use std::io::{self, Read, Write};

/// Skip one 4-byte record marker.
pub fn skip_marker<R: Read>(reader: &mut R) -> io::Result<()> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)
}

pub fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

pub fn read_f32<R: Read>(reader: &mut R) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_be_bytes(buf))
}

pub fn read_f64<R: Read>(reader: &mut R) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_be_bytes(buf))
}

/// Read `n` big-endian i32 values.
pub fn read_i32_array<R: Read>(reader: &mut R, n: usize) -> io::Result<Vec<i32>> {
    let mut values = Vec::with_capacity(n);
    for _ in 0..n {
        values.push(read_i32(reader)?);
    }
    Ok(values)
}

/// Read `n` floating values at the given element width, widened to f64.
pub fn read_float_array<R: Read>(reader: &mut R, n: usize, width: usize) -> io::Result<Vec<f64>> {
    let mut values = Vec::with_capacity(n);
    if width == 8 {
        for _ in 0..n {
            values.push(read_f64(reader)?);
        }
    } else {
        for _ in 0..n {
            values.push(read_f32(reader)? as f64);
        }
    }
    Ok(values)
}

/// Read a fixed-width byte field as a string, trailing blanks trimmed.
pub fn read_fixed_str<R: Read>(reader: &mut R, len: usize) -> io::Result<String> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).trim_end().to_string())
}

pub fn write_i32<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

pub fn write_f32<W: Write>(writer: &mut W, value: f32) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

/// Write one record marker carrying the payload length in bytes.
pub fn write_marker<W: Write>(writer: &mut W, payload_len: usize) -> io::Result<()> {
    write_i32(writer, payload_len as i32)
}

/// Write a framed record of big-endian i32 values.
pub fn write_i32_record<W: Write>(writer: &mut W, values: &[i32]) -> io::Result<()> {
    write_marker(writer, 4 * values.len())?;
    for &v in values {
        write_i32(writer, v)?;
    }
    write_marker(writer, 4 * values.len())
}

/// Write a framed record of floating values at the given element width.
pub fn write_float_record<W: Write>(
    writer: &mut W,
    values: &[f64],
    width: usize,
) -> io::Result<()> {
    write_marker(writer, width * values.len())?;
    if width == 8 {
        for &v in values {
            writer.write_all(&v.to_be_bytes())?;
        }
    } else {
        for &v in values {
            write_f32(writer, v as f32)?;
        }
    }
    write_marker(writer, width * values.len())
}

/// Write a string as a fixed-width field, right-padded with spaces.
pub fn write_fixed_str<W: Write>(writer: &mut W, text: &str, len: usize) -> io::Result<()> {
    let mut buf = vec![b' '; len];
    let bytes = text.as_bytes();
    buf[..bytes.len()].copy_from_slice(bytes);
    writer.write_all(&buf)
}
