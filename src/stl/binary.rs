use crate::error::{Location, Result, StlError};
use crate::mesh::{Mesh, Triangle, Vector3};

/// Bytes of free-form header at the start of a binary STL
pub const HEADER_LEN: usize = 80;
/// Header plus the u32 triangle count
pub const PREAMBLE_LEN: usize = HEADER_LEN + 4;
/// 12 bytes normal + 36 bytes vertices + 2 bytes attribute
pub const RECORD_LEN: usize = 50;

const ATTRIBUTE_OFFSET: usize = 48;

/// Byte length implied by the header's triangle count
///
/// Returns `None` when the buffer is too short to hold the count.
pub fn expected_len(buffer: &[u8]) -> Option<u64> {
    let count = triangle_count(buffer)?;
    // 80 (header) + 4 (count) + triangles * (12 normal + 36 vertices + 2 attribute)
    Some(PREAMBLE_LEN as u64 + count as u64 * RECORD_LEN as u64)
}

/// Triangle count declared in the header, if the buffer is long enough
pub fn triangle_count(buffer: &[u8]) -> Option<u32> {
    let bytes = buffer.get(HEADER_LEN..PREAMBLE_LEN)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// The 80 header bytes, whose content has no defined meaning
pub fn header(buffer: &[u8]) -> Result<&[u8; HEADER_LEN]> {
    buffer
        .get(..HEADER_LEN)
        .and_then(|h| h.try_into().ok())
        .ok_or(StlError::TruncatedBinary {
            expected: HEADER_LEN as u64,
            actual: buffer.len(),
        })
}

/// Decode a binary STL buffer
///
/// Binary STL format:
/// - 80 byte header
/// - 4 byte u32 triangle count (little endian)
/// - For each triangle:
///   - 3 x f32 normal (12 bytes)
///   - 3 x 3 x f32 vertices (36 bytes)
///   - 2 byte attribute (ignored)
///
/// Bytes after the last declared record are ignored.
pub fn decode_binary(buffer: &[u8]) -> Result<Mesh> {
    let count = checked_count(buffer)?;

    let mut triangles = Vec::with_capacity(count);
    for (i, record) in records(buffer, count).enumerate() {
        let offset = PREAMBLE_LEN + i * RECORD_LEN;
        let normal = read_vector(record, 0, offset)?;
        let vertices = [
            read_vector(record, 12, offset)?,
            read_vector(record, 24, offset)?,
            read_vector(record, 36, offset)?,
        ];
        triangles.push(Triangle::new(normal, vertices));
    }

    tracing::debug!(triangles = triangles.len(), "decoded binary STL");
    Ok(Mesh::new(String::new(), triangles))
}

/// Per-record attribute field, in record order
///
/// Not part of the mesh model. Some exporters store a color in it.
pub fn attributes(buffer: &[u8]) -> Result<Vec<u16>> {
    let count = checked_count(buffer)?;
    Ok(records(buffer, count)
        .map(|r| u16::from_le_bytes([r[ATTRIBUTE_OFFSET], r[ATTRIBUTE_OFFSET + 1]]))
        .collect())
}

/// Read the declared count and make sure every record is present
fn checked_count(buffer: &[u8]) -> Result<usize> {
    let (Some(count), Some(expected)) = (triangle_count(buffer), expected_len(buffer)) else {
        return Err(StlError::TruncatedBinary {
            expected: PREAMBLE_LEN as u64,
            actual: buffer.len(),
        });
    };

    if (buffer.len() as u64) < expected {
        return Err(StlError::TruncatedBinary {
            expected,
            actual: buffer.len(),
        });
    }

    Ok(count as usize)
}

fn records(buffer: &[u8], count: usize) -> impl Iterator<Item = &[u8]> {
    buffer[PREAMBLE_LEN..]
        .chunks_exact(RECORD_LEN)
        .take(count)
}

/// Read three little-endian floats starting at `at` within a record
fn read_vector(record: &[u8], at: usize, record_offset: usize) -> Result<Vector3> {
    let mut v = [0.0f32; 3];
    for (i, c) in v.iter_mut().enumerate() {
        let start = at + i * 4;
        let bits = u32::from_le_bytes([
            record[start],
            record[start + 1],
            record[start + 2],
            record[start + 3],
        ]);
        let value = f32::from_bits(bits);
        if !value.is_finite() {
            return Err(StlError::malformed_number(
                format!("{:#010x}", bits),
                Location::Offset(record_offset + start),
            ));
        }
        *c = value;
    }
    Ok(v.into())
}
