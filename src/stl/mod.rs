pub mod ascii;
pub mod binary;
pub mod detect;

pub use ascii::decode_ascii;
pub use binary::decode_binary;
pub use detect::{Format, detect};

use crate::error::Result;
use crate::mesh::Mesh;

/// Detect the encoding of `buffer` and decode it
///
/// # Arguments
/// * `buffer` - Complete file contents
///
/// # Returns
/// * `Ok(mesh)` - Solid name (empty for binary) and triangles in file order
/// * `Err` - The first problem found; no partial mesh is produced
///
/// A binary buffer that is cut short no longer reconciles with its declared
/// triangle count, so detection rejects it with
/// [`StlError::UnrecognizedFormat`](crate::StlError::UnrecognizedFormat), or
/// hands it to the ASCII decoder if the header starts with `solid`.
/// [`StlError::TruncatedBinary`](crate::StlError::TruncatedBinary) is reported by
/// [`decode_binary`] and `decode_as(Format::Binary, ..)`.
pub fn decode(buffer: &[u8]) -> Result<Mesh> {
    let format = detect(buffer)?;
    decode_as(format, buffer)
}

/// Decode `buffer` with an already known encoding
pub fn decode_as(format: Format, buffer: &[u8]) -> Result<Mesh> {
    match format {
        Format::Ascii => decode_ascii(buffer),
        Format::Binary => decode_binary(buffer),
    }
}

/// Decode STL text already held as a string
pub fn decode_str(text: &str) -> Result<Mesh> {
    decode(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StlError;

    #[test]
    fn test_decode_dispatches_ascii() {
        let mesh = decode_str("solid empty\nendsolid empty\n").unwrap();
        assert_eq!(mesh.solid_name(), "empty");
    }

    #[test]
    fn test_decode_dispatches_binary() {
        let mut buf = b"solid but actually binary".to_vec();
        buf.resize(80, b' ');
        buf.extend_from_slice(&0u32.to_le_bytes());

        let mesh = decode(&buf).unwrap();
        assert_eq!(mesh.solid_name(), "");
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_decode_unrecognized() {
        assert_eq!(decode(b"not stl data"), Err(StlError::UnrecognizedFormat));
    }

    #[test]
    fn test_decode_as_forces_path() {
        let err = decode_as(Format::Binary, b"solid x\nendsolid x\n").unwrap_err();
        assert!(matches!(err, StlError::TruncatedBinary { .. }));
    }
}
