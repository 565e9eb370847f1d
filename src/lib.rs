//! stlmesh - Decode ASCII and binary STL files into an in-memory triangle mesh
//!
//! The library works on a buffer the caller has already read; it never
//! touches the filesystem and keeps no state between calls.
//!
//! ```
//! let mesh = stlmesh::decode_str(
//!     "solid tri\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid tri\n",
//! )
//! .unwrap();
//! assert_eq!(mesh.solid_name(), "tri");
//! assert_eq!(mesh.len(), 1);
//! ```

pub mod error;
pub mod mesh;
pub mod stl;

pub use error::{Location, Result, StlError};
pub use mesh::{BoundingBox, Mesh, Triangle, ValidationReport, Vector3, validate_mesh};
pub use stl::{Format, decode, decode_as, decode_ascii, decode_binary, decode_str, detect};
