//! Test-only STL encoders used to build inputs for the decoder.

#![allow(dead_code)]

use stlmesh::{Triangle, Vector3};

pub fn triangle(normal: [f32; 3], v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> Triangle {
    Triangle::new(normal.into(), [v0.into(), v1.into(), v2.into()])
}

/// The triangle used by the reference scenarios
pub fn unit_triangle() -> Triangle {
    triangle(
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
    )
}

fn push_vector(buf: &mut Vec<u8>, v: Vector3) {
    for c in v.to_array() {
        buf.extend_from_slice(&c.to_le_bytes());
    }
}

/// Encode triangles as binary STL
///
/// - 80 byte header
/// - 4 byte u32 triangle count (little endian)
/// - per triangle: normal, three vertices, 2 byte attribute
pub fn encode_binary(header: &[u8], triangles: &[Triangle]) -> Vec<u8> {
    let mut buf = vec![0u8; 80];
    buf[..header.len()].copy_from_slice(header);
    buf.extend_from_slice(&(triangles.len() as u32).to_le_bytes());

    for tri in triangles {
        push_vector(&mut buf, tri.normal());
        for &vertex in tri.vertices() {
            push_vector(&mut buf, vertex);
        }
        buf.extend_from_slice(&[0u8, 0u8]);
    }

    buf
}

/// Encode triangles as ASCII STL
///
/// Floats use `{:?}` so every value round-trips exactly.
pub fn encode_ascii(name: &str, triangles: &[Triangle]) -> String {
    let mut out = format!("solid {}\n", name);
    for tri in triangles {
        let n = tri.normal();
        out.push_str(&format!("  facet normal {:?} {:?} {:?}\n", n.x, n.y, n.z));
        out.push_str("    outer loop\n");
        for v in tri.vertices() {
            out.push_str(&format!("      vertex {:?} {:?} {:?}\n", v.x, v.y, v.z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    out.push_str(&format!("endsolid {}\n", name));
    out
}
