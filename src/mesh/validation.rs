//! Mesh validation utilities
//!
//! Inspects a decoded mesh for geometry that downstream consumers usually
//! want to know about:
//! - Degenerate triangles (zero area)
//! - Zero normals (many exporters write `0 0 0` and expect readers to recompute)
//! - Normals that are not unit length
//! - Normals pointing against the vertex winding
//!
//! Validation only reports. Decoded data is never rewritten.

use super::{Mesh, Triangle, Vector3};
use serde::Serialize;

/// Result of mesh validation
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Total number of triangles validated
    pub total: usize,
    /// Number of degenerate triangles (zero or near-zero area)
    pub degenerate: usize,
    /// Number of triangles whose stored normal is `0 0 0`
    pub zero_normal: usize,
    /// Number of non-zero stored normals that are not unit length
    pub non_unit_normal: usize,
    /// Number of stored normals pointing away from the winding normal
    pub flipped_normal: usize,
    /// Warning messages for issues found
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Check if the mesh has any issues at all
    pub fn has_issues(&self) -> bool {
        self.degenerate > 0
            || self.zero_normal > 0
            || self.non_unit_normal > 0
            || self.flipped_normal > 0
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if !self.has_issues() {
            format!("Mesh valid: {} triangles, no issues", self.total)
        } else {
            format!(
                "Mesh issues: {} total, {} degenerate, {} zero normals, {} non-unit normals, {} flipped normals",
                self.total,
                self.degenerate,
                self.zero_normal,
                self.non_unit_normal,
                self.flipped_normal
            )
        }
    }
}

/// Minimum area threshold for non-degenerate triangles
const MIN_TRIANGLE_AREA: f32 = 1e-10;

/// Validate a mesh and return a detailed report
pub fn validate_mesh(mesh: &Mesh) -> ValidationReport {
    let mut report = ValidationReport {
        total: mesh.len(),
        ..Default::default()
    };

    for tri in mesh {
        if is_degenerate(tri) {
            report.degenerate += 1;
            // No winding direction to compare against
            continue;
        }

        let normal = tri.normal();
        if is_zero(normal) {
            report.zero_normal += 1;
            continue;
        }

        if !is_unit_length(normal) {
            report.non_unit_normal += 1;
        }

        if let Some(computed) = tri.computed_normal()
            && normal.dot(computed) < 0.0
        {
            report.flipped_normal += 1;
        }
    }

    if report.degenerate > 0 {
        report.warnings.push(format!(
            "{} degenerate triangles detected",
            report.degenerate
        ));
    }
    if report.zero_normal > 0 {
        report.warnings.push(format!(
            "{} triangles have zero normals (recompute from winding)",
            report.zero_normal
        ));
    }
    if report.non_unit_normal > 0 {
        report.warnings.push(format!(
            "{} triangles have normals that are not unit length",
            report.non_unit_normal
        ));
    }
    if report.flipped_normal > 0 {
        report.warnings.push(format!(
            "{} triangles have normals opposite to their winding",
            report.flipped_normal
        ));
    }

    report
}

/// Check if a triangle is degenerate (zero or near-zero area)
fn is_degenerate(tri: &Triangle) -> bool {
    tri.area() < MIN_TRIANGLE_AREA
}

fn is_zero(v: Vector3) -> bool {
    v.x == 0.0 && v.y == 0.0 && v.z == 0.0
}

fn is_unit_length(normal: Vector3) -> bool {
    let len_sq = normal.dot(normal);
    (0.99..=1.01).contains(&len_sq)
}
