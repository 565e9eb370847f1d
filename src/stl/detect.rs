//! ASCII vs binary sniffing.
//!
//! STL has no magic number. The only reliable signal for binary input is that
//! the triangle count in the header reconciles exactly with the buffer size;
//! ASCII input is recognized by a leading `solid` keyword.
//!
//! This is a heuristic. An ASCII file whose byte length happens to equal
//! `84 + 50 * count` (with `count` read from bytes 80..84) is classified as
//! binary. That ambiguity is inherent to the format.

use super::binary::{PREAMBLE_LEN, expected_len};
use crate::error::{Result, StlError};
use serde::Serialize;

/// File encoding of an STL buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Ascii,
    Binary,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Ascii => write!(f, "ASCII"),
            Format::Binary => write!(f, "binary"),
        }
    }
}

const SOLID: &[u8] = b"solid";

/// Decide whether `buffer` holds ASCII or binary STL
///
/// Checked in order:
/// 1. Buffers shorter than a binary header can only be ASCII.
/// 2. `84 + 50 * count == len` means binary, even if the header spells `solid`.
/// 3. A leading `solid` (after whitespace, case-sensitive) means ASCII.
pub fn detect(buffer: &[u8]) -> Result<Format> {
    if buffer.len() >= PREAMBLE_LEN && size_matches_header(buffer) {
        tracing::debug!(len = buffer.len(), "binary size check matched");
        return Ok(Format::Binary);
    }

    if starts_with_solid(buffer) {
        tracing::debug!(len = buffer.len(), "found leading 'solid' keyword");
        return Ok(Format::Ascii);
    }

    tracing::debug!(len = buffer.len(), "no STL signature found");
    Err(StlError::UnrecognizedFormat)
}

/// True when the header count accounts for every byte of the buffer
fn size_matches_header(buffer: &[u8]) -> bool {
    match expected_len(buffer) {
        Some(expected) => expected == buffer.len() as u64,
        None => false,
    }
}

fn starts_with_solid(buffer: &[u8]) -> bool {
    let start = buffer
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(buffer.len());
    buffer[start..].starts_with(SOLID)
}
