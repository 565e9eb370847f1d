//! ASCII STL decoder.
//!
//! Grammar, with tokens separated by any run of whitespace:
//!
//! ```text
//! solid <name>
//!   facet normal <nx> <ny> <nz>
//!     outer loop
//!       vertex <x> <y> <z>
//!       vertex <x> <y> <z>
//!       vertex <x> <y> <z>
//!     endloop
//!   endfacet
//! endsolid <name>
//! ```
//!
//! Keywords match case-insensitively but must appear in this order. The
//! input is scanned once, left to right; anything after `endsolid` is ignored.

use crate::error::{Location, Result, StlError};
use crate::mesh::{Mesh, Triangle, Vector3};
use std::borrow::Cow;

/// A whitespace-delimited token and the line it started on.
#[derive(Debug, Clone, Copy)]
struct Word<'a> {
    text: &'a [u8],
    line: usize,
}

impl Word<'_> {
    fn is(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword.as_bytes())
    }

    fn lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.text)
    }

    fn quoted(&self) -> String {
        format!("'{}'", self.lossy())
    }
}

/// Splits the input into words while tracking line numbers.
struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.input.get(self.pos) {
            if !b.is_ascii_whitespace() {
                break;
            }
            if b == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    /// Next word, or `None` at end of input.
    fn next_word(&mut self) -> Option<Word<'a>> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }

        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|b| !b.is_ascii_whitespace())
        {
            self.pos += 1;
        }

        Some(Word {
            text: &self.input[start..self.pos],
            line: self.line,
        })
    }

    /// Remainder of the current line after leading blanks.
    ///
    /// Consumes the line terminator. A `\r` before the `\n` is dropped; any
    /// other whitespace inside or at the end of the line is kept.
    fn rest_of_line(&mut self) -> &'a [u8] {
        while matches!(self.input.get(self.pos), Some(b' ' | b'\t')) {
            self.pos += 1;
        }

        let start = self.pos;
        let end = self.input[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.input.len(), |i| start + i);

        self.pos = end;
        if self.pos < self.input.len() {
            self.pos += 1;
            self.line += 1;
        }

        let text = &self.input[start..end];
        text.strip_suffix(b"\r").unwrap_or(text)
    }

    fn expect_word(&mut self, expected: &str) -> Result<Word<'a>> {
        self.next_word()
            .ok_or_else(|| StlError::unexpected(expected, "end of input", self.line))
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<Word<'a>> {
        let expected = format!("'{}'", keyword);
        let word = self.expect_word(&expected)?;
        if word.is(keyword) {
            Ok(word)
        } else {
            Err(StlError::unexpected(expected, word.quoted(), word.line))
        }
    }

    fn expect_number(&mut self) -> Result<f32> {
        let word = self.expect_word("number")?;
        parse_number(word)
    }

    fn expect_vector(&mut self) -> Result<Vector3> {
        Ok(Vector3::new(
            self.expect_number()?,
            self.expect_number()?,
            self.expect_number()?,
        ))
    }
}

/// Parse a decimal float, rejecting NaN, infinities and values outside `f32`
fn parse_number(word: Word<'_>) -> Result<f32> {
    std::str::from_utf8(word.text)
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| StlError::malformed_number(word.lossy(), Location::Line(word.line)))
}

fn describe(word: Option<Word<'_>>) -> String {
    word.map_or_else(|| "end of input".to_string(), |w| w.quoted())
}

/// Decode an ASCII STL buffer
pub fn decode_ascii(buffer: &[u8]) -> Result<Mesh> {
    let mut lexer = Lexer::new(buffer);

    lexer.expect_keyword("solid")?;
    let name = String::from_utf8_lossy(lexer.rest_of_line()).into_owned();

    let mut triangles = Vec::new();
    loop {
        let word = lexer.expect_word("'facet' or 'endsolid'")?;
        if word.is("facet") {
            triangles.push(parse_facet(&mut lexer)?);
            tracing::trace!(facet = triangles.len(), line = word.line, "parsed facet");
        } else if word.is("endsolid") {
            break;
        } else {
            return Err(StlError::unexpected(
                "'facet' or 'endsolid'",
                word.quoted(),
                word.line,
            ));
        }
    }

    tracing::debug!(name = %name, triangles = triangles.len(), "decoded ASCII STL");
    Ok(Mesh::new(name, triangles))
}

/// Parse one facet body, after its `facet` keyword
fn parse_facet(lexer: &mut Lexer<'_>) -> Result<Triangle> {
    lexer.expect_keyword("normal")?;
    let normal = lexer.expect_vector()?;

    let word = lexer.expect_word("'outer'")?;
    if !word.is("outer") {
        return Err(StlError::malformed_facet(
            word.line,
            format!("expected 'outer loop', found {}", word.quoted()),
        ));
    }
    match lexer.next_word() {
        Some(word) if word.is("loop") => {}
        other => {
            return Err(StlError::malformed_facet(
                other.map_or(lexer.line, |w| w.line),
                format!("expected 'loop' after 'outer', found {}", describe(other)),
            ));
        }
    }

    let mut vertices = [Vector3::default(); 3];
    let mut count = 0;
    loop {
        let Some(word) = lexer.next_word() else {
            return Err(StlError::malformed_facet(
                lexer.line,
                "missing 'endloop' before end of input",
            ));
        };
        if word.is("vertex") {
            if count == vertices.len() {
                return Err(StlError::malformed_facet(
                    word.line,
                    "more than 3 vertices in outer loop",
                ));
            }
            vertices[count] = lexer.expect_vector()?;
            count += 1;
        } else if word.is("endloop") {
            if count != vertices.len() {
                return Err(StlError::malformed_facet(
                    word.line,
                    format!("expected 3 vertices in outer loop, found {}", count),
                ));
            }
            break;
        } else {
            return Err(StlError::malformed_facet(
                word.line,
                format!("missing 'endloop', found {}", word.quoted()),
            ));
        }
    }

    lexer.expect_keyword("endfacet")?;
    Ok(Triangle::new(normal, vertices))
}
