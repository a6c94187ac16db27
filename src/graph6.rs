//! Reading and writing graphs in the graph6 line format.
//!
//! Each line encodes one graph: a variable-length vertex count followed by the
//! strict upper triangle of the adjacency matrix, six bits per printable byte
//! (byte value minus 63), most significant bit first. The triangle is read in
//! column-major order: `(0,1), (0,2), (1,2), (0,3), (1,3), (2,3), ...`.
//!
//! See <http://users.cecs.anu.edu.au/~bdm/data/formats.html>.

use crate::error::Graph6Error;
use crate::graph::{bit, AdjacencyMatrix, MAX_VERTICES};
use std::io::{self, Write};

/// Offset added to every 6-bit unit to make it printable.
const BIAS: u8 = 63;

/// Largest unit value; as a first header unit it escapes a longer header.
const ESCAPE: u8 = 63;

/// Number of 6-bit units holding the upper triangle of an `n`-vertex graph.
#[inline]
pub const fn data_units(n: usize) -> usize {
    (n * n.saturating_sub(1) / 2).div_ceil(6)
}

/// Decodes one graph6 line (without its trailing newline).
///
/// # Errors
/// Returns an error if the line contains bytes outside `63..=126`, its header
/// is truncated, it declares more than [`MAX_VERTICES`] vertices, or its
/// bitstream is shorter than the triangle requires.
pub fn decode_graph6(line: &[u8]) -> Result<AdjacencyMatrix, Graph6Error> {
    decode(line, None)
}

/// Decodes one graph6 line that must describe a graph on exactly `n` vertices.
///
/// The vertex count is checked before the triangle is read.
///
/// # Errors
/// As [`decode_graph6`], plus [`Graph6Error::OrderMismatch`] when the line
/// declares a different vertex count.
pub fn decode_graph6_of_order(line: &[u8], n: usize) -> Result<AdjacencyMatrix, Graph6Error> {
    decode(line, Some(n))
}

/// Reads only the vertex count of a graph6 line.
///
/// Returns the count and the number of header units it occupies.
///
/// # Errors
/// Returns an error if the header is empty, truncated or contains invalid bytes.
pub fn decode_order(line: &[u8]) -> Result<(u64, usize), Graph6Error> {
    let unit = |offset: usize| -> Result<u64, Graph6Error> {
        match line.get(offset) {
            Some(&byte) => to_unit(offset, byte).map(u64::from),
            None => Err(Graph6Error::TruncatedHeader {
                needed: offset + 1,
                got: line.len(),
            }),
        }
    };

    if line.is_empty() {
        return Err(Graph6Error::Empty);
    }
    let first = unit(0)?;
    if first < u64::from(ESCAPE) {
        return Ok((first, 1));
    }
    let second = unit(1)?;
    if second < u64::from(ESCAPE) {
        let n = (second << 12) | (unit(2)? << 6) | unit(3)?;
        return Ok((n, 4));
    }
    let mut n = 0u64;
    for offset in 2..8 {
        n = (n << 6) | unit(offset)?;
    }
    Ok((n, 8))
}

fn decode(line: &[u8], expected: Option<usize>) -> Result<AdjacencyMatrix, Graph6Error> {
    let (declared, header) = decode_order(line)?;
    if declared > MAX_VERTICES as u64 {
        return Err(Graph6Error::TooManyVertices {
            n: declared,
            max: MAX_VERTICES,
        });
    }
    let n = declared as usize;
    if let Some(expected) = expected {
        if n != expected {
            return Err(Graph6Error::OrderMismatch { expected, got: n });
        }
    }

    let data = &line[header..];
    let needed = data_units(n);
    if data.len() < needed {
        return Err(Graph6Error::Truncated {
            n,
            needed,
            got: data.len(),
        });
    }

    let mut rows = vec![0u64; n];
    let mut k = 0usize;
    for j in 1..n {
        for i in 0..j {
            let byte = data[k / 6];
            let unit = to_unit(header + k / 6, byte)?;
            if (unit >> (5 - k % 6)) & 1 != 0 {
                rows[i] |= bit(j);
                rows[j] |= bit(i);
            }
            k += 1;
        }
    }
    Ok(AdjacencyMatrix::from_rows(rows))
}

#[inline]
fn to_unit(offset: usize, byte: u8) -> Result<u8, Graph6Error> {
    match byte {
        BIAS..=126 => Ok(byte - BIAS),
        _ => Err(Graph6Error::InvalidByte { offset, byte }),
    }
}

/// Encodes a graph as a canonical graph6 line (shortest header, zero padding).
pub fn encode_graph6(m: &AdjacencyMatrix) -> Vec<u8> {
    let n = m.n();
    let mut out = Vec::with_capacity(4 + data_units(n));
    if n < usize::from(ESCAPE) {
        out.push(n as u8 + BIAS);
    } else {
        // n <= MAX_VERTICES, so the 18-bit form always suffices.
        out.push(ESCAPE + BIAS);
        out.push(((n >> 12) & 0x3F) as u8 + BIAS);
        out.push(((n >> 6) & 0x3F) as u8 + BIAS);
        out.push((n & 0x3F) as u8 + BIAS);
    }

    let mut unit = 0u8;
    let mut filled = 0;
    for j in 1..n {
        for i in 0..j {
            unit = (unit << 1) | u8::from(m.has_edge(i, j));
            filled += 1;
            if filled == 6 {
                out.push(unit + BIAS);
                unit = 0;
                filled = 0;
            }
        }
    }
    if filled > 0 {
        out.push((unit << (6 - filled)) + BIAS);
    }
    out
}

/// Writes one graph6 line per graph and returns the number of lines written.
///
/// # Errors
/// Propagates any error of the underlying writer.
pub fn write_graph6<'a, W: Write>(
    mut w: W,
    graphs: impl IntoIterator<Item = &'a AdjacencyMatrix>,
) -> io::Result<usize> {
    let mut count = 0;
    for m in graphs {
        w.write_all(&encode_graph6(m))?;
        w.write_all(b"\n")?;
        count += 1;
    }
    w.flush()?;
    Ok(count)
}

// ============================================================================
// Tests
// ============================================================================
