//! Matrix Market reader.
//!
//! Supports real, integer and pattern matrices in `coordinate` or `array` layout,
//! stored as `general` or `symmetric`. Entries are expanded into a dense
//! `faer::Mat<f64>`; symmetric files have each stored off-diagonal entry mirrored and
//! duplicate coordinate entries are summed. Complex, hermitian and
//! skew-symmetric files are rejected, and so are declared sizes whose dense storage
//! would exceed [`MAX_DENSE_ENTRIES`].
//!
//! # References
//! - <https://math.nist.gov/MatrixMarket/formats.html>

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use faer::Mat;

use crate::error::MatIterError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Coordinate,
    Array,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Real,
    Integer,
    Pattern,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Symmetry {
    General,
    Symmetric,
}

#[derive(Clone, Copy, Debug)]
struct Header {
    layout: Layout,
    field: Field,
    symmetry: Symmetry,
}

/// Largest `nrows * ncols` accepted before allocating the dense buffer (2 GiB of `f64`).
pub const MAX_DENSE_ENTRIES: usize = 1 << 28;

fn parse_error(line: usize, message: impl Into<String>) -> MatIterError {
    MatIterError::Parse { line, message: message.into() }
}

fn parse_header(line_no: usize, line: &str) -> Result<Header, MatIterError> {
    let tokens: Vec<String> = line.split_whitespace().map(str::to_ascii_lowercase).collect();
    if tokens.len() != 5 || tokens[0] != "%%matrixmarket" {
        return Err(parse_error(line_no, "expected `%%MatrixMarket matrix <layout> <field> <symmetry>`"));
    }
    if tokens[1] != "matrix" {
        return Err(MatIterError::UnsupportedFormat(format!("object `{}`", tokens[1])));
    }
    let layout = match tokens[2].as_str() {
        "coordinate" => Layout::Coordinate,
        "array" => Layout::Array,
        other => return Err(MatIterError::UnsupportedFormat(format!("layout `{other}`"))),
    };
    let field = match tokens[3].as_str() {
        "real" | "double" => Field::Real,
        "integer" => Field::Integer,
        "pattern" => Field::Pattern,
        other => return Err(MatIterError::UnsupportedFormat(format!("field `{other}`"))),
    };
    let symmetry = match tokens[4].as_str() {
        "general" => Symmetry::General,
        "symmetric" => Symmetry::Symmetric,
        other => return Err(MatIterError::UnsupportedFormat(format!("symmetry `{other}`"))),
    };
    if layout == Layout::Array && field == Field::Pattern {
        return Err(MatIterError::UnsupportedFormat("pattern field in array layout".into()));
    }
    Ok(Header { layout, field, symmetry })
}

fn parse_index(line_no: usize, token: &str, bound: usize) -> Result<usize, MatIterError> {
    let idx: usize = token
        .parse()
        .map_err(|_| parse_error(line_no, format!("invalid index `{token}`")))?;
    if idx == 0 || idx > bound {
        return Err(parse_error(line_no, format!("index {idx} out of range 1..={bound}")));
    }
    Ok(idx - 1)
}

fn parse_value(line_no: usize, token: &str, field: Field) -> Result<f64, MatIterError> {
    let value = match field {
        Field::Integer => token.parse::<i64>().map(|v| v as f64).ok(),
        _ => token.parse::<f64>().ok(),
    };
    value.ok_or_else(|| parse_error(line_no, format!("invalid value `{token}`")))
}

/// Read a Matrix Market matrix into a dense matrix.
pub fn read_matrix<R: BufRead>(reader: R) -> Result<Mat<f64>, MatIterError> {
    let mut lines = reader.lines().enumerate().map(|(i, line)| (i + 1, line));

    let header = match lines.next() {
        Some((line_no, line)) => parse_header(line_no, &line?)?,
        None => return Err(parse_error(1, "empty input")),
    };

    // Remaining non-comment, non-blank lines.
    let mut data = lines.filter_map(|(line_no, line)| match line {
        Ok(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                None
            } else {
                Some(Ok((line_no, trimmed.to_string())))
            }
        }
        Err(e) => Some(Err(MatIterError::from(e))),
    });

    let (size_line, size_text) = data
        .next()
        .ok_or_else(|| parse_error(1, "missing size line"))??;
    let sizes = size_text
        .split_whitespace()
        .map(|t| {
            t.parse::<usize>()
                .map_err(|_| parse_error(size_line, format!("invalid size `{t}`")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let expected_sizes = match header.layout {
        Layout::Coordinate => 3,
        Layout::Array => 2,
    };
    if sizes.len() != expected_sizes {
        return Err(parse_error(
            size_line,
            format!("expected {expected_sizes} sizes, found {}", sizes.len()),
        ));
    }
    let (nrows, ncols) = (sizes[0], sizes[1]);
    if header.symmetry == Symmetry::Symmetric && nrows != ncols {
        return Err(parse_error(size_line, format!("symmetric matrix must be square, got {nrows}x{ncols}")));
    }

    let entries = nrows
        .checked_mul(ncols)
        .filter(|&len| len <= MAX_DENSE_ENTRIES)
        .ok_or_else(|| {
            parse_error(
                size_line,
                format!("{nrows}x{ncols} exceeds the dense limit of {MAX_DENSE_ENTRIES} entries"),
            )
        })?;

    // column-major dense buffer
    let mut dense = vec![0.0; entries];
    let mut last_line = size_line;

    match header.layout {
        Layout::Coordinate => {
            let nnz = sizes[2];
            let arity = if header.field == Field::Pattern { 2 } else { 3 };
            for _ in 0..nnz {
                let (line_no, text) = data
                    .next()
                    .ok_or_else(|| parse_error(last_line, format!("expected {nnz} entries")))??;
                last_line = line_no;
                let tokens: Vec<&str> = text.split_whitespace().collect();
                if tokens.len() != arity {
                    return Err(parse_error(line_no, format!("expected {arity} fields, found {}", tokens.len())));
                }
                let i = parse_index(line_no, tokens[0], nrows)?;
                let j = parse_index(line_no, tokens[1], ncols)?;
                let v = match header.field {
                    Field::Pattern => 1.0,
                    field => parse_value(line_no, tokens[2], field)?,
                };
                dense[j * nrows + i] += v;
                if header.symmetry == Symmetry::Symmetric && i != j {
                    dense[i * nrows + j] += v;
                }
            }
        }
        Layout::Array => {
            let positions: Vec<(usize, usize)> = match header.symmetry {
                Symmetry::General => (0..ncols)
                    .flat_map(|j| (0..nrows).map(move |i| (i, j)))
                    .collect(),
                Symmetry::Symmetric => (0..ncols)
                    .flat_map(|j| (j..nrows).map(move |i| (i, j)))
                    .collect(),
            };
            let count = positions.len();
            for (i, j) in positions {
                let (line_no, text) = data
                    .next()
                    .ok_or_else(|| parse_error(last_line, format!("expected {count} values")))??;
                last_line = line_no;
                let mut tokens = text.split_whitespace();
                let v = match (tokens.next(), tokens.next()) {
                    (Some(token), None) => parse_value(line_no, token, header.field)?,
                    _ => return Err(parse_error(line_no, "expected one value per line")),
                };
                dense[j * nrows + i] = v;
                if header.symmetry == Symmetry::Symmetric && i != j {
                    dense[i * nrows + j] = v;
                }
            }
        }
    }

    if let Some(extra) = data.next() {
        let (line_no, _) = extra?;
        return Err(parse_error(line_no, "unexpected trailing entry"));
    }

    log::debug!("read {nrows}x{ncols} Matrix Market matrix ({:?}, {:?})", header.layout, header.symmetry);
    Ok(Mat::from_fn(nrows, ncols, |i, j| dense[j * nrows + i]))
}

/// Read a Matrix Market file holding an `n x 1` or `1 x n` matrix as a vector.
pub fn read_vector<R: BufRead>(reader: R) -> Result<Vec<f64>, MatIterError> {
    let m = read_matrix(reader)?;
    if m.ncols() == 1 {
        Ok((0..m.nrows()).map(|i| m[(i, 0)]).collect())
    } else if m.nrows() == 1 {
        Ok((0..m.ncols()).map(|j| m[(0, j)]).collect())
    } else {
        Err(MatIterError::UnsupportedFormat(format!(
            "expected a vector, found a {}x{} matrix",
            m.nrows(),
            m.ncols()
        )))
    }
}

/// Open and read a `.mtx` matrix file.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<Mat<f64>, MatIterError> {
    read_matrix(BufReader::new(File::open(path)?))
}

/// Open and read a `.mtx` vector file.
pub fn load_vector(path: impl AsRef<Path>) -> Result<Vec<f64>, MatIterError> {
    read_vector(BufReader::new(File::open(path)?))
}
