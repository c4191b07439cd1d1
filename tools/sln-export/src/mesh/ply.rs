//! ASCII PLY mesh conversion
//!
//! Only the layout produced by the authoring tool's PLY export is accepted:
//!
//! ```text
//! ply
//! format ascii 1.0
//! element vertex <n>
//! property float x        (8 float properties: x y z nx ny nz s t)
//! ...
//! element face <m>
//! property list uchar int vertex_indices
//! end_header
//! <n vertex lines>
//! <m face lines, each "3 a b c">
//! ```
//!
//! PLY data is already in engine space, so meshes are written with
//! [`TransformPolicy::Passthrough`].

use anyhow::{Context, Result};
use sln_common::{ErrorKind, FormatError, Mesh, TransformPolicy, Vertex, encode_mesh};
use std::path::Path;
use thiserror::Error;

use crate::output::write_atomic;

/// Number of float properties a vertex must declare
pub const VERTEX_PROPERTY_COUNT: usize = 8;

/// PLY parse failure; all of these are format violations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlyError {
    #[error("not a PLY file (missing 'ply' magic line)")]
    MissingMagic,

    #[error("unsupported PLY format '{0}' (only 'ascii 1.0' is supported)")]
    UnsupportedFormat(String),

    #[error("PLY header ended without 'end_header'")]
    UnterminatedHeader,

    #[error("malformed header line {line}: '{text}'")]
    BadHeaderLine { line: usize, text: String },

    #[error("vertex element declares {found} float properties, expected 8")]
    PropertyCount { found: usize },

    #[error("line {line}: vertex property '{text}' is not a float")]
    NonFloatProperty { line: usize, text: String },

    #[error("PLY {element} count is zero")]
    EmptyElement { element: &'static str },

    #[error("PLY body has {found} {element} lines, header declares {expected}")]
    MissingLines {
        element: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: expected 8 numbers in vertex record")]
    BadVertex { line: usize },

    #[error("line {line}: malformed face record")]
    BadFace { line: usize },

    #[error(transparent)]
    Mesh(#[from] FormatError),
}

impl PlyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlyError::Mesh(e) => e.kind(),
            _ => ErrorKind::FormatViolation,
        }
    }
}

#[derive(Debug, Default)]
struct PlyHeader {
    vertex_count: usize,
    face_count: usize,
    vertex_floats: usize,
    /// Number of lines consumed, including `end_header`
    lines: usize,
}

enum Element {
    None,
    Vertex,
    Face,
    Other,
}

fn parse_header(text: &str) -> Result<PlyHeader, PlyError> {
    let mut lines = text.lines().map(str::trim);
    if lines.next() != Some("ply") {
        return Err(PlyError::MissingMagic);
    }

    let mut header = PlyHeader {
        lines: 1,
        ..Default::default()
    };
    let mut element = Element::None;

    for line in lines {
        header.lines += 1;
        let bad_line = || PlyError::BadHeaderLine {
            line: header.lines,
            text: line.to_string(),
        };
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            ["end_header"] => return Ok(header),
            [] | ["comment", ..] | ["obj_info", ..] => {}
            ["format", rest @ ..] => {
                let format = rest.join(" ");
                if format != "ascii 1.0" {
                    return Err(PlyError::UnsupportedFormat(format));
                }
            }
            ["element", name, count] => {
                let count: usize = count.parse().map_err(|_| bad_line())?;
                element = match *name {
                    "vertex" => {
                        header.vertex_count = count;
                        Element::Vertex
                    }
                    "face" => {
                        header.face_count = count;
                        Element::Face
                    }
                    _ => Element::Other,
                };
            }
            ["property", "float" | "float32", _] => {
                if let Element::Vertex = element {
                    header.vertex_floats += 1;
                }
            }
            ["property", ..] => {
                if let Element::Vertex = element {
                    // Vertex records are exactly eight floats
                    return Err(PlyError::NonFloatProperty {
                        line: header.lines,
                        text: line.to_string(),
                    });
                }
            }
            _ => return Err(bad_line()),
        }
    }

    Err(PlyError::UnterminatedHeader)
}

/// Parse ASCII PLY text into a triangle mesh
///
/// Every check runs before any output is produced.
pub fn parse_ply(text: &str) -> Result<Mesh, PlyError> {
    let header = parse_header(text)?;

    if header.vertex_floats != VERTEX_PROPERTY_COUNT {
        return Err(PlyError::PropertyCount {
            found: header.vertex_floats,
        });
    }
    if header.vertex_count == 0 {
        return Err(PlyError::EmptyElement { element: "vertex" });
    }
    if header.face_count == 0 {
        return Err(PlyError::EmptyElement { element: "face" });
    }

    let mut body = text
        .lines()
        .enumerate()
        .skip(header.lines)
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let mut vertices = Vec::with_capacity(header.vertex_count);
    for _ in 0..header.vertex_count {
        let (line, text) = body.next().ok_or(PlyError::MissingLines {
            element: "vertex",
            expected: header.vertex_count,
            found: vertices.len(),
        })?;
        let values = text
            .split_whitespace()
            .map(str::parse::<f32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| PlyError::BadVertex { line })?;
        let [x, y, z, nx, ny, nz, s, t] = values[..] else {
            return Err(PlyError::BadVertex { line });
        };
        vertices.push(Vertex::new([x, y, z], [nx, ny, nz]).with_uv([s, t]));
    }

    let mut polygons = Vec::with_capacity(header.face_count);
    for _ in 0..header.face_count {
        let (line, text) = body.next().ok_or(PlyError::MissingLines {
            element: "face",
            expected: header.face_count,
            found: polygons.len(),
        })?;
        let values = text
            .split_whitespace()
            .map(str::parse::<i32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| PlyError::BadFace { line })?;
        let (&count, indices) = values.split_first().ok_or(PlyError::BadFace { line })?;
        if usize::try_from(count).ok() != Some(indices.len()) {
            return Err(PlyError::BadFace { line });
        }
        polygons.push(indices.to_vec());
    }

    let mesh = Mesh::from_polygons(vertices, polygons)?;
    mesh.validate()?;
    Ok(mesh)
}

/// Read and parse a PLY file
pub(crate) fn load_ply(input: &Path) -> Result<Mesh> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read PLY: {}", input.display()))?;
    let mesh = parse_ply(&text).with_context(|| format!("Invalid PLY: {}", input.display()))?;
    Ok(mesh)
}

/// Convert a PLY file to SM bytes in memory
pub fn convert_ply_to_memory(input: &Path) -> Result<Vec<u8>> {
    let mesh = load_ply(input)?;
    let bytes = encode_mesh(&mesh, TransformPolicy::Passthrough)
        .with_context(|| format!("Failed to encode mesh: {}", input.display()))?;

    tracing::info!(
        "Converted PLY mesh: {} vertices, {} indices",
        mesh.vertices.len(),
        mesh.index_count()
    );
    Ok(bytes)
}

/// Convert a PLY file to an SM file
pub fn convert_ply(input: &Path, output: &Path) -> Result<()> {
    let bytes = convert_ply_to_memory(input)?;
    write_atomic(output, &bytes)
}
