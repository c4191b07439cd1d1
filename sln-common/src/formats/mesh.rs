//! SM mesh format (.sm)
//!
//! Triangulated mesh with an unpacked f32 vertex layout the engine uploads
//! as-is.
//!
//! # Layout
//! ```text
//! 0x00: signature "SM\0\0"
//! 0x04: vertex_count i32
//! 0x08: index_count i32 (3 × triangle count)
//! 0x0C: vertex_data (vertex_count × 32 bytes: position f32×3, normal f32×3, uv f32×2)
//! var:  index_data (index_count × i32)
//! ```

use std::io::Write;

use bytemuck::{Pod, Zeroable};
use glam::DVec3;

use super::serialization::{get_i32, put_i32};
use super::{ByteReader, SM_SIGNATURE, check_signature};
use crate::error::count_i32;
use crate::{FormatError, TransformPolicy};

/// Size of one encoded vertex in bytes
pub const VERTEX_SIZE: usize = 32;

/// Size of one encoded triangle in bytes
pub const TRIANGLE_SIZE: usize = 12;

/// SM header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmHeader {
    pub vertex_count: i32,
    pub index_count: i32,
}

impl SmHeader {
    pub const SIZE: usize = 12;

    pub fn new(vertex_count: i32, index_count: i32) -> Self {
        Self {
            vertex_count,
            index_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&SM_SIGNATURE);
        put_i32(&mut bytes, 4, self.vertex_count);
        put_i32(&mut bytes, 8, self.index_count);
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..4] != SM_SIGNATURE {
            return None;
        }
        Some(Self {
            vertex_count: get_i32(bytes, 4),
            index_count: get_i32(bytes, 8),
        })
    }

    /// Total file size implied by the header counts
    pub fn file_size(&self) -> usize {
        Self::SIZE
            + self.vertex_count.max(0) as usize * VERTEX_SIZE
            + self.index_count.max(0) as usize * 4
    }
}

/// One mesh vertex, laid out exactly as stored in the file
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Vertex without texture coordinates
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            uv: [0.0, 0.0],
        }
    }

    pub fn with_uv(mut self, uv: [f32; 2]) -> Self {
        self.uv = uv;
        self
    }
}

/// Three vertex indices in winding order
pub type Triangle = [i32; 3];

/// Triangulated mesh, already scaled by whoever produced it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<Triangle>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Build a mesh from upstream polygon index lists
    ///
    /// Every polygon must have exactly three indices; nothing is triangulated
    /// here.
    pub fn from_polygons<I, P>(vertices: Vec<Vertex>, polygons: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[i32]>,
    {
        let triangles = polygons
            .into_iter()
            .enumerate()
            .map(|(face, polygon)| {
                let polygon = polygon.as_ref();
                <Triangle>::try_from(polygon).map_err(|_| FormatError::NonTriangularFace {
                    face,
                    vertex_count: polygon.len(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(vertices, triangles))
    }

    pub fn index_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Check the structural invariants the engine relies on
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.vertices.is_empty() || self.triangles.is_empty() {
            return Err(FormatError::EmptyMesh {
                vertex_count: self.vertices.len(),
                triangle_count: self.triangles.len(),
            });
        }
        let vertex_count = self.vertices.len();
        for (triangle, indices) in self.triangles.iter().enumerate() {
            for &index in indices {
                if usize::try_from(index).map_or(true, |i| i >= vertex_count) {
                    return Err(FormatError::IndexOutOfRange {
                        triangle,
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Encode a mesh into a complete SM blob
///
/// Positions go through `policy`; normals and UVs are written as given.
pub fn encode_mesh(mesh: &Mesh, policy: TransformPolicy) -> Result<Vec<u8>, FormatError> {
    mesh.validate()?;
    let header = SmHeader::new(
        count_i32("vertex", mesh.vertices.len())?,
        count_i32("index", mesh.index_count())?,
    );

    let mut out = Vec::with_capacity(header.file_size());
    out.extend_from_slice(&header.to_bytes());

    for vertex in &mesh.vertices {
        let [x, y, z] = vertex.position;
        let p = policy.position(DVec3::new(x as f64, y as f64, z as f64));
        let v = Vertex {
            position: p.as_vec3().to_array(),
            ..*vertex
        };
        let floats: [f32; 8] = bytemuck::cast(v);
        for f in floats {
            out.extend_from_slice(&f.to_le_bytes());
        }
    }

    for index in mesh.triangles.iter().flatten() {
        out.extend_from_slice(&index.to_le_bytes());
    }

    Ok(out)
}

/// Write a complete SM file
pub fn write_mesh<W: Write>(
    w: &mut W,
    mesh: &Mesh,
    policy: TransformPolicy,
) -> std::io::Result<()> {
    let bytes = encode_mesh(mesh, policy).map_err(std::io::Error::other)?;
    w.write_all(&bytes)
}

/// Decode an SM blob
///
/// Returns the mesh in engine space, as the runtime sees it.
pub fn read_mesh(bytes: &[u8]) -> Result<Mesh, FormatError> {
    check_signature(bytes, SM_SIGNATURE)?;
    let mut r = ByteReader::new(bytes);
    r.take(4)?;
    let vertex_count = r.count("vertex count")?;
    let index_count = r.count("index count")?;
    if index_count % 3 != 0 {
        return Err(FormatError::NonTriangularFace {
            face: index_count / 3,
            vertex_count: index_count % 3,
        });
    }

    let mut vertices = Vec::with_capacity(vertex_count.min(bytes.len() / VERTEX_SIZE));
    for _ in 0..vertex_count {
        let mut floats = [0f32; 8];
        for f in &mut floats {
            *f = r.f32()?;
        }
        vertices.push(bytemuck::cast::<[f32; 8], Vertex>(floats));
    }

    let mut triangles = Vec::with_capacity((index_count / 3).min(bytes.len() / TRIANGLE_SIZE));
    for _ in 0..index_count / 3 {
        triangles.push([r.i32()?, r.i32()?, r.i32()?]);
    }
    r.finish()?;

    Ok(Mesh::new(vertices, triangles))
}
