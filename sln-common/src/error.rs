//! Error type shared by every encoder and decoder in this crate.

/// Broad category of a [`FormatError`].
///
/// Every failure aborts the file currently being exported; the category only
/// tells the caller what went wrong, not whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input is structurally unusable (non-triangular face, bad counts, ...)
    FormatViolation,
    /// An object names a model or texture absent from its table
    ReferenceNotFound,
    /// A name or path does not fit its fixed-width record
    FieldOverflow,
}

/// Which name table a reference was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Model,
    Texture,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Model => f.write_str("model"),
            ReferenceKind::Texture => f.write_str("texture"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("face {face} has {vertex_count} vertices, only triangles are supported")]
    NonTriangularFace { face: usize, vertex_count: usize },

    #[error("triangle {triangle} references vertex {index}, mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: i32,
        vertex_count: usize,
    },

    #[error("mesh has {vertex_count} vertices and {triangle_count} triangles, both must be non-zero")]
    EmptyMesh {
        vertex_count: usize,
        triangle_count: usize,
    },

    #[error("'{path}' is {len} bytes, name records hold at most {width}")]
    FieldOverflow {
        path: String,
        len: usize,
        width: usize,
    },

    #[error("{kind} '{name}' is not in the {kind} table")]
    ReferenceNotFound { kind: ReferenceKind, name: String },

    #[error("object {object} uses {kind} index {index}, the {kind} table has {len} entries")]
    IndexOutOfTable {
        object: usize,
        kind: ReferenceKind,
        index: i32,
        len: usize,
    },

    #[error("object {object} (model '{model}') has no texture, the current world layout requires one")]
    MissingTexture { object: usize, model: String },

    #[error("pixel buffer holds {actual} values, {width}x{height} RGBA needs {expected}")]
    PixelBufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("sample buffer holds {actual} values, {width}x{height} grid needs {expected}")]
    SampleBufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("{what} count {count} does not fit a 32-bit signed field")]
    CountOverflow { what: &'static str, count: usize },

    #[error("expected signature {expected:02X?}, found {found:02X?}")]
    BadSignature { expected: [u8; 4], found: [u8; 4] },

    #[error("negative {what} {value} in header")]
    NegativeField { what: &'static str, value: i32 },

    #[error("input truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("{extra} unexpected trailing bytes after body")]
    TrailingBytes { extra: usize },

    #[error("name record {index} is not valid UTF-8")]
    InvalidName { index: usize },

    #[error("name records must be at least one byte wide")]
    ZeroNameWidth,

    #[error("the legacy world layout cannot store {what}")]
    UnsupportedInLegacy { what: &'static str },
}

impl FormatError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormatError::FieldOverflow { .. } => ErrorKind::FieldOverflow,
            FormatError::ReferenceNotFound { .. }
            | FormatError::IndexOutOfTable { .. }
            | FormatError::MissingTexture { .. } => ErrorKind::ReferenceNotFound,
            _ => ErrorKind::FormatViolation,
        }
    }
}

/// Convert a length to the 32-bit signed count the file headers store
pub(crate) fn count_i32(what: &'static str, count: usize) -> Result<i32, FormatError> {
    i32::try_from(count).map_err(|_| FormatError::CountOverflow { what, count })
}
