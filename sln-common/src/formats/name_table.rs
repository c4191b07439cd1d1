//! Fixed-width name records
//!
//! World files address meshes and textures by index into tables of file
//! names. Each record is exactly `width` bytes: the path's bytes followed by
//! zero padding. A path that fills the record completely has no terminator.
//!
//! ```text
//! width = 10:  'c' 'u' 'b' 'e' '.' 's' 'm' 00 00 00
//! ```

use hashbrown::HashMap;

use crate::FormatError;

/// Record width used by current world files
pub const NAME_WIDTH: usize = 20;

/// Record width used by the scene-script generation of world files
pub const SHORT_NAME_WIDTH: usize = 10;

/// Supported name record widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameWidth {
    /// 10-byte records
    Short,
    /// 20-byte records
    #[default]
    Long,
}

impl NameWidth {
    pub fn bytes(self) -> usize {
        match self {
            NameWidth::Short => SHORT_NAME_WIDTH,
            NameWidth::Long => NAME_WIDTH,
        }
    }

    /// Map a byte width back to a variant
    pub fn from_bytes(width: usize) -> Option<Self> {
        match width {
            SHORT_NAME_WIDTH => Some(NameWidth::Short),
            NAME_WIDTH => Some(NameWidth::Long),
            _ => None,
        }
    }
}

/// One table entry: the name objects refer to and the file path stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub name: String,
    pub path: String,
}

/// Ordered, deduplicated name table
///
/// Indices are assigned in first-seen order and never change once handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    entries: Vec<NameEntry>,
    index: HashMap<String, usize>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, or return the index of the entry already using `name`
    ///
    /// A repeated name keeps the path it was first registered with.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(&i) = self.index.get(&name) {
            return i;
        }
        let i = self.entries.len();
        self.index.insert(name.clone(), i);
        self.entries.push(NameEntry {
            name,
            path: path.into(),
        });
        i
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    /// Check every path fits `width` bytes
    pub fn validate(&self, width: usize) -> Result<(), FormatError> {
        self.paths().try_for_each(|p| check_width(p, width))
    }

    /// Encode the table's paths as fixed-width records
    pub fn encode(&self, width: usize) -> Result<Vec<u8>, FormatError> {
        encode_names(self.paths(), width)
    }
}

fn check_width(path: &str, width: usize) -> Result<(), FormatError> {
    if path.len() > width {
        return Err(FormatError::FieldOverflow {
            path: path.to_string(),
            len: path.len(),
            width,
        });
    }
    Ok(())
}

/// Encode paths as `width`-byte zero-padded records
///
/// Every path is checked before any byte is produced, so an overflow never
/// yields a partial table.
pub fn encode_names<'a, I>(paths: I, width: usize) -> Result<Vec<u8>, FormatError>
where
    I: IntoIterator<Item = &'a str>,
{
    if width == 0 {
        return Err(FormatError::ZeroNameWidth);
    }
    let paths: Vec<&str> = paths.into_iter().collect();
    for path in &paths {
        check_width(path, width)?;
    }

    let mut out = vec![0u8; paths.len() * width];
    for (record, path) in out.chunks_exact_mut(width).zip(&paths) {
        record[..path.len()].copy_from_slice(path.as_bytes());
    }
    Ok(out)
}

/// Split `count` records of `width` bytes and strip their zero padding
pub fn decode_names(bytes: &[u8], count: usize, width: usize) -> Result<Vec<String>, FormatError> {
    if width == 0 {
        return Err(FormatError::ZeroNameWidth);
    }
    let needed = count.saturating_mul(width);
    if bytes.len() < needed {
        return Err(FormatError::Truncated {
            needed,
            available: bytes.len(),
        });
    }

    bytes[..needed]
        .chunks_exact(width)
        .enumerate()
        .map(|(index, record)| {
            let end = record.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            String::from_utf8(record[..end].to_vec())
                .map_err(|_| FormatError::InvalidName { index })
        })
        .collect()
}
