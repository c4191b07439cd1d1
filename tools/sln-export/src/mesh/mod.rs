//! Mesh conversion
//!
//! Each supported input format lives in its own submodule and produces a
//! [`sln_common::Mesh`]; encoding is shared.

mod ply;

pub use ply::{PlyError, VERTEX_PROPERTY_COUNT, convert_ply, convert_ply_to_memory, parse_ply};

use anyhow::{Result, bail};
use std::path::Path;

/// Convert any supported mesh file, picked by extension
pub fn convert_mesh(input: &Path, output: &Path) -> Result<()> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "ply" => convert_ply(input, output),
        _ => bail!("Unsupported mesh format: {:?} (use .ply)", input),
    }
}

/// Load any supported mesh file into memory
pub fn load_mesh(input: &Path) -> Result<sln_common::Mesh> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "ply" => ply::load_ply(input),
        _ => bail!("Unsupported mesh format: {:?} (use .ply)", input),
    }
}
