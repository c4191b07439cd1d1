//! sln binary asset formats
//!
//! Fixed-layout, versionless files read directly by the engine at load time.
//! Every file opens with a 4-byte signature; all integers are 32-bit signed
//! little-endian and all floats IEEE-754 32-bit little-endian.
//!
//! | Format | Signature     | Extension |
//! |--------|---------------|-----------|
//! | mesh   | `53 4D 00 00` | `.sm`     |
//! | world  | `53 57 00 00` | `.sw`     |
//! | image  | `53 49 4D 47` | `.simg`   |
//! | height | `53 54 00 00` | `.st`     |
//!
//! All headers implement [`BinarySerializable`].

pub mod heightmap;
pub mod mesh;
pub mod name_table;
mod reader;
mod serialization;
pub mod texture;
pub mod world;

pub use heightmap::*;
pub use mesh::*;
pub use name_table::*;
pub use serialization::BinarySerializable;
pub use texture::*;
pub use world::*;

pub(crate) use reader::ByteReader;

/// Mesh file signature ("SM\0\0")
pub const SM_SIGNATURE: [u8; 4] = [0x53, 0x4D, 0x00, 0x00];
/// World file signature ("SW\0\0")
pub const SW_SIGNATURE: [u8; 4] = [0x53, 0x57, 0x00, 0x00];
/// Image file signature ("SIMG")
pub const SIMG_SIGNATURE: [u8; 4] = [0x53, 0x49, 0x4D, 0x47];
/// Heightmap file signature ("ST\0\0")
pub const ST_SIGNATURE: [u8; 4] = [0x53, 0x54, 0x00, 0x00];

/// File extensions without the dot
pub const MESH_EXT: &str = "sm";
pub const WORLD_EXT: &str = "sw";
pub const TEXTURE_EXT: &str = "simg";
pub const HEIGHTMAP_EXT: &str = "st";

/// Check the first four bytes of `bytes` against `expected`
pub(crate) fn check_signature(bytes: &[u8], expected: [u8; 4]) -> Result<(), crate::FormatError> {
    let found: [u8; 4] = bytes
        .get(0..4)
        .and_then(|s| s.try_into().ok())
        .ok_or(crate::FormatError::Truncated {
            needed: 4,
            available: bytes.len(),
        })?;
    if found != expected {
        return Err(crate::FormatError::BadSignature { expected, found });
    }
    Ok(())
}
