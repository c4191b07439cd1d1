//! SW world format (.sw)
//!
//! A world file lists the meshes and textures a level needs (by file name),
//! the placed objects referencing them by table index, and axis-aligned
//! marker volumes used by physics.
//!
//! Two layouts exist and are kept apart on purpose.
//!
//! # Current layout
//! ```text
//! 0x00: signature "SW\0\0"
//! 0x04: model_count i32
//! 0x08: texture_count i32
//! 0x0C: object_count i32
//! 0x10: point_cuboid_count i32
//! 0x14: model names (model_count × 20 bytes)
//! var:  texture names (texture_count × 20 bytes)
//! var:  objects (object_count × 44 bytes:
//!       model_index i32, texture_index i32, position f32×3, rotation f32×3, scale f32×3)
//! var:  point cuboids (point_cuboid_count × 24 bytes: centre f32×3, dimension f32×3)
//! ```
//!
//! # Legacy layout (deprecated)
//! ```text
//! 0x00: signature "SW\0\0"
//! 0x04: model_count i32
//! 0x08: object_count i32
//! 0x0C: reserved i32 (always 0)
//! 0x10: model names (model_count × 10 or 20 bytes)
//! var:  objects (object_count × 44 bytes, as above)
//! ```
//! The legacy layout has no texture table and no marker volumes.

use glam::Vec3;
use std::io::Write;

use super::serialization::{get_i32, put_i32};
use super::{ByteReader, NameWidth, SW_SIGNATURE, check_signature, decode_names, encode_names};
use crate::error::count_i32;
use crate::{FormatError, ReferenceKind, TransformPolicy};

/// Size of one encoded object record in bytes
pub const OBJECT_SIZE: usize = 44;

/// Size of one encoded point cuboid in bytes
pub const POINT_CUBOID_SIZE: usize = 24;

/// World file layout generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorldFormat {
    /// Three-count header, model table only
    Legacy(NameWidth),
    /// Four-count header with texture table and marker volumes
    #[default]
    Current,
}

impl WorldFormat {
    /// Bytes per name record
    pub fn name_width(self) -> usize {
        match self {
            WorldFormat::Legacy(width) => width.bytes(),
            WorldFormat::Current => NameWidth::Long.bytes(),
        }
    }

    /// Transform policy of the exporter generation that wrote this layout
    pub fn default_policy(self) -> TransformPolicy {
        match self {
            WorldFormat::Legacy(_) => TransformPolicy::Legacy,
            WorldFormat::Current => TransformPolicy::Current,
        }
    }

    pub fn header_size(self) -> usize {
        match self {
            WorldFormat::Legacy(_) => LegacySwHeader::SIZE,
            WorldFormat::Current => SwHeader::SIZE,
        }
    }
}

/// Current SW header (20 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwHeader {
    pub model_count: i32,
    pub texture_count: i32,
    pub object_count: i32,
    pub point_cuboid_count: i32,
}

impl SwHeader {
    pub const SIZE: usize = 20;

    pub fn new(
        model_count: i32,
        texture_count: i32,
        object_count: i32,
        point_cuboid_count: i32,
    ) -> Self {
        Self {
            model_count,
            texture_count,
            object_count,
            point_cuboid_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&SW_SIGNATURE);
        put_i32(&mut bytes, 4, self.model_count);
        put_i32(&mut bytes, 8, self.texture_count);
        put_i32(&mut bytes, 12, self.object_count);
        put_i32(&mut bytes, 16, self.point_cuboid_count);
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..4] != SW_SIGNATURE {
            return None;
        }
        Some(Self {
            model_count: get_i32(bytes, 4),
            texture_count: get_i32(bytes, 8),
            object_count: get_i32(bytes, 12),
            point_cuboid_count: get_i32(bytes, 16),
        })
    }
}

/// Legacy SW header (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySwHeader {
    pub model_count: i32,
    pub object_count: i32,
    /// Placeholder count, always written as 0
    pub reserved: i32,
}

impl LegacySwHeader {
    pub const SIZE: usize = 16;

    pub fn new(model_count: i32, object_count: i32) -> Self {
        Self {
            model_count,
            object_count,
            reserved: 0,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&SW_SIGNATURE);
        put_i32(&mut bytes, 4, self.model_count);
        put_i32(&mut bytes, 8, self.object_count);
        put_i32(&mut bytes, 12, self.reserved);
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..4] != SW_SIGNATURE {
            return None;
        }
        Some(Self {
            model_count: get_i32(bytes, 4),
            object_count: get_i32(bytes, 8),
            reserved: get_i32(bytes, 12),
        })
    }
}

/// Placed object in engine space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldObject {
    pub model_index: i32,
    pub texture_index: i32,
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl WorldObject {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.model_index.to_le_bytes());
        out.extend_from_slice(&self.texture_index.to_le_bytes());
        for v in [self.position, self.rotation, self.scale] {
            write_vec3(out, v);
        }
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            model_index: r.i32()?,
            texture_index: r.i32()?,
            position: r.vec3()?,
            rotation: r.vec3()?,
            scale: r.vec3()?,
        })
    }
}

/// Axis-aligned marker volume in engine space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCuboid {
    pub centre: Vec3,
    pub dimension: Vec3,
}

fn write_vec3(out: &mut Vec<u8>, v: Vec3) {
    for f in v.to_array() {
        out.extend_from_slice(&f.to_le_bytes());
    }
}

/// Fully resolved world, ready to encode
///
/// Tables hold the file paths written into the name records; objects refer
/// to them by position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct World {
    pub format: WorldFormat,
    pub models: Vec<String>,
    pub textures: Vec<String>,
    pub objects: Vec<WorldObject>,
    pub point_cuboids: Vec<PointCuboid>,
}

impl World {
    /// Check table widths and every object's indices
    pub fn validate(&self) -> Result<(), FormatError> {
        let width = self.format.name_width();
        encode_names(self.models.iter().map(String::as_str), width)?;

        if let WorldFormat::Legacy(_) = self.format {
            if !self.point_cuboids.is_empty() {
                return Err(FormatError::UnsupportedInLegacy {
                    what: "point cuboids",
                });
            }
        } else {
            encode_names(self.textures.iter().map(String::as_str), width)?;
        }

        for (object, o) in self.objects.iter().enumerate() {
            check_index(object, ReferenceKind::Model, o.model_index, self.models.len())?;
            // The legacy layout does not store its texture table, so a
            // decoded legacy world has none to check against
            let unchecked_legacy =
                matches!(self.format, WorldFormat::Legacy(_)) && self.textures.is_empty();
            if unchecked_legacy {
                if o.texture_index < 0 {
                    return Err(FormatError::IndexOutOfTable {
                        object,
                        kind: ReferenceKind::Texture,
                        index: o.texture_index,
                        len: 0,
                    });
                }
            } else {
                check_index(
                    object,
                    ReferenceKind::Texture,
                    o.texture_index,
                    self.textures.len(),
                )?;
            }
        }
        Ok(())
    }
}

fn check_index(object: usize, kind: ReferenceKind, index: i32, len: usize) -> Result<(), FormatError> {
    if usize::try_from(index).map_or(true, |i| i >= len) {
        return Err(FormatError::IndexOutOfTable {
            object,
            kind,
            index,
            len,
        });
    }
    Ok(())
}

/// Encode a world into a complete SW blob
///
/// Everything is validated before the first byte is produced.
pub fn encode_world(world: &World) -> Result<Vec<u8>, FormatError> {
    world.validate()?;
    let width = world.format.name_width();
    let model_count = count_i32("model", world.models.len())?;
    let object_count = count_i32("object", world.objects.len())?;

    let mut out = Vec::new();
    match world.format {
        WorldFormat::Legacy(_) => {
            out.extend_from_slice(&LegacySwHeader::new(model_count, object_count).to_bytes());
            out.extend(encode_names(world.models.iter().map(String::as_str), width)?);
        }
        WorldFormat::Current => {
            let header = SwHeader::new(
                model_count,
                count_i32("texture", world.textures.len())?,
                object_count,
                count_i32("point cuboid", world.point_cuboids.len())?,
            );
            out.extend_from_slice(&header.to_bytes());
            out.extend(encode_names(world.models.iter().map(String::as_str), width)?);
            out.extend(encode_names(world.textures.iter().map(String::as_str), width)?);
        }
    }

    for object in &world.objects {
        object.write(&mut out);
    }
    for cuboid in &world.point_cuboids {
        write_vec3(&mut out, cuboid.centre);
        write_vec3(&mut out, cuboid.dimension);
    }
    Ok(out)
}

/// Write a complete SW file
pub fn write_world<W: Write>(w: &mut W, world: &World) -> std::io::Result<()> {
    let bytes = encode_world(world).map_err(std::io::Error::other)?;
    w.write_all(&bytes)
}

/// Decode an SW blob written in `format`
///
/// The layout cannot be detected from the bytes, so the caller names it.
pub fn read_world(bytes: &[u8], format: WorldFormat) -> Result<World, FormatError> {
    check_signature(bytes, SW_SIGNATURE)?;
    let width = format.name_width();
    let mut r = ByteReader::new(bytes);
    r.take(4)?;

    let (model_count, texture_count, object_count, cuboid_count) = match format {
        WorldFormat::Legacy(_) => {
            let models = r.count("model count")?;
            let objects = r.count("object count")?;
            r.i32()?;
            (models, 0, objects, 0)
        }
        WorldFormat::Current => (
            r.count("model count")?,
            r.count("texture count")?,
            r.count("object count")?,
            r.count("point cuboid count")?,
        ),
    };

    let models = decode_names(r.take(model_count.saturating_mul(width))?, model_count, width)?;
    let textures = decode_names(
        r.take(texture_count.saturating_mul(width))?,
        texture_count,
        width,
    )?;

    let mut objects = Vec::with_capacity(object_count.min(bytes.len() / OBJECT_SIZE));
    for _ in 0..object_count {
        objects.push(WorldObject::read(&mut r)?);
    }

    let mut point_cuboids = Vec::with_capacity(cuboid_count.min(bytes.len() / POINT_CUBOID_SIZE));
    for _ in 0..cuboid_count {
        point_cuboids.push(PointCuboid {
            centre: r.vec3()?,
            dimension: r.vec3()?,
        });
    }
    r.finish()?;

    Ok(World {
        format,
        models,
        textures,
        objects,
        point_cuboids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_textured_objects_reencode() {
        let format = WorldFormat::Legacy(NameWidth::Long);
        let world = World {
            format,
            models: vec!["cube.sm".into()],
            textures: Vec::new(),
            objects: vec![object(0, 3)],
            point_cuboids: Vec::new(),
        };
        let bytes = encode_world(&world).unwrap();
        let decoded = read_world(&bytes, format).unwrap();
        assert_eq!(decoded.objects[0].texture_index, 3);
        assert_eq!(encode_world(&decoded).unwrap(), bytes);

        // Negative indices are still rejected
        let bad = World {
            objects: vec![object(0, -1)],
            ..world
        };
        assert!(matches!(
            encode_world(&bad),
            Err(FormatError::IndexOutOfTable { index: -1, .. })
        ));
    }

    #[test]
    fn test_write_world_matches_encode() {
        let world = World {
            format: WorldFormat::Current,
            models: vec!["cube.sm".into()],
            textures: vec!["wood.simg".into()],
            objects: vec![object(0, 0)],
            point_cuboids: Vec::new(),
        };
        let mut sink = Vec::new();
        write_world(&mut sink, &world).unwrap();
        assert_eq!(sink, encode_world(&world).unwrap());

        let bad = World {
            objects: vec![object(1, 0)],
            ..world
        };
        let err = write_world(&mut Vec::new(), &bad).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::Other);
    }

    fn object(model_index: i32, texture_index: i32) -> WorldObject {
        WorldObject {
            model_index,
            texture_index,
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    fn sample_world() -> World {
        World {
            format: WorldFormat::Current,
            models: vec!["crate.sm".into(), "rock.sm".into()],
            textures: vec!["wood.simg".into()],
            objects: vec![object(0, 0), object(1, 0), object(0, 0)],
            point_cuboids: vec![PointCuboid {
                centre: Vec3::new(0.0, -1.0, 0.0),
                dimension: Vec3::new(10.0, 1.0, 10.0),
            }],
        }
    }

    #[test]
    fn test_current_layout_size() {
        let bytes = encode_world(&sample_world()).unwrap();
        assert_eq!(&bytes[0..4], &[0x53, 0x57, 0x00, 0x00]);
        let header = SwHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header, SwHeader::new(2, 1, 3, 1));
        assert_eq!(
            bytes.len(),
            SwHeader::SIZE + 3 * 20 + 3 * OBJECT_SIZE + POINT_CUBOID_SIZE
        );
        // Model table starts right after the header
        assert_eq!(&bytes[20..28], b"crate.sm");
        assert!(bytes[28..40].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_current_round_trip() {
        let world = sample_world();
        let bytes = encode_world(&world).unwrap();
        assert_eq!(read_world(&bytes, WorldFormat::Current).unwrap(), world);
    }

    #[test]
    fn test_legacy_layout() {
        let world = World {
            format: WorldFormat::Legacy(NameWidth::Short),
            models: vec!["cube.sm".into()],
            textures: vec![],
            objects: vec![object(0, 0)],
            point_cuboids: vec![],
        };
        let bytes = encode_world(&world).unwrap();
        let header = LegacySwHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header, LegacySwHeader::new(1, 1));
        assert_eq!(header.reserved, 0);
        assert_eq!(bytes.len(), LegacySwHeader::SIZE + 10 + OBJECT_SIZE);
        assert_eq!(
            read_world(&bytes, WorldFormat::Legacy(NameWidth::Short)).unwrap(),
            world
        );
    }

    #[test]
    fn test_legacy_rejects_point_cuboids() {
        let mut world = sample_world();
        world.format = WorldFormat::Legacy(NameWidth::Long);
        assert_eq!(
            encode_world(&world),
            Err(FormatError::UnsupportedInLegacy {
                what: "point cuboids"
            })
        );
    }

    #[test]
    fn test_out_of_range_indices_rejected() {
        let mut world = sample_world();
        world.objects.push(object(2, 0));
        assert!(matches!(
            encode_world(&world),
            Err(FormatError::IndexOutOfTable {
                object: 3,
                kind: ReferenceKind::Model,
                index: 2,
                len: 2
            })
        ));

        let mut world = sample_world();
        world.objects[0].model_index = -1;
        assert!(encode_world(&world).is_err());

        let mut world = sample_world();
        world.objects[1].texture_index = 1;
        assert!(matches!(
            encode_world(&world),
            Err(FormatError::IndexOutOfTable {
                kind: ReferenceKind::Texture,
                ..
            })
        ));
    }

    #[test]
    fn test_name_overflow_writes_nothing() {
        let mut world = sample_world();
        world.textures[0] = "a_texture_name_too_long.simg".into();
        let err = encode_world(&world).unwrap_err();
        assert!(matches!(err, FormatError::FieldOverflow { width: 20, .. }));
    }

    #[test]
    fn test_read_with_wrong_layout_fails() {
        let bytes = encode_world(&sample_world()).unwrap();
        assert!(read_world(&bytes, WorldFormat::Legacy(NameWidth::Long)).is_err());
    }

    #[test]
    fn test_format_defaults() {
        assert_eq!(WorldFormat::default(), WorldFormat::Current);
        assert_eq!(WorldFormat::Current.name_width(), 20);
        assert_eq!(WorldFormat::Legacy(NameWidth::Short).name_width(), 10);
        assert_eq!(WorldFormat::Current.default_policy(), TransformPolicy::Current);
        assert_eq!(
            WorldFormat::Legacy(NameWidth::Long).default_policy(),
            TransformPolicy::Legacy
        );
    }
}
