//! Binary asset formats for the sln engine
//!
//! This crate is shared between:
//! - the engine runtime (reads the files)
//! - `sln-export` (writes them)
//!
//! # Modules
//!
//! - [`formats`] - SM, SW, SIMG and ST layouts, encoders and decoders
//! - [`transform`] - Authoring space to engine space conversion
//! - [`scene`] - World assembly from authoring-space placements
//! - [`error`] - Structured format errors

pub mod error;
pub mod formats;
pub mod scene;
pub mod transform;

pub use error::{ErrorKind, FormatError, ReferenceKind};
pub use transform::{TransformPolicy, degrees_to_radians, remap_axes, swap_yz};

// Re-export commonly used format items
pub use formats::{
    // Signatures and extensions
    HEIGHTMAP_EXT,
    MESH_EXT,
    NAME_WIDTH,
    SHORT_NAME_WIDTH,
    SIMG_SIGNATURE,
    SM_SIGNATURE,
    ST_SIGNATURE,
    SW_SIGNATURE,
    TEXTURE_EXT,
    WORLD_EXT,
    // Headers
    BinarySerializable,
    LegacySwHeader,
    SimgHeader,
    SmHeader,
    StHeader,
    SwHeader,
    // Data types
    Heightmap,
    Mesh,
    NameTable,
    NameWidth,
    PointCuboid,
    Texture,
    Triangle,
    Vertex,
    World,
    WorldFormat,
    WorldObject,
    // Codecs
    decode_names,
    encode_heightmap,
    encode_mesh,
    encode_names,
    encode_texture,
    encode_world,
    read_heightmap,
    read_mesh,
    read_texture,
    read_world,
    write_mesh,
    write_world,
};

pub use scene::{EntityKind, Placement, SceneEntity, TextureRef, WorldBuilder, assemble_world};
