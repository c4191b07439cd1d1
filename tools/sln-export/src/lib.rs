//! sln-export library
//!
//! Converts authoring assets (PLY meshes, BMP/PNG images, greyscale
//! heightmaps, JSON scene descriptions) into the engine's binary formats.
//! The format encoders themselves live in `sln-common`; this crate reads
//! inputs, drives the encoders and writes files.

pub mod cli;
pub mod heightmap;
pub mod manifest;
pub mod mesh;
pub mod output;
pub mod scene;
pub mod source;
pub mod texture;

pub use heightmap::{convert_heightmap, convert_heightmap_to_memory};
pub use mesh::{convert_mesh, convert_ply, convert_ply_to_memory};
pub use output::write_atomic;
pub use scene::{SceneDescription, convert_scene, convert_scene_to_memory};
pub use source::{FileSource, ImageSource, MeshSource};
pub use texture::{convert_image, convert_image_to_memory};
