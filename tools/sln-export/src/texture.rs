//! Image to SIMG conversion

use anyhow::{Context, Result};
use image::DynamicImage;
use sln_common::{Texture, encode_texture};
use std::path::Path;

use crate::output::write_atomic;

/// Convert a decoded image to RGBA8, rows top to bottom
pub fn texture_from_image(img: &DynamicImage) -> Result<Texture> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Texture::from_rgba8(width, height, rgba.into_raw())?)
}

/// Decode an image file (BMP or PNG) into a texture
pub fn load_texture(input: &Path) -> Result<Texture> {
    let img = image::open(input).with_context(|| format!("Failed to load image: {}", input.display()))?;
    texture_from_image(&img).with_context(|| format!("Invalid image: {}", input.display()))
}

/// Convert an image file to SIMG bytes in memory
pub fn convert_image_to_memory(input: &Path) -> Result<Vec<u8>> {
    let texture = load_texture(input)?;
    let bytes = encode_texture(&texture)
        .with_context(|| format!("Failed to encode texture: {}", input.display()))?;

    tracing::info!("Converted texture: {}x{} RGBA8", texture.width, texture.height);
    Ok(bytes)
}

/// Convert an image file to an SIMG file
pub fn convert_image(input: &Path, output: &Path) -> Result<()> {
    let bytes = convert_image_to_memory(input)?;
    write_atomic(output, &bytes)
}
