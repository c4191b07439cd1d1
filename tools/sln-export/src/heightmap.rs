//! Greyscale image to ST conversion
//!
//! Samples are the raw luminance values, unscaled: 8-bit images give
//! `0..=255`, anything deeper is read at 16 bits and gives `0..=65535`.

use anyhow::{Context, Result};
use image::DynamicImage;
use sln_common::{Heightmap, encode_heightmap};
use std::path::Path;

use crate::output::write_atomic;

/// Build a heightmap from a decoded image (x outer, y inner)
pub fn heightmap_from_image(img: &DynamicImage) -> Heightmap {
    let color = img.color();
    let bits_per_channel = color.bits_per_pixel() / u16::from(color.channel_count());

    if bits_per_channel <= 8 {
        let luma = img.to_luma8();
        Heightmap::from_fn(luma.width(), luma.height(), |x, y| {
            f32::from(luma.get_pixel(x, y).0[0])
        })
    } else {
        let luma = img.to_luma16();
        Heightmap::from_fn(luma.width(), luma.height(), |x, y| {
            f32::from(luma.get_pixel(x, y).0[0])
        })
    }
}

/// Decode an image file into a heightmap
pub fn load_heightmap(input: &Path) -> Result<Heightmap> {
    let img = image::open(input)
        .with_context(|| format!("Failed to load heightmap image: {}", input.display()))?;
    Ok(heightmap_from_image(&img))
}

/// Convert a greyscale image to ST bytes in memory
pub fn convert_heightmap_to_memory(input: &Path) -> Result<Vec<u8>> {
    let heightmap = load_heightmap(input)?;
    let bytes = encode_heightmap(&heightmap)
        .with_context(|| format!("Failed to encode heightmap: {}", input.display()))?;

    tracing::info!(
        "Converted heightmap: {}x{} samples",
        heightmap.width,
        heightmap.height
    );
    Ok(bytes)
}

/// Convert a greyscale image to an ST file
pub fn convert_heightmap(input: &Path, output: &Path) -> Result<()> {
    let bytes = convert_heightmap_to_memory(input)?;
    write_atomic(output, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma};
    use sln_common::read_heightmap;

    #[test]
    fn test_luma8_samples_unscaled() {
        let mut img = GrayImage::new(3, 2);
        img.put_pixel(2, 1, Luma([255]));
        img.put_pixel(1, 0, Luma([7]));
        let map = heightmap_from_image(&DynamicImage::ImageLuma8(img));

        assert_eq!((map.width, map.height), (3, 2));
        assert_eq!(map.sample(2, 1), Some(255.0));
        assert_eq!(map.sample(1, 0), Some(7.0));
        assert_eq!(map.sample(0, 0), Some(0.0));
        // x outer, y inner: (1, 0) is the third sample
        assert_eq!(map.samples()[2], 7.0);
    }

    #[test]
    fn test_luma16_keeps_full_range() {
        let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(2, 2);
        img.put_pixel(1, 1, Luma([65535]));
        img.put_pixel(0, 1, Luma([1000]));
        let map = heightmap_from_image(&DynamicImage::ImageLuma16(img));

        assert_eq!(map.sample(1, 1), Some(65535.0));
        assert_eq!(map.sample(0, 1), Some(1000.0));
    }

    #[test]
    fn test_convert_png_heightmap() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("terrain.png");
        let st = dir.path().join("terrain.st");

        let img = GrayImage::from_fn(4, 3, |x, y| Luma([(x * 10 + y) as u8]));
        img.save(&png).unwrap();

        convert_heightmap(&png, &st).unwrap();
        let bytes = std::fs::read(&st).unwrap();
        assert_eq!(bytes.len(), 12 + 4 * 3 * 4);

        let map = read_heightmap(&bytes).unwrap();
        assert_eq!(map.sample(3, 2), Some(32.0));
        assert_eq!(map.sample(1, 2), Some(12.0));
    }
}
