//! SIMG image format (.simg)
//!
//! Uncompressed RGBA8 pixels, uploaded to the GPU without conversion.
//!
//! # Layout
//! ```text
//! 0x00: signature "SIMG"
//! 0x04: width i32
//! 0x08: height i32
//! 0x0C: pixel_data (width × height × 4 bytes, row-major, top row first)
//! ```
//!
//! No vertical flip is applied: sources stored bottom-up must be flipped by
//! the caller.

use super::serialization::{get_i32, put_i32};
use super::{ByteReader, SIMG_SIGNATURE, check_signature};
use crate::FormatError;
use crate::error::count_i32;

/// SIMG header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimgHeader {
    pub width: i32,
    pub height: i32,
}

impl SimgHeader {
    pub const SIZE: usize = 12;

    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Calculate RGBA8 pixel data size (4 bytes per pixel)
    pub fn rgba8_size(&self) -> usize {
        self.width.max(0) as usize * self.height.max(0) as usize * 4
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&SIMG_SIGNATURE);
        put_i32(&mut bytes, 4, self.width);
        put_i32(&mut bytes, 8, self.height);
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..4] != SIMG_SIGNATURE {
            return None;
        }
        Some(Self {
            width: get_i32(bytes, 4),
            height: get_i32(bytes, 8),
        })
    }
}

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// `width × height × 4` bytes, row-major, no row padding
    pub pixels: Vec<u8>,
}

impl Texture {
    /// Wrap an RGBA8 buffer, checking its length
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FormatError> {
        let expected = rgba_len(width, height)?;
        if pixels.len() != expected {
            return Err(FormatError::PixelBufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert normalized `[0, 1]` RGBA floats to RGBA8
    pub fn from_rgba_f32(width: u32, height: u32, pixels: &[f32]) -> Result<Self, FormatError> {
        let bytes = pixels.iter().map(|&v| unorm8(v)).collect();
        Self::from_rgba8(width, height, bytes)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].try_into().ok()
    }
}

/// Byte length of a `width × height` RGBA8 body; dimensions must fit the
/// header's i32 fields
fn rgba_len(width: u32, height: u32) -> Result<usize, FormatError> {
    let w = count_i32("width", width as usize)? as usize;
    let h = count_i32("height", height as usize)? as usize;
    w.checked_mul(h)
        .and_then(|n| n.checked_mul(4))
        .ok_or(FormatError::CountOverflow {
            what: "pixel byte",
            count: usize::MAX,
        })
}

/// `round(v × 255)` clamped to `[0, 255]`
pub fn unorm8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Encode a texture into a complete SIMG blob
pub fn encode_texture(texture: &Texture) -> Result<Vec<u8>, FormatError> {
    let expected = rgba_len(texture.width, texture.height)?;
    if texture.pixels.len() != expected {
        return Err(FormatError::PixelBufferSize {
            width: texture.width,
            height: texture.height,
            expected,
            actual: texture.pixels.len(),
        });
    }
    let header = SimgHeader::new(
        count_i32("width", texture.width as usize)?,
        count_i32("height", texture.height as usize)?,
    );

    let mut out = Vec::with_capacity(SimgHeader::SIZE + expected);
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&texture.pixels);
    Ok(out)
}

/// Decode a SIMG blob
pub fn read_texture(bytes: &[u8]) -> Result<Texture, FormatError> {
    check_signature(bytes, SIMG_SIGNATURE)?;
    let mut r = ByteReader::new(bytes);
    r.take(4)?;
    let width = r.count("width")?;
    let height = r.count("height")?;
    let len = width.saturating_mul(height).saturating_mul(4);
    let pixels = r.take(len)?.to_vec();
    r.finish()?;
    Texture::from_rgba8(width as u32, height as u32, pixels)
}
