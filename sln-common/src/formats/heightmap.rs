//! ST heightmap format (.st)
//!
//! # Layout
//! ```text
//! 0x00: signature "ST\0\0"
//! 0x04: width i32
//! 0x08: height i32
//! 0x0C: samples (width × height × f32), column-major: x outer, y inner
//! ```
//!
//! Samples are stored unscaled, exactly as read from the source image.

use super::serialization::{get_i32, put_i32};
use super::{ByteReader, ST_SIGNATURE, check_signature};
use crate::FormatError;
use crate::error::count_i32;

/// ST header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StHeader {
    pub width: i32,
    pub height: i32,
}

impl StHeader {
    pub const SIZE: usize = 12;

    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&ST_SIGNATURE);
        put_i32(&mut bytes, 4, self.width);
        put_i32(&mut bytes, 8, self.height);
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..4] != ST_SIGNATURE {
            return None;
        }
        Some(Self {
            width: get_i32(bytes, 4),
            height: get_i32(bytes, 8),
        })
    }
}

/// Grid of height samples
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    pub width: u32,
    pub height: u32,
    /// Samples in file order: index `x × height + y`
    samples: Vec<f32>,
}

impl Heightmap {
    /// Build from samples already in file order (x outer, y inner)
    pub fn from_samples(width: u32, height: u32, samples: Vec<f32>) -> Result<Self, FormatError> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(FormatError::SampleBufferSize {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build by sampling `f(x, y)` for every cell
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for x in 0..width {
            for y in 0..height {
                samples.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            samples,
        }
    }

    pub fn sample(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples
            .get(x as usize * self.height as usize + y as usize)
            .copied()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// Encode a heightmap into a complete ST blob
pub fn encode_heightmap(heightmap: &Heightmap) -> Result<Vec<u8>, FormatError> {
    let header = StHeader::new(
        count_i32("width", heightmap.width as usize)?,
        count_i32("height", heightmap.height as usize)?,
    );

    let mut out = Vec::with_capacity(StHeader::SIZE + heightmap.samples.len() * 4);
    out.extend_from_slice(&header.to_bytes());
    for sample in &heightmap.samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    Ok(out)
}

/// Decode an ST blob
pub fn read_heightmap(bytes: &[u8]) -> Result<Heightmap, FormatError> {
    check_signature(bytes, ST_SIGNATURE)?;
    let mut r = ByteReader::new(bytes);
    r.take(4)?;
    let width = r.count("width")?;
    let height = r.count("height")?;
    let count = width.saturating_mul(height);
    // Reject short input before allocating for the claimed size
    let body = r.take(count.saturating_mul(4))?;
    r.finish()?;

    let samples = body
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Heightmap::from_samples(width as u32, height as u32, samples)
}
