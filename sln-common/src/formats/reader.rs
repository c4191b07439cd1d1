//! Little-endian cursor used by the decoders

use glam::Vec3;

use crate::FormatError;

pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let end = self.pos.checked_add(len).filter(|&end| end <= self.bytes.len());
        let Some(end) = end else {
            return Err(FormatError::Truncated {
                needed: self.pos.saturating_add(len),
                available: self.bytes.len(),
            });
        };
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_array(&mut self) -> Result<[u8; 4], FormatError> {
        let mut out = [0u8; 4];
        out.copy_from_slice(self.take(4)?);
        Ok(out)
    }

    pub fn i32(&mut self) -> Result<i32, FormatError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    /// Read an i32 that must be non-negative (a count or dimension)
    pub fn count(&mut self, what: &'static str) -> Result<usize, FormatError> {
        let value = self.i32()?;
        usize::try_from(value).map_err(|_| FormatError::NegativeField { what, value })
    }

    pub fn f32(&mut self) -> Result<f32, FormatError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn vec3(&mut self) -> Result<Vec3, FormatError> {
        Ok(Vec3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    /// Fail unless every byte has been consumed
    pub fn finish(self) -> Result<(), FormatError> {
        let extra = self.bytes.len() - self.pos;
        if extra != 0 {
            return Err(FormatError::TrailingBytes { extra });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7i32.to_le_bytes());
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.i32().unwrap(), 7);
        assert_eq!(r.f32().unwrap(), 1.5);
        r.finish().unwrap();
    }

    #[test]
    fn test_truncated() {
        let mut r = ByteReader::new(&[1, 2, 3]);
        assert_eq!(
            r.i32(),
            Err(FormatError::Truncated {
                needed: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_negative_count() {
        let bytes = (-1i32).to_le_bytes();
        let mut r = ByteReader::new(&bytes);
        assert!(matches!(
            r.count("vertex count"),
            Err(FormatError::NegativeField { value: -1, .. })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let r = ByteReader::new(&[0]);
        assert_eq!(r.finish(), Err(FormatError::TrailingBytes { extra: 1 }));
    }
}
