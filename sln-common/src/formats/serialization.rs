//! Binary serialization trait for format headers.
//!
//! All sln format headers implement `BinarySerializable` for consistent
//! serialization/deserialization. Each header also keeps a type-specific
//! `to_bytes()` returning a fixed-size array.

/// Trait for binary-serializable format headers.
///
/// The trait uses `Vec<u8>` for the return type because associated const
/// generics in return types (`[u8; Self::SIZE]`) are not yet stable in Rust.
///
/// # Example
///
/// ```
/// use sln_common::formats::{BinarySerializable, SimgHeader};
///
/// let header = SimgHeader::new(64, 64);
///
/// // Using the trait (returns Vec<u8>)
/// let bytes = header.serialize();
/// let parsed = SimgHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed.width, 64);
///
/// // Using the type-specific method (returns [u8; 12])
/// let bytes_array = header.to_bytes();
/// assert_eq!(&bytes_array[0..4], b"SIMG");
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes, signature included.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short or the signature does
    /// not match.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_binary_serializable {
    ($($header:ty),* $(,)?) => {
        $(
            impl BinarySerializable for $header {
                const SIZE: usize = <$header>::SIZE;

                fn serialize(&self) -> Vec<u8> {
                    self.to_bytes().to_vec()
                }

                fn deserialize(bytes: &[u8]) -> Option<Self> {
                    Self::from_bytes(bytes)
                }
            }
        )*
    };
}

impl_binary_serializable!(
    super::SmHeader,
    super::SimgHeader,
    super::StHeader,
    super::SwHeader,
    super::LegacySwHeader,
);

/// Write a little-endian i32 into `bytes` at `offset`
pub(crate) fn put_i32(bytes: &mut [u8], offset: usize, value: i32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Read a little-endian i32 from `bytes` at `offset`
pub(crate) fn get_i32(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
