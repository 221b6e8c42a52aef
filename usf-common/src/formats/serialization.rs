//! Binary serialization trait for format headers.
//!
//! Format headers implement `BinarySerializable` for generic code, while
//! each header keeps its type-specific `to_bytes()` returning a fixed-size
//! array.

/// Trait for binary-serializable format headers.
///
/// The trait uses `Vec<u8>` for the return type because associated const
/// generics in return types (`[u8; Self::SIZE]`) are not yet stable in Rust.
///
/// # Example
///
/// ```
/// use usf_common::formats::{BinarySerializable, UsfSoundHeader};
///
/// let header = UsfSoundHeader::new("beep");
///
/// // Using the trait (returns Vec<u8>)
/// let bytes = header.serialize();
/// let parsed = UsfSoundHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed.name_str(), "beep");
///
/// // Using the type-specific method (returns [u8; 48])
/// let bytes_array = header.to_bytes();
/// assert_eq!(bytes_array.len(), 48);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short or contains invalid data.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::UsfSoundHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}
