//! UGSF binary sound format (.usf)
//!
//! All multi-byte fields are little-endian and the header is packed with no
//! padding between fields, so the layout is identical on every host.
//!
//! All format headers implement the [`BinarySerializable`] trait for consistent
//! serialization/deserialization.

mod serialization;
pub mod sound;

pub use serialization::BinarySerializable;
pub use sound::*;
