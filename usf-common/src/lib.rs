//! Shared types for the UGSF sound container
//!
//! This crate provides the container layout shared between:
//! - `wav2usf` (conversion pipeline and `inspect` command)
//! - `usf-adpcm` consumers that need to locate the payload
//!
//! # Modules
//!
//! - [`formats`] - UGSF header layout and the [`BinarySerializable`] trait

pub mod formats;

// Re-export commonly used format items
pub use formats::{
    BITS_PER_SAMPLE, BinarySerializable, CODEC_FLAGS_ADPCM, DEFAULT_LOOP_COUNT, NAME_LEN,
    SAMPLE_COUNT_ENTIRE_PAYLOAD, SAMPLE_RATE, USF_EXTENSION, USF_MAGIC, UsfError, UsfSoundHeader,
    VERSION_NAMED, VERSION_UNNAMED,
};
