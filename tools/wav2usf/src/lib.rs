//! wav2usf library
//!
//! Converts PCM WAV audio to UGSF sound files: mono, 11025 Hz, IMA ADPCM.
//! The binary is a thin CLI over [`convert_file`] and [`manifest::build_all`].

pub mod audio;
pub mod convert;
pub mod error;
pub mod formats;
pub mod manifest;

// Re-export the conversion entry points
pub use convert::{
    ConvertOptions, ConvertedSound, EncodedSound, NibblePacking, convert_file, convert_wave,
    default_output_path, sound_name_from_path,
};
pub use error::{ConvertError, Stage};

// Re-export the codec and header types callers need alongside them
pub use usf_adpcm::NibbleOrder;
pub use usf_common::UsfSoundHeader;
