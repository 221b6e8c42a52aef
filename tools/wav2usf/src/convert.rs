//! WAV -> UGSF conversion pipeline
//!
//! WaveSource -> downmix -> gain -> resample -> bit-depth normalize ->
//! post-scale -> ADPCM encode -> container writer.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use usf_adpcm::NibbleOrder;

use crate::audio::{self, PcmBuffer};
use crate::error::ConvertError;
use crate::formats::{USF_EXTENSION, write_usf_file};

/// Nibble placement as chosen on the command line or in a manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NibblePacking {
    /// First sample of each pair in bits 0-3
    #[default]
    LowFirst,
    /// First sample of each pair in bits 4-7 (legacy tooling layout)
    HighFirst,
}

impl From<NibblePacking> for NibbleOrder {
    fn from(packing: NibblePacking) -> Self {
        match packing {
            NibblePacking::LowFirst => NibbleOrder::LowFirst,
            NibblePacking::HighFirst => NibbleOrder::HighFirst,
        }
    }
}

/// Per-conversion settings
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Sound name stored in the header (defaults to the input base name)
    pub name: Option<String>,
    pub nibble_order: NibblePacking,
}

/// Result of running the PCM pipeline on one buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSound {
    /// Mono frames produced by the resampler
    pub frame_count: usize,
    /// Samples actually stored in the payload: `frame_count` rounded down to
    /// even, since an unpaired last code is not packed
    pub sample_count: usize,
    /// Packed ADPCM payload (`sample_count / 2` bytes)
    pub payload: Vec<u8>,
}

/// Summary of a converted file
#[derive(Debug, Clone)]
pub struct ConvertedSound {
    pub name: String,
    pub output: PathBuf,
    pub source_rate: u32,
    pub source_channels: u16,
    /// Samples stored in the written payload
    pub sample_count: usize,
    pub payload_len: usize,
}

/// Run the PCM pipeline on decoded audio and encode the result
pub fn convert_wave(buffer: PcmBuffer, order: NibbleOrder) -> Result<EncodedSound, ConvertError> {
    let mono = audio::downmix(buffer)?;
    tracing::debug!("Downmixed to {} mono frames", mono.frame_count());

    let gained = audio::apply_gain(mono);
    let resampled = audio::resample(gained)?;
    let widened = audio::normalize_bit_depth(resampled);
    let scaled = audio::post_scale(widened)?;

    let pcm = scaled.to_i16_mono()?;
    let payload = usf_adpcm::encode_adpcm(&pcm, order);
    let sample_count = payload.len() * 2;
    if sample_count < pcm.len() {
        tracing::debug!("Dropped unpaired trailing sample");
    }
    tracing::debug!(
        "Encoded {} samples to {} ADPCM bytes ({:?})",
        sample_count,
        payload.len(),
        order
    );

    Ok(EncodedSound {
        frame_count: pcm.len(),
        sample_count,
        payload,
    })
}

/// Sound name derived from an input path: the file name up to its first `.`
///
/// Falls back to the whole file name when that prefix is empty (dotfiles).
pub fn sound_name_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}

/// Default output location for a sound: `<name>.usf` in the working directory
pub fn default_output_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}", name, USF_EXTENSION))
}

/// Convert a WAV file to a UGSF file
///
/// When `output` is `None` the file is written to [`default_output_path`].
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<ConvertedSound, ConvertError> {
    let name = options
        .name
        .clone()
        .unwrap_or_else(|| sound_name_from_path(input));
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(&name));

    let buffer = audio::load_wav(input)?;
    let source_rate = buffer.sample_rate();
    let source_channels = buffer.channels();

    let encoded = convert_wave(buffer, options.nibble_order.into())?;
    write_usf_file(&output, &name, &encoded.payload)?;

    tracing::info!(
        "Converted sound '{}': {} samples ({}Hz, {}ch -> {}Hz mono), {} byte payload -> {:?}",
        name,
        encoded.sample_count,
        source_rate,
        source_channels,
        audio::TARGET_SAMPLE_RATE,
        encoded.payload.len(),
        output
    );

    Ok(ConvertedSound {
        name,
        output,
        source_rate,
        source_channels,
        sample_count: encoded.sample_count,
        payload_len: encoded.payload.len(),
    })
}
