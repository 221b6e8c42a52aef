//! WAV input (hound)

use std::io::{Cursor, Read};
use std::path::Path;

use super::{PcmBuffer, SampleWidth};
use crate::error::{ConvertError, Stage};

/// Load a WAV file into a [`PcmBuffer`]
///
/// Only integer PCM at 8 or 16 bits per sample with one or two channels is
/// accepted. 8-bit samples come back unsigned (silence = 128), exactly as
/// they are stored in the file.
pub fn load_wav(path: &Path) -> Result<PcmBuffer, ConvertError> {
    let input = path.display().to_string();
    let reader = hound::WavReader::open(path).map_err(|e| open_error(&input, e))?;
    read_pcm(reader, &input)
}

/// Load WAV data already held in memory
pub fn load_wav_bytes(data: &[u8]) -> Result<PcmBuffer, ConvertError> {
    let input = "<memory>";
    let reader = hound::WavReader::new(Cursor::new(data)).map_err(|e| open_error(input, e))?;
    read_pcm(reader, input)
}

fn open_error(input: &str, err: hound::Error) -> ConvertError {
    match err {
        hound::Error::Unsupported => ConvertError::unsupported(
            Stage::WaveSource,
            format!("{}: unsupported WAVE encoding", input),
        ),
        source => ConvertError::UnreadableInput {
            stage: Stage::WaveSource,
            input: input.to_string(),
            source,
        },
    }
}

fn read_pcm<R: Read>(
    mut reader: hound::WavReader<R>,
    input: &str,
) -> Result<PcmBuffer, ConvertError> {
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int {
        return Err(ConvertError::unsupported(
            Stage::WaveSource,
            format!("{}: floating-point samples are not supported", input),
        ));
    }
    let width = match spec.bits_per_sample {
        8 => SampleWidth::U8,
        16 => SampleWidth::S16,
        bits => {
            return Err(ConvertError::unsupported(
                Stage::WaveSource,
                format!("{}: {} bits per sample (expected 8 or 16)", input, bits),
            ));
        }
    };
    if !(1..=2).contains(&spec.channels) {
        return Err(ConvertError::unsupported(
            Stage::WaveSource,
            format!("{}: {} channels (expected 1 or 2)", input, spec.channels),
        ));
    }

    // hound re-centres 8-bit samples around zero; shift back to unsigned
    let offset = match width {
        SampleWidth::U8 => 128,
        SampleWidth::S16 => 0,
    };

    // Trailing bytes that do not form a whole frame are ignored
    let whole = reader.duration() as usize * spec.channels as usize;
    let samples = reader
        .samples::<i32>()
        .take(whole)
        .map(|s| s.map(|v| v + offset))
        .collect::<Result<Vec<i32>, _>>()
        .map_err(|source| ConvertError::UnreadableInput {
            stage: Stage::WaveSource,
            input: input.to_string(),
            source,
        })?;

    tracing::debug!(
        "Loaded {}: {} frames, {} channel(s), {}-bit, {}Hz",
        input,
        samples.len() / spec.channels as usize,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_rate
    );

    PcmBuffer::new(samples, width, spec.channels, spec.sample_rate)
}
