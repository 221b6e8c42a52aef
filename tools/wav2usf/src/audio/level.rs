//! Level stages: fixed gain, 8 -> 16 bit widening, and the final post-scale

use super::{PcmBuffer, SampleWidth, div_round_even};
use crate::error::{ConvertError, Stage};

/// Fixed gain applied before resampling (0.98 as an exact fraction)
pub const GAIN_NUMERATOR: i64 = 49;
pub const GAIN_DENOMINATOR: i64 = 50;

/// Divisor applied to 16-bit samples just before ADPCM encoding
const POST_SCALE_DIVISOR: i64 = 256;

/// Scale every sample by 0.98 with rounding, saturating at the width limits
///
/// Unsigned 8-bit samples are multiplied as-is, so their silence point drifts
/// from 128 to 125.
pub fn apply_gain(buffer: PcmBuffer) -> PcmBuffer {
    let width = buffer.width();
    let channels = buffer.channels();
    let rate = buffer.sample_rate();
    let samples = buffer
        .into_samples()
        .into_iter()
        .map(|s| width.clamp(div_round_even(s as i64 * GAIN_NUMERATOR, GAIN_DENOMINATOR)))
        .collect();
    PcmBuffer::from_parts(samples, width, channels, rate)
}

/// Widen unsigned 8-bit samples to signed 16-bit: `(s - 128) * 256`
///
/// 16-bit input passes through unchanged.
pub fn normalize_bit_depth(buffer: PcmBuffer) -> PcmBuffer {
    match buffer.width() {
        SampleWidth::S16 => buffer,
        SampleWidth::U8 => {
            let channels = buffer.channels();
            let rate = buffer.sample_rate();
            let samples = buffer
                .into_samples()
                .into_iter()
                .map(|s| (s - 128) * 256)
                .collect();
            PcmBuffer::from_parts(samples, SampleWidth::S16, channels, rate)
        }
    }
}

/// Divide every 16-bit sample by 256 with rounding
///
/// Output stays 16-bit but only spans -128..=128.
pub fn post_scale(buffer: PcmBuffer) -> Result<PcmBuffer, ConvertError> {
    if buffer.width() != SampleWidth::S16 {
        return Err(ConvertError::unsupported(
            Stage::PostScale,
            format!("expected 16-bit samples, got {:?}", buffer.width()),
        ));
    }

    let channels = buffer.channels();
    let rate = buffer.sample_rate();
    let samples = buffer
        .into_samples()
        .into_iter()
        .map(|s| div_round_even(s as i64, POST_SCALE_DIVISOR) as i32)
        .collect();
    Ok(PcmBuffer::from_parts(
        samples,
        SampleWidth::S16,
        channels,
        rate,
    ))
}
