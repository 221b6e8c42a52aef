//! Stereo to mono downmix

use super::{PcmBuffer, div_round_even};
use crate::error::{ConvertError, Stage};

/// Collapse a buffer to one channel
///
/// Mono passes through unchanged. Stereo frames become the rounded average
/// of left and right, so identical channels reproduce exactly.
pub fn downmix(buffer: PcmBuffer) -> Result<PcmBuffer, ConvertError> {
    match buffer.channels() {
        1 => Ok(buffer),
        2 => {
            let width = buffer.width();
            let rate = buffer.sample_rate();
            let mono = buffer
                .samples()
                .chunks_exact(2)
                .map(|frame| div_round_even(frame[0] as i64 + frame[1] as i64, 2) as i32)
                .collect();
            Ok(PcmBuffer::from_parts(mono, width, 1, rate))
        }
        n => Err(ConvertError::unsupported(
            Stage::Downmix,
            format!("{} channels (expected 1 or 2)", n),
        )),
    }
}
