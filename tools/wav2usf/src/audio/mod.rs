//! PCM pipeline stages (WAV -> 11025 Hz mono 16-bit PCM)
//!
//! Each stage takes a [`PcmBuffer`] by value and returns a new one, so the
//! pipeline is a straight chain with no shared mutable state. All sample
//! arithmetic is integer and rounds half to even.

mod level;
mod mix;
mod resample;
mod source;

pub use level::{GAIN_DENOMINATOR, GAIN_NUMERATOR, apply_gain, normalize_bit_depth, post_scale};
pub use mix::downmix;
pub use resample::{TARGET_SAMPLE_RATE, output_frame_count, resample, resample_linear};
pub use source::{load_wav, load_wav_bytes};

use crate::error::{ConvertError, Stage};

/// Bytes per sample of a PCM stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    /// 1 byte, unsigned, 128 = silence
    U8,
    /// 2 bytes, signed
    S16,
}

impl SampleWidth {
    pub fn min(self) -> i32 {
        match self {
            SampleWidth::U8 => 0,
            SampleWidth::S16 => i16::MIN as i32,
        }
    }

    pub fn max(self) -> i32 {
        match self {
            SampleWidth::U8 => u8::MAX as i32,
            SampleWidth::S16 => i16::MAX as i32,
        }
    }

    /// Saturate `value` to the representable range
    #[inline]
    pub fn clamp(self, value: i64) -> i32 {
        value.clamp(self.min() as i64, self.max() as i64) as i32
    }
}

/// Decoded PCM audio
///
/// Samples are interleaved by channel. The sample count is always a whole
/// number of frames and every sample lies within the range of `width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    samples: Vec<i32>,
    width: SampleWidth,
    channels: u16,
    sample_rate: u32,
}

impl PcmBuffer {
    /// Validate and wrap interleaved samples
    ///
    /// The sample rate is not checked here; the resampler rejects a zero rate.
    pub fn new(
        samples: Vec<i32>,
        width: SampleWidth,
        channels: u16,
        sample_rate: u32,
    ) -> Result<Self, ConvertError> {
        if !(1..=2).contains(&channels) {
            return Err(ConvertError::unsupported(
                Stage::WaveSource,
                format!("{} channels (expected 1 or 2)", channels),
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(ConvertError::unsupported(
                Stage::WaveSource,
                format!(
                    "{} samples is not a whole number of {}-channel frames",
                    samples.len(),
                    channels
                ),
            ));
        }
        if let Some(&bad) = samples
            .iter()
            .find(|&&s| s < width.min() || s > width.max())
        {
            return Err(ConvertError::unsupported(
                Stage::WaveSource,
                format!("sample {} out of range for {:?}", bad, width),
            ));
        }

        Ok(Self::from_parts(samples, width, channels, sample_rate))
    }

    /// Wrap samples a stage has already produced in range
    pub(crate) fn from_parts(
        samples: Vec<i32>,
        width: SampleWidth,
        channels: u16,
        sample_rate: u32,
    ) -> Self {
        Self {
            samples,
            width,
            channels,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i32> {
        self.samples
    }

    pub fn width(&self) -> SampleWidth {
        self.width
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Samples as 16-bit PCM, for the ADPCM encoder
    ///
    /// Fails unless the buffer is mono 16-bit.
    pub fn to_i16_mono(&self) -> Result<Vec<i16>, ConvertError> {
        if self.channels != 1 || self.width != SampleWidth::S16 {
            return Err(ConvertError::unsupported(
                Stage::Adpcm,
                format!(
                    "encoder expects mono 16-bit PCM, got {} channels {:?}",
                    self.channels, self.width
                ),
            ));
        }
        Ok(self.samples.iter().map(|&s| s as i16).collect())
    }
}

/// Integer division rounding to nearest, ties to even
///
/// `den` must be positive.
#[inline]
pub(crate) fn div_round_even(num: i64, den: i64) -> i64 {
    let q = num.div_euclid(den);
    let twice_rem = 2 * num.rem_euclid(den);
    if twice_rem > den || (twice_rem == den && q % 2 != 0) {
        q + 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_round_even() {
        assert_eq!(div_round_even(10, 4), 2); // 2.5
        assert_eq!(div_round_even(14, 4), 4); // 3.5
        assert_eq!(div_round_even(-10, 4), -2); // -2.5
        assert_eq!(div_round_even(-14, 4), -4); // -3.5
        assert_eq!(div_round_even(-3, 2), -2); // -1.5
        assert_eq!(div_round_even(7, 3), 2);
        assert_eq!(div_round_even(8, 3), 3);
        assert_eq!(div_round_even(-7, 3), -2);
        assert_eq!(div_round_even(0, 5), 0);
    }

    #[test]
    fn test_buffer_rejects_bad_channels() {
        let err = PcmBuffer::new(vec![0; 6], SampleWidth::S16, 3, 44100).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));

        let err = PcmBuffer::new(vec![], SampleWidth::S16, 0, 44100).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_buffer_rejects_partial_frame() {
        assert!(PcmBuffer::new(vec![0; 3], SampleWidth::S16, 2, 44100).is_err());
    }

    #[test]
    fn test_buffer_rejects_out_of_range() {
        assert!(PcmBuffer::new(vec![256], SampleWidth::U8, 1, 8000).is_err());
        assert!(PcmBuffer::new(vec![-1], SampleWidth::U8, 1, 8000).is_err());
        assert!(PcmBuffer::new(vec![40000], SampleWidth::S16, 1, 8000).is_err());
        assert!(PcmBuffer::new(vec![0, 255], SampleWidth::U8, 1, 8000).is_ok());
    }

    #[test]
    fn test_buffer_frame_count() {
        let buf = PcmBuffer::new(vec![1, 2, 3, 4], SampleWidth::S16, 2, 22050).unwrap();
        assert_eq!(buf.frame_count(), 2);
        assert_eq!(buf.channels(), 2);
        assert_eq!(buf.sample_rate(), 22050);
    }

    #[test]
    fn test_to_i16_requires_mono_16bit() {
        let stereo = PcmBuffer::new(vec![1, 2], SampleWidth::S16, 2, 11025).unwrap();
        assert!(stereo.to_i16_mono().is_err());

        let bytes = PcmBuffer::new(vec![1, 2], SampleWidth::U8, 1, 11025).unwrap();
        assert!(bytes.to_i16_mono().is_err());

        let mono = PcmBuffer::new(vec![-5, 7], SampleWidth::S16, 1, 11025).unwrap();
        assert_eq!(mono.to_i16_mono().unwrap(), vec![-5i16, 7]);
    }

    #[test]
    fn test_sample_width() {
        assert_eq!(SampleWidth::S16.clamp(100_000), 32767);
        assert_eq!(SampleWidth::U8.clamp(-4), 0);
    }
}
