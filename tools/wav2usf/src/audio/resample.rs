//! Linear-interpolation resampler
//!
//! Conversion is a pure function of the input: the read position is tracked
//! as an integer index plus a fraction in units of `1 / dst_rate`, so no
//! floating point drift accumulates over long inputs.

use super::{PcmBuffer, div_round_even};
use crate::error::{ConvertError, Stage};

/// Output rate of every converted sound
pub const TARGET_SAMPLE_RATE: u32 = usf_common::SAMPLE_RATE;

/// Read position into the source stream, advanced once per output frame
struct ResamplerState {
    index: usize,
    /// Fractional position, always `< dst`
    frac: u64,
    step_whole: usize,
    step_frac: u64,
    dst: u64,
    /// Held past the end of the input
    last: i32,
}

impl ResamplerState {
    fn new(src_rate: u32, dst_rate: u32, last: i32) -> Self {
        let (src, dst) = (src_rate as u64, dst_rate as u64);
        Self {
            index: 0,
            frac: 0,
            step_whole: (src / dst) as usize,
            step_frac: src % dst,
            dst,
            last,
        }
    }

    fn sample_at(&self, samples: &[i32], i: usize) -> i64 {
        samples.get(i).copied().unwrap_or(self.last) as i64
    }

    fn interpolate(&self, samples: &[i32]) -> i32 {
        let a = self.sample_at(samples, self.index);
        let b = self.sample_at(samples, self.index + 1);
        let frac = self.frac as i64;
        let dst = self.dst as i64;
        div_round_even(a * (dst - frac) + b * frac, dst) as i32
    }

    fn advance(&mut self) {
        self.index += self.step_whole;
        self.frac += self.step_frac;
        if self.frac >= self.dst {
            self.frac -= self.dst;
            self.index += 1;
        }
    }
}

/// Number of output frames for `input_frames` at `src_rate`, rounded to
/// nearest (halves up)
///
/// A zero `src_rate` yields no frames.
pub fn output_frame_count(input_frames: usize, src_rate: u32, dst_rate: u32) -> usize {
    if src_rate == 0 {
        return 0;
    }
    let (src, dst) = (src_rate as u64, dst_rate as u64);
    ((input_frames as u64 * dst + src / 2) / src) as usize
}

/// Resample a mono stream by linear interpolation
///
/// Equal rates return the input unchanged. A zero rate on either side
/// yields an empty stream; [`resample`] rejects a zero source rate before
/// getting here.
pub fn resample_linear(samples: &[i32], src_rate: u32, dst_rate: u32) -> Vec<i32> {
    if src_rate == dst_rate {
        return samples.to_vec();
    }
    if src_rate == 0 || dst_rate == 0 {
        return Vec::new();
    }
    let Some(&last) = samples.last() else {
        return Vec::new();
    };

    let out_len = output_frame_count(samples.len(), src_rate, dst_rate);
    let mut state = ResamplerState::new(src_rate, dst_rate, last);
    let mut output = Vec::with_capacity(out_len);
    for _ in 0..out_len {
        output.push(state.interpolate(samples));
        state.advance();
    }
    output
}

/// Convert a mono buffer to [`TARGET_SAMPLE_RATE`]
pub fn resample(buffer: PcmBuffer) -> Result<PcmBuffer, ConvertError> {
    let src_rate = buffer.sample_rate();
    if src_rate == 0 {
        return Err(ConvertError::unsupported(
            Stage::Resample,
            "source sample rate must be positive",
        ));
    }
    if buffer.channels() != 1 {
        return Err(ConvertError::unsupported(
            Stage::Resample,
            format!("expected mono input, got {} channels", buffer.channels()),
        ));
    }
    if src_rate == TARGET_SAMPLE_RATE {
        return Ok(buffer);
    }

    let width = buffer.width();
    let samples = resample_linear(buffer.samples(), src_rate, TARGET_SAMPLE_RATE);
    tracing::debug!(
        "Resampled {} -> {} frames ({}Hz -> {}Hz)",
        buffer.frame_count(),
        samples.len(),
        src_rate,
        TARGET_SAMPLE_RATE
    );
    Ok(PcmBuffer::from_parts(samples, width, 1, TARGET_SAMPLE_RATE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SampleWidth;

    #[test]
    fn test_same_rate_passthrough() {
        let samples = vec![1, 5, -7, 9];
        assert_eq!(resample_linear(&samples, 11025, 11025), samples);

        let buf = PcmBuffer::new(samples, SampleWidth::S16, 1, 11025).unwrap();
        assert_eq!(resample(buf.clone()).unwrap(), buf);
    }

    #[test]
    fn test_empty_input() {
        assert!(resample_linear(&[], 44100, 11025).is_empty());
        let buf = PcmBuffer::new(vec![], SampleWidth::S16, 1, 44100).unwrap();
        let out = resample(buf).unwrap();
        assert_eq!(out.frame_count(), 0);
        assert_eq!(out.sample_rate(), TARGET_SAMPLE_RATE);
    }

    #[test]
    fn test_zero_rate_rejected() {
        let buf = PcmBuffer::new(vec![0; 4], SampleWidth::S16, 1, 0).unwrap();
        assert_eq!(resample(buf).unwrap_err().stage(), Stage::Resample);
    }

    #[test]
    fn test_zero_rate_yields_nothing() {
        assert_eq!(output_frame_count(1000, 0, 11025), 0);
        assert_eq!(output_frame_count(1000, 44100, 0), 0);
        assert!(resample_linear(&[1, 2, 3], 0, 11025).is_empty());
        assert!(resample_linear(&[1, 2, 3], 44100, 0).is_empty());
    }

    #[test]
    fn test_integer_downsample_picks_every_nth() {
        // 44100 -> 11025 lands exactly on every fourth input frame
        let samples: Vec<i32> = (0..16).map(|i| i * 100).collect();
        assert_eq!(
            resample_linear(&samples, 44100, 11025),
            vec![0, 400, 800, 1200]
        );
    }

    #[test]
    fn test_halving() {
        let samples = vec![10, 20, 30, 40, 50, 60];
        assert_eq!(resample_linear(&samples, 22050, 11025), vec![10, 30, 50]);
    }

    #[test]
    fn test_upsample_interpolates() {
        // 2x upsample inserts midpoints; the final frame holds the last input
        let samples = vec![0, 100, 200];
        assert_eq!(resample_linear(&samples, 5000, 10000), vec![0, 50, 100, 150, 200, 200]);
    }

    #[test]
    fn test_midpoint_rounds_to_even() {
        let samples = vec![1, 2, 3, 4];
        // Midpoints 1.5 and 3.5 round to 2 and 4
        assert_eq!(resample_linear(&samples, 1, 2), vec![1, 2, 2, 2, 3, 4, 4, 4]);
    }

    #[test]
    fn test_constant_stays_constant() {
        let samples = vec![-768; 1000];
        let out = resample_linear(&samples, 22050, 11025);
        assert_eq!(out.len(), 500);
        assert!(out.iter().all(|&s| s == -768));

        let out = resample_linear(&samples, 8000, 11025);
        assert!(out.iter().all(|&s| s == -768));
    }

    #[test]
    fn test_duration_preserved() {
        for &(frames, src) in &[(44100, 44100), (1000, 22050), (7, 48000), (12345, 8000), (3, 32000)] {
            let out = output_frame_count(frames, src, 11025) as f64;
            let expected = frames as f64 * 11025.0 / src as f64;
            assert!(
                (out - expected).abs() <= 0.5,
                "{} frames @ {}Hz -> {} (expected ~{})",
                frames,
                src,
                out,
                expected
            );
            let samples = vec![0; frames];
            assert_eq!(resample_linear(&samples, src, 11025).len(), out as usize);
        }
    }

    #[test]
    fn test_non_integer_ratio_stays_bounded() {
        // 44100 -> 11025 is 4:1, 48000 -> 11025 is not
        let samples: Vec<i32> = (0..4800).map(|i| ((i * 37) % 2000) - 1000).collect();
        let out = resample_linear(&samples, 48000, 11025);
        assert_eq!(out.len(), 1103);
        assert!(out.iter().all(|&s| (-1000..1000).contains(&s)));
    }

    #[test]
    fn test_rejects_stereo() {
        let buf = PcmBuffer::new(vec![0; 4], SampleWidth::S16, 2, 44100).unwrap();
        assert!(resample(buf).is_err());
    }
}
