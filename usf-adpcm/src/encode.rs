//! ADPCM encoder implementation
//!
//! This module handles encoding 16-bit PCM samples to packed 4-bit codes.
//! Note: This is a pure codec - no file headers are written. The caller
//! (usf-common) handles the UsfSoundHeader.

use crate::{AdpcmState, NibbleOrder, SIGN_BIT, pack_codes};

/// Encode one sample, advancing `state`
///
/// Quantizes `sample - predictor` by successive approximation against
/// `step`, `step/2` and `step/4`, then applies the emitted code to the state
/// exactly as the decoder will.
pub fn encode_sample(sample: i16, state: &mut AdpcmState) -> u8 {
    let mut diff = sample as i32 - state.predictor;
    let sign = if diff < 0 {
        diff = -diff;
        SIGN_BIT
    } else {
        0
    };

    let mut threshold = state.step();
    let mut code = 0u8;

    if diff >= threshold {
        code |= 4;
        diff -= threshold;
    }
    threshold >>= 1;
    if diff >= threshold {
        code |= 2;
        diff -= threshold;
    }
    threshold >>= 1;
    if diff >= threshold {
        code |= 1;
    }

    let code = code | sign;
    state.apply(code);
    code
}

/// Encode a run of samples starting from `state`
///
/// Returns one unpacked code per sample together with the state after the
/// last sample, so consecutive sub-buffers can be encoded by threading the
/// returned state into the next call.
pub fn encode_codes(samples: &[i16], state: AdpcmState) -> (Vec<u8>, AdpcmState) {
    let mut state = state;
    let codes = samples
        .iter()
        .map(|&sample| encode_sample(sample, &mut state))
        .collect();
    (codes, state)
}

/// Encode PCM samples to a packed ADPCM payload
///
/// # Arguments
/// * `samples` - Input PCM samples (mono, 16-bit)
/// * `order` - Nibble placement within each payload byte
///
/// # Returns
/// `samples.len() / 2` bytes. State starts from [`AdpcmState::new`] and is
/// never reset mid-buffer.
pub fn encode_adpcm(samples: &[i16], order: NibbleOrder) -> Vec<u8> {
    let (codes, _) = encode_codes(samples, AdpcmState::new());
    pack_codes(&codes, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_STEP_INDEX, decode_codes};

    #[test]
    fn test_encode_known_vector() {
        let (codes, state) = encode_codes(&[1000, -1000, 500, -500], AdpcmState::new());
        assert_eq!(codes, vec![0x7, 0xF, 0x7, 0xF]);
        assert_eq!(state.predictor, -92);
    }

    #[test]
    fn test_encode_known_vector_packed() {
        let samples = [1000i16, -1000, 500, -500];
        assert_eq!(encode_adpcm(&samples, NibbleOrder::LowFirst), vec![0xF7, 0xF7]);
        assert_eq!(encode_adpcm(&samples, NibbleOrder::HighFirst), vec![0x7F, 0x7F]);
    }

    #[test]
    fn test_encode_small_negative_constant() {
        // First code carries the whole offset, then the step stays at its floor
        let (codes, state) = encode_codes(&[-3; 5], AdpcmState::new());
        assert_eq!(codes, vec![0xA, 0, 0, 0, 0]);
        assert_eq!(state.predictor, -3);
        assert_eq!(state.step_index, 0);
    }

    #[test]
    fn test_encode_deterministic() {
        let samples: Vec<i16> = (0..4096)
            .map(|i: i32| ((i * 7919) % 65536 - 32768) as i16)
            .collect();
        let a = encode_adpcm(&samples, NibbleOrder::LowFirst);
        let b = encode_adpcm(&samples, NibbleOrder::LowFirst);
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_threads_state_across_sub_buffers() {
        let samples: Vec<i16> = (0..500).map(|i| ((i * 37) % 2000 - 1000) as i16).collect();
        let (whole, whole_state) = encode_codes(&samples, AdpcmState::new());

        let (head, mid_state) = encode_codes(&samples[..123], AdpcmState::new());
        let (tail, tail_state) = encode_codes(&samples[123..], mid_state);

        assert_eq!([head, tail].concat(), whole);
        assert_eq!(tail_state, whole_state);
    }

    #[test]
    fn test_encoder_and_decoder_track() {
        let samples: Vec<i16> = (0..2000)
            .map(|i| ((i as f32 * 0.05).sin() * 12000.0) as i16)
            .collect();
        let (codes, enc_state) = encode_codes(&samples, AdpcmState::new());
        let (_, dec_state) = decode_codes(&codes, AdpcmState::new());
        assert_eq!(enc_state, dec_state);
    }

    #[test]
    fn test_full_scale_step_saturates() {
        let mut samples = vec![i16::MAX; 64];
        samples.extend(vec![i16::MIN; 64]);
        let (_, state) = encode_codes(&samples, AdpcmState::new());
        assert!(state.step_index <= MAX_STEP_INDEX);
        assert!(state.predictor >= i16::MIN as i32);
    }

    #[test]
    fn test_encode_empty() {
        assert!(encode_adpcm(&[], NibbleOrder::LowFirst).is_empty());
    }

    #[test]
    fn test_encode_odd_count_drops_last_code() {
        let encoded = encode_adpcm(&[100, 200, 300], NibbleOrder::LowFirst);
        assert_eq!(encoded.len(), 1);
    }
}
