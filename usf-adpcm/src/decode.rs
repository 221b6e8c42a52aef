//! ADPCM decoder implementation
//!
//! Reference decoder for the payloads produced by [`crate::encode_adpcm`].
//! Note: This is a pure codec - no file headers are parsed. The caller
//! provides the sample count.

use crate::{AdpcmError, AdpcmState, NibbleOrder};

/// Decode one code, advancing `state`, and return the reconstructed sample
#[inline]
pub fn decode_sample(code: u8, state: &mut AdpcmState) -> i16 {
    state.apply(code) as i16
}

/// Decode a run of unpacked codes starting from `state`
///
/// Returns the reconstructed samples and the state after the last code.
pub fn decode_codes(codes: &[u8], state: AdpcmState) -> (Vec<i16>, AdpcmState) {
    let mut state = state;
    let samples = codes
        .iter()
        .map(|&code| decode_sample(code, &mut state))
        .collect();
    (samples, state)
}

/// Decode a packed ADPCM payload to PCM
///
/// # Arguments
/// * `data` - Packed payload (two codes per byte)
/// * `total_samples` - Number of samples to decode
/// * `order` - Nibble placement used when the payload was packed
///
/// # Errors
/// Returns `AdpcmError::TruncatedData` if `data` holds fewer than
/// `total_samples` codes.
pub fn decode_adpcm(
    data: &[u8],
    total_samples: usize,
    order: NibbleOrder,
) -> Result<Vec<i16>, AdpcmError> {
    let available = data.len() * 2;
    if available < total_samples {
        return Err(AdpcmError::TruncatedData {
            needed: total_samples,
            available,
        });
    }

    let codes: Vec<u8> = data
        .iter()
        .flat_map(|&byte| {
            let (first, second) = order.unpack(byte);
            [first, second]
        })
        .take(total_samples)
        .collect();

    let (samples, _) = decode_codes(&codes, AdpcmState::new());
    Ok(samples)
}
