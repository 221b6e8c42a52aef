//! USF-ADPCM: 4-bit adaptive differential codec for UGSF sound payloads
//!
//! This is the IMA/DVI ADPCM scheme as used by the UGSF sound container:
//! one 4-bit code per 16-bit mono sample, two codes packed per byte.
//!
//! **This is a pure codec** - it handles only the compression/decompression of
//! sample data. The container header (name, sample rate, sentinel) is handled
//! by the caller (usf-common's `UsfSoundHeader`).
//!
//! # Code Format
//!
//! ```text
//! bit 3: sign (1 = predictor moves down)
//! bit 2: step
//! bit 1: step / 2
//! bit 0: step / 4
//! ```
//!
//! The reconstructed difference is `step/8 + (bits selected above)`. The
//! predictor is clamped to the i16 range and the step index moves through
//! [`STEP_TABLE`] according to [`INDEX_TABLE`].
//!
//! # Packing
//!
//! Two codes per byte. The first sample of each pair goes in the low nibble
//! by default ([`NibbleOrder::LowFirst`]); the legacy device tools place it in
//! the high nibble ([`NibbleOrder::HighFirst`]). An unpaired trailing code is
//! not emitted, so the payload is always `samples / 2` bytes.
//!
//! # Usage
//!
//! ```
//! use usf_adpcm::{NibbleOrder, decode_adpcm, encode_adpcm};
//!
//! let samples: Vec<i16> = (0..1000).map(|i| ((i % 50) * 100) as i16).collect();
//! let payload = encode_adpcm(&samples, NibbleOrder::LowFirst);
//! assert_eq!(payload.len(), samples.len() / 2);
//!
//! let decoded = decode_adpcm(&payload, samples.len(), NibbleOrder::LowFirst).unwrap();
//! assert_eq!(decoded.len(), samples.len());
//! ```

mod decode;
mod encode;
mod state;

pub use decode::{decode_adpcm, decode_codes, decode_sample};
pub use encode::{encode_adpcm, encode_codes, encode_sample};
pub use state::AdpcmState;

// =============================================================================
// Constants
// =============================================================================

/// Highest valid index into [`STEP_TABLE`]
pub const MAX_STEP_INDEX: usize = 88;

/// Quantizer step sizes (89 entries)
pub const STEP_TABLE: [i32; MAX_STEP_INDEX + 1] = [
    7, 8, 9, 10, 11, 12, 13, 14, 16, 17, 19, 21, 23, 25, 28, 31, 34, 37, 41, 45, 50, 55, 60, 66,
    73, 80, 88, 97, 107, 118, 130, 143, 157, 173, 190, 209, 230, 253, 279, 307, 337, 371, 408,
    449, 494, 544, 598, 658, 724, 796, 876, 963, 1060, 1166, 1282, 1411, 1552, 1707, 1878, 2066,
    2272, 2499, 2749, 3024, 3327, 3660, 4026, 4428, 4871, 5358, 5894, 6484, 7132, 7845, 8630,
    9493, 10442, 11487, 12635, 13899, 15289, 16818, 18500, 20350, 22385, 24623, 27086, 29794,
    32767,
];

/// Step index adjustment per emitted code (sign bit ignored)
pub const INDEX_TABLE: [i32; 16] = [-1, -1, -1, -1, 2, 4, 6, 8, -1, -1, -1, -1, 2, 4, 6, 8];

/// Sign bit of a 4-bit code
pub const SIGN_BIT: u8 = 0b1000;

// =============================================================================
// Nibble Packing
// =============================================================================

/// Placement of the first code of each pair within a payload byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NibbleOrder {
    /// First sample in bits 0-3 (IMA WAV convention)
    #[default]
    LowFirst,
    /// First sample in bits 4-7 (legacy device tooling)
    HighFirst,
}

impl NibbleOrder {
    /// Pack two codes into one byte
    #[inline]
    #[must_use]
    pub fn pack(self, first: u8, second: u8) -> u8 {
        match self {
            NibbleOrder::LowFirst => (first & 0x0F) | (second << 4),
            NibbleOrder::HighFirst => (first << 4) | (second & 0x0F),
        }
    }

    /// Split one byte into `(first, second)` codes
    #[inline]
    #[must_use]
    pub fn unpack(self, byte: u8) -> (u8, u8) {
        match self {
            NibbleOrder::LowFirst => (byte & 0x0F, byte >> 4),
            NibbleOrder::HighFirst => (byte >> 4, byte & 0x0F),
        }
    }
}

/// Pack a code sequence two-per-byte, dropping an unpaired trailing code
#[must_use]
pub fn pack_codes(codes: &[u8], order: NibbleOrder) -> Vec<u8> {
    codes
        .chunks_exact(2)
        .map(|pair| order.pack(pair[0], pair[1]))
        .collect()
}

// =============================================================================
// Error Type
// =============================================================================

/// Errors that can occur during ADPCM decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdpcmError {
    /// Payload holds fewer codes than the requested sample count
    TruncatedData { needed: usize, available: usize },
}

impl core::fmt::Display for AdpcmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AdpcmError::TruncatedData { needed, available } => write!(
                f,
                "truncated ADPCM data: {} samples requested, {} codes available",
                needed, available
            ),
        }
    }
}

impl std::error::Error for AdpcmError {}

// =============================================================================
// Helper Functions
// =============================================================================

/// Clamp value to 16-bit signed range
#[inline]
pub(crate) fn clamp_i16(v: i32) -> i32 {
    v.clamp(i16::MIN as i32, i16::MAX as i32)
}

// =============================================================================
// Tests
// =============================================================================
