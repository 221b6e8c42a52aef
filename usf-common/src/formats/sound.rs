//! UGSF sound header (.usf)
//!
//! Sound container consumed by the playback device. ADPCM compressed.
//!
//! # Layout (version 1)
//! ```text
//! 0x00: magic "UGSF" (4 bytes)
//! 0x04: version u8 (1 = 32-byte name field present)
//! 0x05: name (32 bytes, NUL padded, not necessarily NUL terminated)
//! 0x25: codec flags u8 (non-zero = ADPCM payload)
//! 0x26: bits_per_sample u8
//! 0x27: channels u8
//! 0x28: sample_rate u16 LE
//! 0x2A: loop_count u16 LE
//! 0x2C: num_samples u32 LE (0xFFFFFFFF = entire payload)
//! 0x30: payload (packed 4-bit ADPCM codes)
//! ```
//!
//! Version 0 files omit the name field; the info block follows the version
//! byte directly. They are accepted when reading, never written.

use thiserror::Error;

/// File magic
pub const USF_MAGIC: &[u8; 4] = b"UGSF";

/// File extension without dot
pub const USF_EXTENSION: &str = "usf";

/// Header version without a name field
pub const VERSION_UNNAMED: u8 = 0;

/// Header version with the 32-byte name field
pub const VERSION_NAMED: u8 = 1;

/// Size of the name field in bytes
pub const NAME_LEN: usize = 32;

/// Device playback rate (fixed)
pub const SAMPLE_RATE: u32 = 11025;

/// Bits per sample recorded in the header (PCM width before compression)
pub const BITS_PER_SAMPLE: u8 = 16;

/// Codec flags value written by the converter
pub const CODEC_FLAGS_ADPCM: u8 = 17;

/// Loop count written by the converter (play once)
pub const DEFAULT_LOOP_COUNT: u16 = 1;

/// `num_samples` sentinel meaning "play the entire payload"
pub const SAMPLE_COUNT_ENTIRE_PAYLOAD: u32 = 0xFFFF_FFFF;

/// Size of the info block that follows the name (or the version byte)
const INFO_SIZE: usize = 11;

/// Size of magic + version
const PREFIX_SIZE: usize = 5;

/// Errors when parsing a UGSF header
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsfError {
    #[error("not a UGSF file (magic {0:02X?})")]
    BadMagic([u8; 4]),

    #[error("unsupported UGSF header version {0}")]
    UnsupportedVersion(u8),

    #[error("truncated UGSF header: {needed} bytes needed, {available} available")]
    Truncated { needed: usize, available: usize },
}

/// UGSF sound header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsfSoundHeader {
    pub version: u8,
    pub name: [u8; NAME_LEN],
    pub codec_flags: u8,
    pub bits_per_sample: u8,
    pub channels: u8,
    pub sample_rate: u16,
    pub loop_count: u16,
    pub num_samples: u32,
}

impl UsfSoundHeader {
    /// Size of a version 1 header
    pub const SIZE: usize = PREFIX_SIZE + NAME_LEN + INFO_SIZE;

    /// Header for an ADPCM mono sound at the device rate
    ///
    /// `name` is truncated to [`NAME_LEN`] bytes.
    pub fn new(name: &str) -> Self {
        Self {
            version: VERSION_NAMED,
            name: encode_name(name),
            codec_flags: CODEC_FLAGS_ADPCM,
            bits_per_sample: BITS_PER_SAMPLE,
            channels: 1,
            sample_rate: SAMPLE_RATE as u16,
            loop_count: DEFAULT_LOOP_COUNT,
            num_samples: SAMPLE_COUNT_ENTIRE_PAYLOAD,
        }
    }

    /// Whether `name` needs truncating to fit the name field
    pub fn name_is_truncated(name: &str) -> bool {
        name.len() > NAME_LEN
    }

    /// Name up to the first NUL (lossy for non-UTF-8 bytes)
    pub fn name_str(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    /// Check if the payload is ADPCM compressed
    pub fn is_adpcm(&self) -> bool {
        self.codec_flags != 0
    }

    /// Bytes occupied by this header in a file of its version
    pub fn encoded_len(&self) -> usize {
        if self.version == VERSION_UNNAMED {
            PREFIX_SIZE + INFO_SIZE
        } else {
            Self::SIZE
        }
    }

    /// Number of samples stored in a payload of `payload_len` bytes
    pub fn sample_count(&self, payload_len: usize) -> usize {
        let stored = if self.is_adpcm() {
            payload_len * 2
        } else {
            payload_len * (self.bits_per_sample as usize / 8).max(1)
        };
        if self.num_samples == SAMPLE_COUNT_ENTIRE_PAYLOAD {
            stored
        } else {
            stored.min(self.num_samples as usize)
        }
    }

    /// Write header to bytes
    ///
    /// Always emits the version 1 layout regardless of `self.version`, so a
    /// header parsed from a version 0 file is upgraded on the way out: it
    /// reads back as version 1 with an empty name and the same info fields.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(USF_MAGIC);
        bytes[4] = VERSION_NAMED;
        bytes[5..37].copy_from_slice(&self.name);
        bytes[37] = self.codec_flags;
        bytes[38] = self.bits_per_sample;
        bytes[39] = self.channels;
        bytes[40..42].copy_from_slice(&self.sample_rate.to_le_bytes());
        bytes[42..44].copy_from_slice(&self.loop_count.to_le_bytes());
        bytes[44..48].copy_from_slice(&self.num_samples.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Self::parse(bytes).ok()
    }

    /// Read header from bytes, reporting why parsing failed
    pub fn parse(bytes: &[u8]) -> Result<Self, UsfError> {
        if bytes.len() < PREFIX_SIZE {
            return Err(UsfError::Truncated {
                needed: PREFIX_SIZE,
                available: bytes.len(),
            });
        }

        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if &magic != USF_MAGIC {
            return Err(UsfError::BadMagic(magic));
        }

        let version = bytes[4];
        let mut name = [0u8; NAME_LEN];
        let info_offset = match version {
            VERSION_NAMED => {
                if bytes.len() >= PREFIX_SIZE + NAME_LEN {
                    name.copy_from_slice(&bytes[PREFIX_SIZE..PREFIX_SIZE + NAME_LEN]);
                }
                PREFIX_SIZE + NAME_LEN
            }
            VERSION_UNNAMED => PREFIX_SIZE,
            other => return Err(UsfError::UnsupportedVersion(other)),
        };

        let needed = info_offset + INFO_SIZE;
        if bytes.len() < needed {
            return Err(UsfError::Truncated {
                needed,
                available: bytes.len(),
            });
        }

        let info = &bytes[info_offset..needed];
        Ok(Self {
            version,
            name,
            codec_flags: info[0],
            bits_per_sample: info[1],
            channels: info[2],
            sample_rate: u16::from_le_bytes([info[3], info[4]]),
            loop_count: u16::from_le_bytes([info[5], info[6]]),
            num_samples: u32::from_le_bytes([info[7], info[8], info[9], info[10]]),
        })
    }
}

/// NUL-pad (or truncate) a sound name into the fixed name field
fn encode_name(name: &str) -> [u8; NAME_LEN] {
    let mut field = [0u8; NAME_LEN];
    let bytes = name.as_bytes();
    let len = bytes.len().min(NAME_LEN);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

/// Split a UGSF file into its header and payload
pub fn split_sound(data: &[u8]) -> Result<(UsfSoundHeader, &[u8]), UsfError> {
    let header = UsfSoundHeader::parse(data)?;
    Ok((header, &data[header.encoded_len()..]))
}

/// Decode a UGSF file's ADPCM payload to PCM samples
///
/// Uncompressed payloads and truncated data return `None`.
pub fn decode_sound(data: &[u8], order: usf_adpcm::NibbleOrder) -> Option<Vec<i16>> {
    let (header, payload) = split_sound(data).ok()?;
    if !header.is_adpcm() {
        return None;
    }
    let total_samples = header.sample_count(payload.len());
    usf_adpcm::decode_adpcm(payload, total_samples, order).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use usf_adpcm::NibbleOrder;

    /// Helper to create UGSF data from PCM samples
    fn encode_sound(name: &str, samples: &[i16]) -> Vec<u8> {
        let header = UsfSoundHeader::new(name);
        let payload = usf_adpcm::encode_adpcm(samples, NibbleOrder::LowFirst);

        let mut data = Vec::with_capacity(UsfSoundHeader::SIZE + payload.len());
        data.extend_from_slice(&header.to_bytes());
        data.extend_from_slice(&payload);
        data
    }

    #[test]
    fn test_header_size() {
        assert_eq!(UsfSoundHeader::SIZE, 48);
    }

    #[test]
    fn test_header_layout() {
        let bytes = UsfSoundHeader::new("beep").to_bytes();

        assert_eq!(&bytes[0..4], &[0x55, 0x47, 0x53, 0x46]);
        assert_eq!(bytes[4], 1);
        assert_eq!(&bytes[5..9], b"beep");
        assert!(bytes[9..37].iter().all(|&b| b == 0));
        assert_eq!(bytes[37], 17);
        assert_eq!(bytes[38], 16);
        assert_eq!(bytes[39], 1);
        assert_eq!(&bytes[40..42], &11025u16.to_le_bytes());
        assert_eq!(&bytes[42..44], &[1, 0]);
        assert_eq!(&bytes[44..48], &[0xFF; 4]);
    }

    #[test]
    fn test_header_roundtrip() {
        let header = UsfSoundHeader::new("roar");
        let decoded = UsfSoundHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.name_str(), "roar");
    }

    #[test]
    fn test_name_truncated() {
        let long = "a_really_long_sound_name_that_does_not_fit";
        assert!(UsfSoundHeader::name_is_truncated(long));

        let header = UsfSoundHeader::new(long);
        assert_eq!(header.name_str(), &long[..NAME_LEN]);
        assert_eq!(&header.to_bytes()[5..37], &long.as_bytes()[..NAME_LEN]);
    }

    #[test]
    fn test_parse_version_zero() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(USF_MAGIC);
        bytes.push(VERSION_UNNAMED);
        bytes.extend_from_slice(&[1, 8, 1]);
        bytes.extend_from_slice(&11025u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&100u32.to_le_bytes());

        let header = UsfSoundHeader::parse(&bytes).unwrap();
        assert_eq!(header.version, VERSION_UNNAMED);
        assert_eq!(header.name_str(), "");
        assert_eq!(header.bits_per_sample, 8);
        assert_eq!(header.num_samples, 100);
        assert_eq!(header.encoded_len(), 16);
    }

    #[test]
    fn test_version_zero_rewritten_as_version_one() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(USF_MAGIC);
        bytes.push(VERSION_UNNAMED);
        bytes.extend_from_slice(&[1, 4, 1]);
        bytes.extend_from_slice(&11025u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&SAMPLE_COUNT_ENTIRE_PAYLOAD.to_le_bytes());
        let old = UsfSoundHeader::parse(&bytes).unwrap();

        let written = old.to_bytes();
        assert_eq!(written[4], VERSION_NAMED);

        let reread = UsfSoundHeader::parse(&written).unwrap();
        assert_eq!(reread.version, VERSION_NAMED);
        assert_eq!(reread.encoded_len(), UsfSoundHeader::SIZE);
        assert_eq!(reread.name, old.name);
        assert_eq!(reread.codec_flags, old.codec_flags);
        assert_eq!(reread.bits_per_sample, old.bits_per_sample);
        assert_eq!(reread.sample_rate, old.sample_rate);
        assert_eq!(reread.loop_count, old.loop_count);
        assert_eq!(reread.num_samples, old.num_samples);
        assert_eq!(reread, UsfSoundHeader { version: VERSION_NAMED, ..old });
    }

    #[test]
    fn test_parse_bad_magic() {
        let mut bytes = UsfSoundHeader::new("x").to_bytes();
        bytes[0] = b'R';
        assert_eq!(
            UsfSoundHeader::parse(&bytes),
            Err(UsfError::BadMagic(*b"RGSF"))
        );
    }

    #[test]
    fn test_parse_bad_version() {
        let mut bytes = UsfSoundHeader::new("x").to_bytes();
        bytes[4] = 7;
        assert_eq!(
            UsfSoundHeader::parse(&bytes),
            Err(UsfError::UnsupportedVersion(7))
        );
    }

    #[test]
    fn test_parse_truncated() {
        let bytes = UsfSoundHeader::new("x").to_bytes();
        assert_eq!(
            UsfSoundHeader::parse(&bytes[..40]),
            Err(UsfError::Truncated {
                needed: 48,
                available: 40
            })
        );
        assert!(UsfSoundHeader::from_bytes(&[]).is_none());
    }

    #[test]
    fn test_sample_count() {
        let header = UsfSoundHeader::new("x");
        assert_eq!(header.sample_count(10), 20);

        let limited = UsfSoundHeader {
            num_samples: 15,
            ..header
        };
        assert_eq!(limited.sample_count(10), 15);
    }

    #[test]
    fn test_decode_sound() {
        let original: Vec<i16> = (0..1000).map(|i| ((i % 40) * 200 - 4000) as i16).collect();
        let data = encode_sound("tone", &original);

        let samples = decode_sound(&data, NibbleOrder::LowFirst).unwrap();
        assert_eq!(samples.len(), original.len());
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_sound(&[], NibbleOrder::LowFirst).is_none());
    }

    #[test]
    fn test_split_sound() {
        let data = encode_sound("beep", &[1000, -1000, 500, -500]);
        let (header, payload) = split_sound(&data).unwrap();
        assert_eq!(header.name_str(), "beep");
        assert_eq!(payload.len(), 2);
    }
}
