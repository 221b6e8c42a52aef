//! UGSF container output
//!
//! Re-exports the header definitions from usf-common and adds the writers.

pub use usf_common::formats::*;

use std::io::{self, Write};
use std::path::Path;

use crate::error::ConvertError;

/// Write a complete UGSF sound (header + ADPCM payload)
pub fn write_usf_sound<W: Write>(w: &mut W, name: &str, payload: &[u8]) -> io::Result<()> {
    let header = UsfSoundHeader::new(name);
    w.write_all(&header.to_bytes())?;
    w.write_all(payload)?;
    Ok(())
}

/// Write a UGSF file atomically
///
/// The image goes to a temporary file next to `path` which is renamed over
/// `path` only once fully written. On failure the temporary file is removed
/// and `path` is left untouched.
pub fn write_usf_file(path: &Path, name: &str, payload: &[u8]) -> Result<(), ConvertError> {
    if UsfSoundHeader::name_is_truncated(name) {
        tracing::warn!(
            "Sound name {:?} is longer than {} bytes and will be truncated",
            name,
            NAME_LEN
        );
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".wav2usf-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| ConvertError::write(path, e))?;

    write_usf_sound(&mut tmp, name, payload).map_err(|e| ConvertError::write(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| ConvertError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| ConvertError::write(path, e.error))?;

    tracing::debug!(
        "Wrote {:?}: {} byte header + {} byte payload",
        path,
        UsfSoundHeader::SIZE,
        payload.len()
    );
    Ok(())
}
