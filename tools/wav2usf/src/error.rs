//! Conversion errors
//!
//! Every failure is fatal for the conversion in progress. Messages name the
//! pipeline stage and the constraint that was violated.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Pipeline stage that raised an error
///
/// Gain and bit-depth normalization cannot fail, so they have no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    WaveSource,
    Downmix,
    Resample,
    PostScale,
    Adpcm,
    ContainerWriter,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::WaveSource => "wave source",
            Stage::Downmix => "downmix",
            Stage::Resample => "resample",
            Stage::PostScale => "post-scale",
            Stage::Adpcm => "adpcm encode",
            Stage::ContainerWriter => "container writer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input missing, unreadable, or not a valid WAVE container
    #[error("{stage}: cannot read {input}")]
    UnreadableInput {
        stage: Stage,
        input: String,
        #[source]
        source: hound::Error,
    },

    /// Channel count, sample width, sample format, or sample rate outside
    /// the supported set
    #[error("{stage}: unsupported format: {reason}")]
    UnsupportedFormat { stage: Stage, reason: String },

    /// Output could not be created or written
    #[error("{stage}: cannot write {}", path.display())]
    Write {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub(crate) fn unsupported(stage: Stage, reason: impl Into<String>) -> Self {
        ConvertError::UnsupportedFormat {
            stage,
            reason: reason.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Write {
            stage: Stage::ContainerWriter,
            path: path.into(),
            source,
        }
    }

    /// Stage that raised the error
    pub fn stage(&self) -> Stage {
        match self {
            ConvertError::UnreadableInput { stage, .. }
            | ConvertError::UnsupportedFormat { stage, .. }
            | ConvertError::Write { stage, .. } => *stage,
        }
    }
}
