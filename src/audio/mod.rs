//! Audio input handling for gavel
//!
//! Validates the input format against the supported allow-list and normalizes
//! compressed sources to WAV so the chunker can split them sample-accurately.

mod decode;

pub use decode::prepare_wav;

use std::path::Path;

use crate::{GavelError, Result};

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    M4a,
}

impl AudioFormat {
    /// Determine the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "mp3" => Ok(Self::Mp3),
            "wav" => Ok(Self::Wav),
            "m4a" => Ok(Self::M4a),
            other => Err(GavelError::Decode(format!(
                "Unsupported audio format '{}' for {} (supported: mp3, wav, m4a)",
                other,
                path.display()
            ))),
        }
    }
}

/// Stable identity for a source file, used to namespace scratch files and the
/// transcript cache. Replacing the source with a different file of the same
/// name invalidates the old namespace.
pub fn source_fingerprint(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| GavelError::Decode(format!("Invalid file name: {}", path.display())))?;
    let len = std::fs::metadata(path)?.len();

    let stem: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();

    Ok(format!("{}-{:x}", stem, len))
}

/// Map a hound error onto the crate taxonomy: I/O problems are storage
/// failures, everything else means the bytes are not valid audio.
pub(crate) fn wav_error(err: hound::Error) -> GavelError {
    match err {
        hound::Error::IoError(io) => GavelError::Io(io),
        other => GavelError::Decode(other.to_string()),
    }
}
