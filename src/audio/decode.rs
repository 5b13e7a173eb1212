//! Source normalization
//!
//! Compressed inputs (mp3/m4a) are decoded to 16 kHz mono WAV with ffmpeg
//! before chunking; WAV inputs are probed and passed through untouched.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::audio::{source_fingerprint, wav_error, AudioFormat};
use crate::{GavelError, Result};

/// Target sample rate for normalized audio. Matches what speech models expect.
const NORMALIZED_SAMPLE_RATE: u32 = 16_000;

/// Ensure `source` is available as a parseable WAV file and return its path.
///
/// The decoded copy lands in `scratch_dir`, named by the source fingerprint so
/// a re-run over the same file reuses it without re-decoding.
pub async fn prepare_wav(source: &Path, scratch_dir: &Path) -> Result<PathBuf> {
    let format = AudioFormat::from_path(source)?;

    if format == AudioFormat::Wav {
        // Probe up front so corrupt input fails as a decode error here rather
        // than midway through chunking.
        hound::WavReader::open(source).map_err(wav_error)?;
        return Ok(source.to_path_buf());
    }

    std::fs::create_dir_all(scratch_dir)?;
    let out = scratch_dir.join(format!("{}.wav", source_fingerprint(source)?));
    if out.exists() {
        tracing::debug!("Reusing decoded audio at {}", out.display());
        return Ok(out);
    }

    tracing::info!("Decoding {} to WAV", source.display());
    let rate = NORMALIZED_SAMPLE_RATE.to_string();
    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(source)
        .args(["-ac", "1", "-ar", rate.as_str()])
        .arg(&out)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GavelError::Decode(
                    "ffmpeg is required to decode mp3/m4a input but was not found on PATH"
                        .to_string(),
                )
            } else {
                GavelError::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: String = stderr
            .lines()
            .rev()
            .take(3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("\n");
        // A failed run must not leave a truncated WAV behind for the next one.
        let _ = std::fs::remove_file(&out);
        return Err(GavelError::Decode(format!(
            "ffmpeg could not decode {}: {}",
            source.display(),
            tail
        )));
    }

    Ok(out)
}
