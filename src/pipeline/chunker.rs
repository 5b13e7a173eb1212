//! Audio chunking
//!
//! Walks a WAV file's timeline and materializes successive bounded-duration
//! segments as standalone WAV files, so each one can be uploaded to the
//! speech-to-text service independently.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio::wav_error;
use crate::{GavelError, Result};

/// One bounded-duration slice of the source audio.
#[derive(Debug, Clone)]
pub struct Segment {
    /// 0-based position in the source timeline; defines processing order
    pub index: usize,
    /// Offset of the segment start from the beginning of the source
    pub start: Duration,
    /// Length of this segment; only the final segment may be shorter than the
    /// configured maximum
    pub duration: Duration,
    /// Materialized audio payload
    pub path: PathBuf,
}

/// Splits source audio into segments of at most a fixed duration.
#[derive(Debug)]
pub struct Chunker {
    max_duration: Duration,
}

impl Chunker {
    pub fn new(max_duration: Duration) -> Result<Self> {
        if max_duration.is_zero() {
            return Err(GavelError::Config(
                "max segment duration must be positive".to_string(),
            ));
        }
        Ok(Self { max_duration })
    }

    /// Split `wav` into contiguous segments written under `out_dir`.
    ///
    /// Produces `ceil(total / max_duration)` segments; segment i+1 starts
    /// exactly where segment i ends. Segment files already present in
    /// `out_dir` are reused, so an interrupted run does not re-split.
    pub fn split(&self, wav: &Path, out_dir: &Path) -> Result<Vec<Segment>> {
        let mut reader = hound::WavReader::open(wav).map_err(wav_error)?;
        let spec = reader.spec();
        let sample_rate = spec.sample_rate as u64;
        let channels = spec.channels as usize;
        let total_frames = reader.duration() as u64;

        if total_frames == 0 {
            return Err(GavelError::Decode(format!(
                "{} contains no audio",
                wav.display()
            )));
        }

        let frames_per_segment =
            ((self.max_duration.as_secs_f64() * sample_rate as f64) as u64).max(1);
        let count = total_frames.div_ceil(frames_per_segment);

        tracing::info!(
            "Splitting {:.1}s of audio into {} segment(s) of at most {:.0}s",
            total_frames as f64 / sample_rate as f64,
            count,
            self.max_duration.as_secs_f64()
        );

        std::fs::create_dir_all(out_dir)?;

        let mut segments = Vec::with_capacity(count as usize);
        for index in 0..count {
            let start_frame = index * frames_per_segment;
            let frames = frames_per_segment.min(total_frames - start_frame);
            let path = out_dir.join(format!("segment_{:03}.wav", index));

            if path.exists() && segment_frames_match(&path, frames) {
                tracing::debug!("Reusing existing segment file {}", path.display());
            } else {
                reader.seek(start_frame as u32).map_err(GavelError::Io)?;
                write_segment(&mut reader, spec, &path, frames as usize * channels)?;
            }

            segments.push(Segment {
                index: index as usize,
                start: frames_to_duration(start_frame, sample_rate),
                duration: frames_to_duration(frames, sample_rate),
                path,
            });
        }

        Ok(segments)
    }
}

fn frames_to_duration(frames: u64, sample_rate: u64) -> Duration {
    Duration::from_secs_f64(frames as f64 / sample_rate as f64)
}

/// An existing file is only accepted as segment `index` if it holds exactly
/// the expected number of frames. A leftover from a run with a different
/// segment duration would otherwise break the contiguous-partition guarantee.
fn segment_frames_match(path: &Path, expected_frames: u64) -> bool {
    match hound::WavReader::open(path) {
        Ok(reader) => reader.duration() as u64 == expected_frames,
        Err(_) => false,
    }
}

/// Copy `sample_count` samples from the reader's current position into a new
/// WAV file with the same spec.
fn write_segment<R: std::io::Read>(
    reader: &mut hound::WavReader<R>,
    spec: hound::WavSpec,
    path: &Path,
    sample_count: usize,
) -> Result<()> {
    let mut writer = hound::WavWriter::create(path, spec).map_err(wav_error)?;

    let result = match spec.sample_format {
        hound::SampleFormat::Float => copy_samples::<_, f32>(reader, &mut writer, sample_count),
        hound::SampleFormat::Int => copy_samples::<_, i32>(reader, &mut writer, sample_count),
    };

    if let Err(err) = result {
        // Do not leave a truncated segment behind; the next run would hand it
        // to the transcription service as-is.
        drop(writer);
        let _ = std::fs::remove_file(path);
        return Err(err);
    }

    writer.finalize().map_err(wav_error)?;
    Ok(())
}

fn copy_samples<R, S>(
    reader: &mut hound::WavReader<R>,
    writer: &mut hound::WavWriter<std::io::BufWriter<std::fs::File>>,
    sample_count: usize,
) -> Result<()>
where
    R: std::io::Read,
    S: hound::Sample + Copy,
{
    for sample in reader.samples::<S>().take(sample_count) {
        let sample = sample.map_err(wav_error)?;
        writer.write_sample(sample).map_err(wav_error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 8_000;

    /// Write a mono 16-bit WAV lasting `secs` seconds, with each sample set to
    /// its frame index so segment boundaries are checkable.
    fn make_wav(path: &Path, secs: f64) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let frames = (secs * RATE as f64) as usize;
        for i in 0..frames {
            writer.write_sample((i % 1000) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn segment_frames(path: &Path) -> u32 {
        hound::WavReader::open(path).unwrap().duration()
    }

    #[test]
    fn splits_into_ceil_count_with_short_tail() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("source.wav");
        make_wav(&wav, 2.5);

        let chunker = Chunker::new(Duration::from_secs(1)).unwrap();
        let segments = chunker.split(&wav, &dir.path().join("chunks")).unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segment_frames(&segments[0].path), RATE);
        assert_eq!(segment_frames(&segments[1].path), RATE);
        assert_eq!(segment_frames(&segments[2].path), RATE / 2);
    }

    #[test]
    fn short_source_yields_single_segment() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("source.wav");
        make_wav(&wav, 0.5);

        let chunker = Chunker::new(Duration::from_secs(1)).unwrap();
        let segments = chunker.split(&wav, &dir.path().join("chunks")).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].index, 0);
        assert_eq!(segment_frames(&segments[0].path), RATE / 2);
    }

    #[test]
    fn segments_are_contiguous_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("source.wav");
        make_wav(&wav, 3.25);

        let chunker = Chunker::new(Duration::from_secs(1)).unwrap();
        let segments = chunker.split(&wav, &dir.path().join("chunks")).unwrap();

        assert_eq!(segments.len(), 4);
        for (i, pair) in segments.windows(2).enumerate() {
            assert_eq!(pair[0].index, i);
            assert_eq!(pair[0].start + pair[0].duration, pair[1].start);
        }
    }

    #[test]
    fn empty_audio_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("source.wav");
        make_wav(&wav, 0.0);

        let chunker = Chunker::new(Duration::from_secs(1)).unwrap();
        let err = chunker.split(&wav, &dir.path().join("chunks")).unwrap_err();
        assert!(matches!(err, GavelError::Decode(_)));
    }

    #[test]
    fn zero_max_duration_is_rejected() {
        let err = Chunker::new(Duration::ZERO).unwrap_err();
        assert!(matches!(err, GavelError::Config(_)));
    }

    #[test]
    fn stale_segments_from_a_different_duration_are_recut() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("source.wav");
        make_wav(&wav, 3.0);
        let chunks = dir.path().join("chunks");

        Chunker::new(Duration::from_secs(1))
            .unwrap()
            .split(&wav, &chunks)
            .unwrap();

        // Same scratch dir, new segment duration: the 1s files must not be
        // passed off as 2s segments.
        let segments = Chunker::new(Duration::from_secs(2))
            .unwrap()
            .split(&wav, &chunks)
            .unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segment_frames(&segments[0].path), RATE * 2);
        assert_eq!(segment_frames(&segments[1].path), RATE);
    }

    #[test]
    fn existing_segment_files_are_reused() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("source.wav");
        make_wav(&wav, 2.0);
        let chunks = dir.path().join("chunks");

        let chunker = Chunker::new(Duration::from_secs(1)).unwrap();
        let segments = chunker.split(&wav, &chunks).unwrap();
        let before = std::fs::metadata(&segments[0].path).unwrap().modified().unwrap();

        let again = chunker.split(&wav, &chunks).unwrap();
        let after = std::fs::metadata(&again[0].path).unwrap().modified().unwrap();

        assert_eq!(before, after);
    }
}
