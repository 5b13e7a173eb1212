//! Pipeline orchestration
//!
//! Drives one run end to end: chunk the source, transcribe each segment
//! (cache first, remote client on a miss), assemble the ordered transcript,
//! summarize it, and write the output artifacts.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::audio::{prepare_wav, source_fingerprint};
use crate::config::Settings;
use crate::llm::{GroqChatClient, Summarizer, SummaryRequest};
use crate::pipeline::assembler::assemble;
use crate::pipeline::cache::{SegmentKey, TranscriptCache};
use crate::pipeline::chunker::Chunker;
use crate::pipeline::retry::{with_retry, RetryPolicy};
use crate::stt::{GroqSttClient, SpeechToText};
use crate::Result;

/// Progress callback type. Receives a monotonically increasing fraction in
/// `[0, 1]`; interpretation is left to the caller.
pub type ProgressCallback = Box<dyn Fn(f32) + Send + Sync>;

/// Where a run currently is. `Failed` is terminal and reachable from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Chunking,
    Transcribing,
    Assembling,
    Summarizing,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Chunking => "chunking",
            Self::Transcribing => "transcribing",
            Self::Assembling => "assembling",
            Self::Summarizing => "summarizing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Output of one completed run.
#[derive(Debug)]
pub struct RunArtifacts {
    pub transcript_path: PathBuf,
    pub summary_path: PathBuf,
    pub segment_count: usize,
    pub cache_hits: usize,
}

/// One-file-per-run transcription and summarization pipeline.
pub struct Pipeline {
    settings: Settings,
    cache: TranscriptCache,
    chunker: Chunker,
    stt: Box<dyn SpeechToText>,
    summarizer: Box<dyn Summarizer>,
    retry: RetryPolicy,
}

impl Pipeline {
    /// Build a pipeline backed by the real remote clients.
    pub fn new(settings: &Settings) -> Result<Self> {
        let stt = Box::new(GroqSttClient::from_settings(settings)?);
        let summarizer = Box::new(GroqChatClient::from_settings(settings)?);
        Self::with_clients(settings, stt, summarizer)
    }

    /// Build a pipeline with caller-supplied service clients.
    pub fn with_clients(
        settings: &Settings,
        stt: Box<dyn SpeechToText>,
        summarizer: Box<dyn Summarizer>,
    ) -> Result<Self> {
        Ok(Self {
            settings: settings.clone(),
            cache: TranscriptCache::new(settings.transcripts_dir()),
            chunker: Chunker::new(settings.max_segment_duration())?,
            stt,
            summarizer,
            retry: RetryPolicy::from(&settings.retry),
        })
    }

    /// Process one audio file into `full_transcript.txt` and `summary.txt`
    /// under `output_dir`.
    ///
    /// A failure leaves all completed per-segment transcripts cached, so a
    /// later run over the same source resumes at the first uncached segment.
    pub async fn run(
        &self,
        source: &Path,
        title: &str,
        output_dir: &Path,
        progress: ProgressCallback,
    ) -> Result<RunArtifacts> {
        let mut state = RunState::Idle;
        let result = self
            .run_inner(source, title, output_dir, &progress, &mut state)
            .await;

        if let Err(err) = &result {
            let stage = state;
            state = RunState::Failed;
            tracing::error!("Run is {} (was {}): {}", state, stage, err);
        }

        result
    }

    async fn run_inner(
        &self,
        source: &Path,
        title: &str,
        output_dir: &Path,
        progress: &ProgressCallback,
        state: &mut RunState,
    ) -> Result<RunArtifacts> {
        progress(0.0);

        *state = RunState::Chunking;
        tracing::info!("Chunking {}", source.display());
        let scratch = self.settings.chunks_dir();
        let wav = prepare_wav(source, &scratch).await?;
        // Scratch files and cached transcripts are only valid for the
        // segmentation that produced them, so the namespace carries the
        // segment duration alongside the source identity.
        let run_ns = format!(
            "{}-{}s",
            source_fingerprint(source)?,
            self.settings.chunking.max_segment_secs
        );
        let segment_dir = scratch.join(&run_ns);
        let segments = self.chunker.split(&wav, &segment_dir)?;
        progress(0.2);

        *state = RunState::Transcribing;
        let total = segments.len();
        let mut parts = Vec::with_capacity(total);
        let mut cache_hits = 0;

        for segment in &segments {
            let key = SegmentKey::new(run_ns.clone(), segment.index);
            if self.cache.has(&key) {
                cache_hits += 1;
            } else {
                tracing::info!("Transcribing segment {}/{}", segment.index + 1, total);
            }

            let text = self
                .cache
                .get_or_compute(&key, || async {
                    with_retry(&self.retry, "transcription", || {
                        self.stt.transcribe(&segment.path)
                    })
                    .await
                })
                .await?;

            parts.push((segment.index, text));
            progress(0.2 + (parts.len() as f32 / total as f32) * 0.6);
        }

        *state = RunState::Assembling;
        let full_transcript = assemble(parts)?;
        std::fs::create_dir_all(output_dir)?;
        let transcript_path = output_dir.join("full_transcript.txt");
        write_atomic(&transcript_path, &full_transcript)?;
        progress(0.9);

        *state = RunState::Summarizing;
        tracing::info!("Summarizing {} characters of transcript", full_transcript.len());
        let summary = with_retry(&self.retry, "summarization", || {
            self.summarizer.summarize(SummaryRequest {
                title,
                transcript: &full_transcript,
            })
        })
        .await?;
        let summary_path = output_dir.join("summary.txt");
        write_atomic(&summary_path, &summary)?;

        *state = RunState::Done;
        progress(1.0);
        tracing::info!(
            "Run complete: {} segment(s), {} served from cache",
            total,
            cache_hits
        );

        Ok(RunArtifacts {
            transcript_path,
            summary_path,
            segment_count: total,
            cache_hits,
        })
    }
}

/// Write `content` via a temp file + rename so a crash mid-write never leaves
/// a truncated artifact that looks complete.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
