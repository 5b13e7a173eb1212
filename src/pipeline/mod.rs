//! Chunked transcription pipeline for gavel
//!
//! Splits long recordings into bounded-duration segments, transcribes each one
//! through the speech-to-text client with a durable per-segment cache, then
//! assembles and summarizes the result.

mod assembler;
mod cache;
mod chunker;
mod orchestrator;
mod retry;

pub use assembler::{assemble, SEGMENT_BOUNDARY};
pub use cache::{SegmentKey, TranscriptCache};
pub use chunker::{Chunker, Segment};
pub use orchestrator::{Pipeline, ProgressCallback, RunArtifacts, RunState};
pub use retry::{with_retry, RetryPolicy};
