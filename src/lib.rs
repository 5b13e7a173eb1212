//! gavel - Turn long meeting recordings into full transcripts and structured AI summaries
//!
//! The heart of the crate is a chunked transcription pipeline: long audio is
//! split into bounded-duration segments, each segment is transcribed through a
//! remote speech-to-text service, per-segment transcripts are cached on disk so
//! interrupted runs resume where they left off, and the assembled transcript is
//! summarized by a remote LLM.

pub mod audio;
pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod stt;

use thiserror::Error;

/// Main error type for gavel
#[derive(Error, Debug)]
pub enum GavelError {
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limited by remote service: {0}")]
    RateLimited(String),

    #[error("Remote service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Remote service rejected the audio: {0}")]
    InvalidInput(String),

    #[error("Transcript exceeds the summarizer context window: {0}")]
    ContextTooLarge(String),

    #[error("Missing transcript for segment {0}")]
    MissingSegment(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl GavelError {
    /// Whether a bounded retry is worthwhile. Local failures indicate broken
    /// state that a retry cannot fix.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::ServiceUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, GavelError>;
