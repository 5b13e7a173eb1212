//! Speech-to-text module for gavel
//!
//! Adapter for the remote transcription service. The service is a black box;
//! caching and retries are handled by the pipeline, not here.

mod client;
mod groq;

pub use client::SpeechToText;
pub use groq::GroqSttClient;
