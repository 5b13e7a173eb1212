//! LLM module for gavel
//!
//! Adapter for the remote chat model that turns a full transcript into a
//! structured meeting summary.

mod client;
mod groq;
mod prompts;

pub use client::{Summarizer, SummaryRequest};
pub use groq::GroqChatClient;
pub use prompts::build_summary_prompt;
