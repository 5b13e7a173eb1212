use async_trait::async_trait;
use std::path::Path;

use crate::Result;

/// Remote speech-to-text service for one segment's audio.
///
/// Implementations must not be assumed idempotent; the pipeline's transcript
/// cache is what makes repeated runs cheap.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> Result<String>;
}
