use async_trait::async_trait;

use crate::Result;

/// Summary generation request payload.
pub struct SummaryRequest<'a> {
    pub title: &'a str,
    pub transcript: &'a str,
}

/// Remote language model that produces the structured meeting summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String>;
}
