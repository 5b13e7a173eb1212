//! Durable per-segment transcript cache
//!
//! A flat-file key/value store: one text file per segment, namespaced by the
//! source and its segmentation. Entries are written once, atomically, and never
//! evicted, which is what lets a re-run over the same file skip every segment
//! that already completed.

use std::future::Future;
use std::path::PathBuf;

use crate::Result;

/// Deterministic cache identity for one segment: the same (source namespace,
/// index) always maps to the same key. The namespace must encode everything
/// the segmentation depends on, i.e. the source identity and the segment
/// duration it was cut at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentKey {
    source: String,
    index: usize,
}

impl SegmentKey {
    pub fn new(source_id: impl Into<String>, index: usize) -> Self {
        Self {
            source: source_id.into(),
            index,
        }
    }

    fn file_name(&self) -> String {
        format!("segment_{:03}.txt", self.index)
    }
}

/// Flat-file transcript store with get-or-compute semantics.
pub struct TranscriptCache {
    root: PathBuf,
}

impl TranscriptCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_path(&self, key: &SegmentKey) -> PathBuf {
        self.root.join(&key.source).join(key.file_name())
    }

    /// Whether a transcript for `key` already exists.
    pub fn has(&self, key: &SegmentKey) -> bool {
        self.entry_path(key).exists()
    }

    /// Read the stored transcript for `key`, if any.
    pub fn get(&self, key: &SegmentKey) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    /// Return the cached transcript for `key`, or run `compute`, persist its
    /// result, and return it.
    ///
    /// The write happens only after `compute` fully succeeds and goes through
    /// a temp file + rename, so a failed computation never leaves a partial
    /// entry to be mistaken for a completed segment.
    pub async fn get_or_compute<F, Fut>(&self, key: &SegmentKey, compute: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        if let Some(text) = self.get(key)? {
            tracing::debug!("Cache hit for segment {}", key.index);
            return Ok(text);
        }

        let text = compute().await?;
        self.store(key, &text)?;
        Ok(text)
    }

    fn store(&self, key: &SegmentKey, text: &str) -> Result<()> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("txt.tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Remove every stored transcript.
    pub fn clear(&self) -> Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }
}
