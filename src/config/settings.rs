//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Audio chunking settings
    #[serde(default)]
    pub chunking: ChunkingSettings,

    /// Speech-to-text service settings
    #[serde(default)]
    pub stt: SttSettings,

    /// LLM summarization settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Retry policy for remote service calls
    #[serde(default)]
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Data directory for segment scratch files, the transcript cache and
    /// output artifacts
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingSettings {
    /// Maximum duration of one audio segment, in seconds
    #[serde(default = "default_max_segment_secs")]
    pub max_segment_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttSettings {
    /// API key (falls back to GAVEL_GROQ_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Speech-to-text model name
    #[serde(default = "default_stt_model")]
    pub model: String,

    /// API endpoint (empty = Groq default)
    #[serde(default)]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API key (falls back to GAVEL_GROQ_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Chat model used for summarization
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API endpoint (empty = Groq default)
    #[serde(default)]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum attempts per remote call before the failure becomes fatal
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, doubled on each subsequent one
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound on the backoff delay
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "gavel", "gavel")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/gavel"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_segment_secs() -> u64 {
    600
}

fn default_stt_model() -> String {
    "whisper-large-v3".to_string()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    2000
}

fn default_max_delay_ms() -> u64 {
    60_000
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            max_segment_secs: default_max_segment_secs(),
        }
    }
}

impl Default for SttSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_stt_model(),
            endpoint: String::new(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: String::new(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            chunking: ChunkingSettings::default(),
            stt: SttSettings::default(),
            llm: LlmSettings::default(),
            retry: RetrySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("GAVEL_GROQ_API_KEY") {
            let key = key.trim();
            if !key.is_empty() {
                if self.stt.api_key.trim().is_empty() {
                    self.stt.api_key = key.to_string();
                }
                if self.llm.api_key.trim().is_empty() {
                    self.llm.api_key = key.to_string();
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "gavel", "gavel")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Scratch directory for per-run segment audio files
    pub fn chunks_dir(&self) -> PathBuf {
        self.general.data_dir.join("chunks")
    }

    /// Persistent per-segment transcript cache directory
    pub fn transcripts_dir(&self) -> PathBuf {
        self.general.data_dir.join("transcripts")
    }

    /// Maximum segment duration as a [`std::time::Duration`]
    pub fn max_segment_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.chunking.max_segment_secs)
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.general.data_dir)?;
        std::fs::create_dir_all(self.chunks_dir())?;
        std::fs::create_dir_all(self.transcripts_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ten_minute_segments() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.max_segment_secs, 600);
    }

    #[test]
    fn defaults_to_whisper_large_v3() {
        let settings = Settings::default();
        assert_eq!(settings.stt.model, "whisper-large-v3");
        assert_eq!(settings.llm.model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn cache_and_scratch_dirs_live_under_data_dir() {
        let mut settings = Settings::default();
        settings.general.data_dir = PathBuf::from("/tmp/gavel-test");
        assert_eq!(settings.chunks_dir(), PathBuf::from("/tmp/gavel-test/chunks"));
        assert_eq!(
            settings.transcripts_dir(),
            PathBuf::from("/tmp/gavel-test/transcripts")
        );
    }
}
