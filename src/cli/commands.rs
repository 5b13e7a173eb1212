//! CLI command implementations

use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::pipeline::{Pipeline, TranscriptCache};

/// Transcribe and summarize one recording.
pub async fn process_audio(
    settings: &Settings,
    file: &PathBuf,
    title: Option<String>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("Audio file not found: {}", file.display());
    }

    settings.ensure_dirs()?;

    let title =
        title.unwrap_or_else(|| format!("Meeting {}", Local::now().format("%Y-%m-%d %H:%M")));
    let output_dir = output_dir.unwrap_or_else(|| settings.general.data_dir.clone());

    let pipeline = Pipeline::new(settings)?;

    let progress = Box::new(|fraction: f32| {
        eprint!("\rProgress: {:>3.0}%", fraction * 100.0);
        if fraction >= 1.0 {
            eprintln!();
        }
    });

    let artifacts = pipeline
        .run(file, &title, &output_dir, progress)
        .await
        .with_context(|| format!("Failed to process {}", file.display()))?;

    println!(
        "Processed {} segment(s) ({} served from cache)",
        artifacts.segment_count, artifacts.cache_hits
    );
    println!("Transcript: {}", artifacts.transcript_path.display());
    println!("Summary:    {}", artifacts.summary_path.display());

    Ok(())
}

/// Remove segment scratch files, and with `cache` also the transcript cache.
pub fn clean(settings: &Settings, cache: bool) -> Result<()> {
    let chunks = settings.chunks_dir();
    if chunks.exists() {
        std::fs::remove_dir_all(&chunks)
            .with_context(|| format!("Failed to remove {}", chunks.display()))?;
        println!("Removed segment scratch files: {}", chunks.display());
    } else {
        println!("No segment scratch files to remove");
    }

    if cache {
        let transcripts = TranscriptCache::new(settings.transcripts_dir());
        transcripts.clear()?;
        println!(
            "Cleared transcript cache: {}",
            settings.transcripts_dir().display()
        );
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let content = toml::to_string_pretty(settings)?;
            println!("{}", content);
        }
        ConfigCommand::Path => {
            println!("{}", Settings::config_path()?.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}
