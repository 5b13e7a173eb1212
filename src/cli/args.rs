//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// gavel - Turn long meeting recordings into transcripts and structured summaries
#[derive(Parser, Debug)]
#[command(name = "gavel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe and summarize one audio file (mp3, wav or m4a)
    Process {
        /// Path to the recording
        file: PathBuf,

        /// Title used in the summary (defaults to a timestamped one)
        #[arg(short, long)]
        title: Option<String>,

        /// Directory for full_transcript.txt and summary.txt
        /// (defaults to the data directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Remove segment scratch files, and optionally the transcript cache
    Clean {
        /// Also clear the persistent per-segment transcript cache
        #[arg(long)]
        cache: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
