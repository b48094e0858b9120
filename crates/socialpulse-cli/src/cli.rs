use clap::{Args, Parser, Subcommand, ValueEnum};
use socialpulse_core::{BehaviorLabel, Platform, RiskLabel, SentimentLabel};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "socialpulse")]
#[command(
    author,
    version,
    about = "Sentiment, mental-health risk and behavior analysis of social-media posts"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify every configured dataset and report the results
    Analyze {
        /// Platforms to analyze (default: every configured dataset)
        #[arg(short, long, value_delimiter = ',')]
        platform: Vec<Platform>,

        /// Keep only these sentiment labels
        #[arg(long, value_delimiter = ',')]
        sentiment: Vec<SentimentLabel>,

        /// Keep only these risk labels
        #[arg(long, value_delimiter = ',')]
        risk: Vec<RiskLabel>,

        /// Keep only these behavior labels
        #[arg(long, value_delimiter = ',')]
        behavior: Vec<BehaviorLabel>,

        /// Write the filtered records' text, space-joined, to this file
        #[arg(long)]
        text_out: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Classify a single piece of text
    Classify {
        /// Text to classify
        text: String,

        /// Declared language of the text (ISO 639-1)
        #[arg(short, long)]
        language: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "socialpulse.yaml", env = "SOCIALPULSE_CONFIG")]
    pub config: String,

    /// Translation service base URL (enables translation)
    #[arg(long, env = "SOCIALPULSE_TRANSLATE_URL")]
    pub translate_endpoint: Option<String>,

    /// Disable translation even if configured or set through the environment
    #[arg(long)]
    pub no_translate: bool,

    /// Analysis language
    #[arg(long)]
    pub target_language: Option<String>,

    /// Records classified concurrently
    #[arg(long)]
    pub parallel: Option<usize>,

    /// Fail the run when every translation call fails
    #[arg(long)]
    pub fail_on_outage: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Print a Prometheus metrics snapshot after the run
    #[arg(long)]
    pub metrics: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
