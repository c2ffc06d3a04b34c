//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

use crate::models::Chatbot;

/// GeoVis - brand visibility in AI chatbot answers
///
/// Triggers chatbot answer datasets for a list of prompts, waits for
/// them to finish, and scores each answer for citations of your site,
/// brand mentions and competitor mentions.
///
/// Examples:
///   geovis --check-url https://acme.com --prompts-file prompts.txt --chatgpt-dataset-id gd_abc
///   geovis --check-url https://acme.com --prompts-file prompts.json --gemini-dataset-id gd_def --target-domains acme.com --brand-terms "Acme,Acme Widget"
///   geovis --check-url https://acme.com --prompts-file prompts.txt --chatgpt-dataset-id gd_abc --dry-run
///   geovis --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset API key
    #[arg(long, env = "BRIGHTDATA_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// Dataset API base URL
    #[arg(long, env = "BRIGHTDATA_API_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// URL to check in the dataset input (often your site or a root page)
    #[arg(long, value_name = "URL", required_unless_present = "init_config")]
    pub check_url: Option<String>,

    /// Prompts file: one prompt per line, or a JSON array
    #[arg(long, value_name = "FILE", required_unless_present = "init_config")]
    pub prompts_file: Option<PathBuf>,

    /// Dataset id for ChatGPT
    #[arg(long, value_name = "ID", default_value = "")]
    pub chatgpt_dataset_id: String,

    /// Dataset id for Perplexity
    #[arg(long, value_name = "ID", default_value = "")]
    pub perplexity_dataset_id: String,

    /// Dataset id for Gemini
    #[arg(long, value_name = "ID", default_value = "")]
    pub gemini_dataset_id: String,

    /// Country the chatbots are queried from
    #[arg(long, value_name = "CODE")]
    pub country: Option<String>,

    /// Seconds to wait between progress checks
    #[arg(long, value_name = "SECS")]
    pub poll_delay_sec: Option<u64>,

    /// Progress checks before a job counts as timed out
    #[arg(long, value_name = "COUNT")]
    pub poll_attempts: Option<u32>,

    /// Target domains (your site), comma-separated
    #[arg(long, value_name = "DOMAINS", value_delimiter = ',')]
    pub target_domains: Option<Vec<String>>,

    /// Brand terms, comma-separated
    #[arg(long, value_name = "TERMS", value_delimiter = ',')]
    pub brand_terms: Option<Vec<String>>,

    /// Competitor domains, comma-separated
    #[arg(long, value_name = "DOMAINS", value_delimiter = ',')]
    pub competitor_domains: Option<Vec<String>>,

    /// Base output directory
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Only trigger and poll (no snapshot download)
    #[arg(long)]
    pub skip_download: bool,

    /// Dry run: validate settings and show the planned jobs without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .geovis.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .geovis.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The check URL (empty if not set; validated first).
    pub fn check_url(&self) -> &str {
        self.check_url.as_deref().unwrap_or("")
    }

    /// Dataset jobs to run, in a fixed chatbot order. Blank ids are skipped.
    pub fn jobs(&self) -> Vec<(Chatbot, String)> {
        let ids = [
            &self.chatgpt_dataset_id,
            &self.perplexity_dataset_id,
            &self.gemini_dataset_id,
        ];

        Chatbot::ALL
            .into_iter()
            .zip(ids)
            .map(|(chatbot, id)| (chatbot, id.trim().to_string()))
            .filter(|(_, id)| !id.is_empty())
            .collect()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Dry runs never reach the API, so they don't need a key
        if !self.dry_run && self.api_key.trim().is_empty() {
            return Err("Missing BRIGHTDATA_API_KEY (env) or --api-key".to_string());
        }

        if self.jobs().is_empty() {
            return Err(
                "No dataset ids provided. Set at least --chatgpt-dataset-id, --perplexity-dataset-id or --gemini-dataset-id."
                    .to_string(),
            );
        }

        if let Some(ref base_url) = self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err("Base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.poll_delay_sec == Some(0) {
            return Err("Poll delay must be at least 1 second".to_string());
        }

        if self.poll_attempts == Some(0) {
            return Err("Poll attempts must be at least 1".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref prompts_file) = self.prompts_file {
            if !prompts_file.is_file() {
                return Err(format!(
                    "Prompts file does not exist: {}",
                    prompts_file.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
