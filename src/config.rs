//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.geovis.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::domain::normalize_domains;
use crate::analysis::BrandProfile;
use crate::dataset::{ProviderTable, DEFAULT_BASE_URL};
use crate::models::Chatbot;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".geovis.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Poll loop settings.
    #[serde(default)]
    pub poll: PollConfig,

    /// Dataset input settings.
    #[serde(default)]
    pub collection: CollectionConfig,

    /// Brand and competitor settings.
    #[serde(default)]
    pub brand: BrandConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Dataset API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Dataset API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Poll loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds to wait between progress checks.
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: u64,

    /// Progress checks before a job counts as timed out.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            delay_seconds: default_delay_seconds(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_delay_seconds() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    90
}

/// Dataset input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Country the chatbots are queried from.
    #[serde(default = "default_country")]
    pub country: String,

    /// Output field overrides for ChatGPT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chatgpt_fields: Option<Vec<String>>,

    /// Output field overrides for Perplexity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perplexity_fields: Option<Vec<String>>,

    /// Output field overrides for Gemini.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_fields: Option<Vec<String>>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            chatgpt_fields: None,
            perplexity_fields: None,
            gemini_fields: None,
        }
    }
}

fn default_country() -> String {
    "US".to_string()
}

/// Brand and competitor settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandConfig {
    /// Domains that count as your site.
    #[serde(default)]
    pub target_domains: Vec<String>,

    /// Brand names to count in answers.
    #[serde(default)]
    pub brand_terms: Vec<String>,

    /// Competitor domains to look for in answers.
    #[serde(default)]
    pub competitor_domains: Vec<String>,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base output directory; each run writes to a dated subdirectory.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
        }
    }
}

fn default_out_dir() -> String {
    "geo-state-run".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref base_url) = args.base_url {
            self.api.base_url = base_url.clone();
        }

        if let Some(delay) = args.poll_delay_sec {
            self.poll.delay_seconds = delay;
        }
        if let Some(attempts) = args.poll_attempts {
            self.poll.max_attempts = attempts;
        }

        if let Some(ref country) = args.country {
            self.collection.country = country.clone();
        }

        if let Some(ref domains) = args.target_domains {
            self.brand.target_domains = domains.clone();
        }
        if let Some(ref terms) = args.brand_terms {
            self.brand.brand_terms = terms.clone();
        }
        if let Some(ref domains) = args.competitor_domains {
            self.brand.competitor_domains = domains.clone();
        }

        if let Some(ref out_dir) = args.out_dir {
            self.output.out_dir = out_dir.display().to_string();
        }
    }

    /// Brand profile with domains normalized and blank entries dropped.
    pub fn brand_profile(&self) -> BrandProfile {
        BrandProfile {
            target_domains: normalize_domains(&self.brand.target_domains),
            brand_terms: self
                .brand
                .brand_terms
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            competitor_domains: normalize_domains(&self.brand.competitor_domains),
        }
    }

    /// Provider field table with any configured overrides applied.
    pub fn provider_table(&self) -> ProviderTable {
        let overrides = [
            (Chatbot::ChatGpt, &self.collection.chatgpt_fields),
            (Chatbot::Perplexity, &self.collection.perplexity_fields),
            (Chatbot::Gemini, &self.collection.gemini_fields),
        ];

        overrides
            .into_iter()
            .fold(ProviderTable::default(), |table, (chatbot, fields)| match fields {
                Some(fields) => table.with_fields(chatbot, fields.clone()),
                None => table,
            })
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
