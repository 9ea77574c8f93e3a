pub mod file;

use crate::adapters::discogs::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
use crate::config::file::FileConfig;
use crate::domain::model::LabelOptions;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_bind_addr, validate_output_path, validate_positive_number, validate_url, Validate,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "caselabel")]
#[command(about = "Generate printable CD jewel-case labels from Discogs releases")]
pub struct CliConfig {
    /// Discogs release/master URL, or free text to search for
    #[arg(default_value = "https://www.discogs.com/master/41155-Ozzy-Osbourne-Blizzard-Of-Ozz")]
    pub query: String,

    /// Output PDF file path
    #[arg(long, default_value = "jukebox_labels.pdf")]
    pub out: String,

    /// Discogs API token
    #[arg(long, env = "DISCOGS_USER_TOKEN")]
    pub token: Option<String>,

    /// Shade every other track row
    #[arg(long)]
    pub alternate_backgrounds: bool,

    /// Draw a background block behind album and artist
    #[arg(long)]
    pub title_background: bool,

    /// Draw a millimetre ruler for print calibration
    #[arg(long)]
    pub ruler: bool,

    /// Keep bracketed notes in track titles
    #[arg(long)]
    pub keep_brackets: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl CliConfig {
    pub fn label_options(&self) -> LabelOptions {
        LabelOptions {
            alternate_backgrounds: self.alternate_backgrounds,
            title_background: self.title_background,
            ruler: self.ruler,
            strip_brackets: !self.keep_brackets,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_output_path("out", &self.out)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "caselabel-server")]
#[command(about = "Web service that turns Discogs releases into printable label PDFs")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<String>,

    /// Discogs API token
    #[arg(long, env = "DISCOGS_USER_TOKEN")]
    pub token: Option<String>,

    /// Discogs API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Optional TOML config file; flags take precedence over it
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub alternate_backgrounds: bool,

    #[arg(long)]
    pub title_background: bool,

    #[arg(long)]
    pub keep_brackets: bool,
}

/// Server settings after merging flags over the optional config file.
#[derive(Debug, Clone)]
pub struct ResolvedServerConfig {
    pub bind: String,
    pub token: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub options: LabelOptions,
}

impl ServerConfig {
    pub fn resolve(self) -> Result<ResolvedServerConfig> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(self.merge(file))
    }

    fn merge(self, file: FileConfig) -> ResolvedServerConfig {
        let server = file.server.unwrap_or_default();
        let discogs = file.discogs.unwrap_or_default();
        let label = file.label.unwrap_or_default();

        ResolvedServerConfig {
            bind: self
                .bind
                .or(server.bind)
                .unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            token: self.token.or(discogs.token),
            base_url: self
                .base_url
                .or(discogs.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_seconds: self
                .timeout_seconds
                .or(discogs.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            options: LabelOptions {
                alternate_backgrounds: self.alternate_backgrounds
                    || label.alternate_backgrounds.unwrap_or(false),
                title_background: self.title_background || label.title_background.unwrap_or(false),
                ruler: label.ruler.unwrap_or(false),
                strip_brackets: !self.keep_brackets && label.strip_brackets.unwrap_or(true),
            },
        }
    }
}

impl Validate for ResolvedServerConfig {
    fn validate(&self) -> Result<()> {
        validate_bind_addr("bind", &self.bind)?;
        validate_url("base_url", &self.base_url)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}
