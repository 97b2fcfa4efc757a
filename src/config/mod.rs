pub mod site;
pub mod storage;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("calma-wrangle/", env!("CARGO_PKG_VERSION"));

/// Default Annalist collection directory, `~/annalist_site/c/CALMA_data`.
pub fn default_collection_dir() -> String {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => format!("{}/annalist_site/c/CALMA_data", home),
        _ => "./annalist_site/c/CALMA_data".to_string(),
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Parser)]
#[command(name = "wrangle", version, about = "CALMA data wrangling utility")]
pub struct Cli {
    /// Site configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Annalist collection directory (default: ~/annalist_site/c/CALMA_data)
    #[arg(long, global = true)]
    pub collection_dir: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable system monitoring
    #[arg(long, global = true)]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a CALMA analysis and print an outline of its contents
    Explore { url: String },

    /// Export Annalist type, list, view and field descriptions
    ExportMetadata { url: String },

    /// Export Annalist entity data for the subjects in an analysis
    ExportSubjects { url: String },

    /// Export metadata and entity data for an analysis
    ExportAnalysis { url: String },

    /// Export every analysis referenced by a track document
    ExportMultiple { url: String },
}

/// Resolved runtime configuration: defaults, overlaid by the site
/// configuration file, overlaid by command line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrangleConfig {
    pub collection_dir: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for WrangleConfig {
    fn default() -> Self {
        WrangleConfig {
            collection_dir: default_collection_dir(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl WrangleConfig {
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let site = match &cli.config {
            Some(path) => site::SiteConfig::from_file(path)?,
            None => site::SiteConfig::default(),
        };

        let mut config = WrangleConfig::default();
        if let Some(dir) = site.collection.and_then(|c| c.dir) {
            config.collection_dir = dir;
        }
        if let Some(http) = site.http {
            if let Some(timeout) = http.timeout_seconds {
                config.timeout_seconds = timeout;
            }
            if let Some(user_agent) = http.user_agent {
                config.user_agent = user_agent;
            }
        }
        if let Some(dir) = &cli.collection_dir {
            config.collection_dir = dir.clone();
        }
        if let Some(timeout) = cli.timeout {
            config.timeout_seconds = timeout;
        }
        Ok(config)
    }
}

impl ConfigProvider for WrangleConfig {
    fn collection_dir(&self) -> &str {
        &self.collection_dir
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Validate for WrangleConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("collection_dir", &self.collection_dir)?;
        validation::validate_positive_number("timeout", self.timeout_seconds, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = WrangleConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.collection_dir.ends_with("annalist_site/c/CALMA_data"));
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_resolve_layers_defaults_site_file_and_flags() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[collection]\ndir = \"/srv/site_collection\"\n\n\
             [http]\ntimeout_seconds = 60\nuser_agent = \"site-agent\"\n"
        )
        .unwrap();
        let config_path = file.path().to_str().unwrap().to_string();

        // flags beat the site file
        let cli = Cli {
            config: Some(config_path.clone()),
            collection_dir: Some("/srv/flag_collection".to_string()),
            timeout: Some(10),
            verbose: false,
            monitor: false,
            command: Command::Explore {
                url: "http://example.org/".to_string(),
            },
        };
        let config = WrangleConfig::resolve(&cli).unwrap();
        assert_eq!(config.collection_dir, "/srv/flag_collection");
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.user_agent, "site-agent");

        // without flags, the site file beats the defaults
        let cli = Cli {
            config: Some(config_path),
            collection_dir: None,
            timeout: None,
            verbose: false,
            monitor: false,
            command: Command::Explore {
                url: "http://example.org/".to_string(),
            },
        };
        let config = WrangleConfig::resolve(&cli).unwrap();
        assert_eq!(config.collection_dir, "/srv/site_collection");
        assert_eq!(config.timeout_seconds, 60);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = WrangleConfig {
            timeout_seconds: 0,
            ..WrangleConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
