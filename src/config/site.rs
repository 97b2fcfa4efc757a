use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::error::{Result, WrangleError};

/// Optional TOML site configuration, e.g.:
///
/// ```toml
/// [collection]
/// dir = "/srv/annalist_site/c/CALMA_data"
///
/// [http]
/// timeout_seconds = 60
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    pub collection: Option<CollectionConfig>,
    pub http: Option<HttpConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl SiteConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(WrangleError::ConfigError {
                message: format!("Configuration file not found: {}", path),
            });
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WrangleError::ConfigError {
            message: format!("Invalid TOML in {}: {}", path, e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_site_config() {
        let config: SiteConfig = toml::from_str(
            "[collection]\ndir = \"/srv/calma\"\n\n[http]\ntimeout_seconds = 60\n",
        )
        .unwrap();
        assert_eq!(
            config.collection.and_then(|c| c.dir).as_deref(),
            Some("/srv/calma")
        );
        assert_eq!(config.http.unwrap().timeout_seconds, Some(60));
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config: SiteConfig = toml::from_str("").unwrap();
        assert!(config.collection.is_none());
        assert!(config.http.is_none());
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = SiteConfig::from_file("/no/such/wrangle.toml").unwrap_err();
        assert!(matches!(err, WrangleError::ConfigError { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[collection\ndir = ").unwrap();
        let err = SiteConfig::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, WrangleError::ConfigError { .. }));
    }
}
