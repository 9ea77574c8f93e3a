use crate::utils::error::{LabelError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional TOML configuration for the server binary. Every field is
/// optional; command-line flags win over file values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerSection>,
    pub discogs: Option<DiscogsSection>,
    pub label: Option<LabelSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscogsSection {
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelSection {
    pub alternate_backgrounds: Option<bool>,
    pub title_background: Option<bool>,
    pub ruler: Option<bool>,
    pub strip_brackets: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LabelError::ConfigError {
            message: format!("cannot read config file {}: {}", path.display(), e),
        })?;
        toml::from_str(&text).map_err(|e| LabelError::ConfigError {
            message: format!("cannot parse config file {}: {}", path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_a_full_config_file() {
        let config: FileConfig = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0:8080"

            [discogs]
            token = "abc"
            base_url = "https://api.discogs.com"
            timeout_seconds = 15

            [label]
            alternate_backgrounds = true
            strip_brackets = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.unwrap().bind.as_deref(), Some("0.0.0.0:8080"));
        let discogs = config.discogs.unwrap();
        assert_eq!(discogs.token.as_deref(), Some("abc"));
        assert_eq!(discogs.timeout_seconds, Some(15));
        let label = config.label.unwrap();
        assert_eq!(label.alternate_backgrounds, Some(true));
        assert_eq!(label.strip_brackets, Some(false));
    }

    #[test]
    fn empty_file_is_a_valid_config() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.server.is_none());
        assert!(config.discogs.is_none());
        assert!(config.label.is_none());
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        assert!(matches!(
            FileConfig::load(Path::new("/does/not/exist.toml")),
            Err(LabelError::ConfigError { .. })
        ));

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"not [valid toml").unwrap();
        assert!(matches!(
            FileConfig::load(tmp.path()),
            Err(LabelError::ConfigError { .. })
        ));
    }
}
