use serde::Deserialize;
use std::{fs, path::Path};

/// Environment variable that overrides the configured base URL.
const API_URL_ENV: &str = "API_URL";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub extract: ExtractSection,
}

#[derive(Debug, Deserialize)]
pub struct ExtractSection {
    /// Base URL of the extraction service. The upload endpoint is
    /// `{base_url}/api/extract`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Load from a TOML file. A missing file is not an error — the
    /// defaults apply. `API_URL` in the environment wins over both.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = if path.as_ref().exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.extract.base_url = url;
        }
        Ok(config)
    }

    /// Full URL of the extraction endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/api/extract",
            self.extract.base_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let config = Config::default();
        assert_eq!(config.endpoint(), "http://localhost:5000/api/extract");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config: Config = toml::from_str(
            r#"
            [extract]
            base_url = "https://extract.example.com/"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.endpoint(),
            "https://extract.example.com/api/extract"
        );
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.extract.base_url, "http://localhost:5000");
    }
}
