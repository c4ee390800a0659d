use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub user_id: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: "http://localhost:8000".to_string(),
            user_id: 1,
        }
    }
}

impl Config {
    /// Reads `config.toml` from the platform config directory, falling back
    /// to defaults. `FLORIN_API_URL` and `FLORIN_USER_ID` override both.
    pub fn load() -> anyhow::Result<Config> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("invalid config at {}", path.display()))?
            }
            _ => Config::default(),
        };

        if let Ok(url) = std::env::var("FLORIN_API_URL") {
            config.api_url = url;
        }
        if let Ok(id) = std::env::var("FLORIN_USER_ID") {
            config.user_id = id.parse().context("FLORIN_USER_ID must be an integer")?;
        }

        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "florin", "Florin")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
