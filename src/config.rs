use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use anyhow::{Result, anyhow};

pub const DEFAULT_SERVER: &str = "http://localhost:3000";
pub const DEFAULT_QUESTION: &str = "What's the next big Solana memecoin? 🚀";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub server_url: Option<String>,
    pub question: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(Self::get_config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(Self::get_config_path()?)
    }

    fn load_from(config_path: PathBuf) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    fn save_to(&self, config_path: PathBuf) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Also hosts the log file; see `main::init_logging`.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("blip-chat"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("config.json")).unwrap();
        assert!(config.server_url.is_none());
        assert!(config.question.is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            server_url: Some("http://blip.example:8080".to_string()),
            question: Some("wen lambo?".to_string()),
        };
        config.save_to(path.clone()).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.server_url.as_deref(), Some("http://blip.example:8080"));
        assert_eq!(loaded.question.as_deref(), Some("wen lambo?"));
    }
}
