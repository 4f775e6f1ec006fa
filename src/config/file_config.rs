//! Settings file support for refmaker.
//!
//! # Configuration File Format
//!
//! ```toml
//! [openai]
//! model = "gpt-4o-mini"
//! base_url = "https://api.openai.com/v1"
//! timeout_secs = 120
//! summary_chars = 4000
//!
//! [pipeline]
//! input_dir = "/home/me/papers"
//! output_dir = "/home/me/papers"
//! metadata_pages = 3
//! report_name = "output.txt"
//! bib_name = "references.bib"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! The API key is deliberately left out of generated files; keep it in
//! `.env` or `OPENAI_API_KEY`.

use std::path::Path;

use super::Config;

/// Writer for the TOML settings file
#[derive(Debug)]
pub struct ConfigFile {
    config: Config,
}

impl ConfigFile {
    /// Wrap a configuration for saving. The API key is never written.
    pub fn new(mut config: Config) -> Self {
        config.openai.api_key = None;
        Self { config }
    }

    /// Default configuration
    pub fn create_default() -> Self {
        Self::new(Config::default())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(&self.config).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }

    /// Save configuration to a TOML file, refusing to overwrite an existing one
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        if path.exists() {
            return Err(ConfigFileError::AlreadyExists(path.display().to_string()));
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Refusing to overwrite existing file: {0}")]
    AlreadyExists(String),
}
