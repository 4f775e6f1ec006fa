//! Configuration management.
//!
//! Settings come from three layers, lowest precedence first:
//!
//! 1. Built-in defaults (see the `default_*` helpers below)
//! 2. An optional `refmaker.toml` file (see [`find_config_file`])
//! 3. `REFMAKER_*` environment variables, with `__` separating sections,
//!    e.g. `REFMAKER_OPENAI__MODEL=gpt-4o`
//!
//! The API key falls back to `OPENAI_API_KEY`. Before any of this is read, a
//! `.env` file next to the executable (or in the working directory) is loaded
//! into the process environment.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Name of the optional settings file
pub const CONFIG_FILE_NAME: &str = "refmaker.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Completion API settings
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Input discovery and output files
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the OpenAI-compatible completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key (defaults to `OPENAI_API_KEY`)
    #[serde(default = "default_api_key", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Characters of paper text sent for summarization
    #[serde(default = "default_summary_chars")]
    pub summary_chars: usize,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            summary_chars: default_summary_chars(),
        }
    }
}

fn default_api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY").ok()
}

fn default_model() -> String {
    std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string())
}

fn default_base_url() -> String {
    std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
}

fn default_timeout() -> u64 {
    120
}

fn default_summary_chars() -> usize {
    crate::extractor::prompt::SUMMARY_CHAR_LIMIT
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory scanned recursively for PDFs
    #[serde(default = "executable_dir")]
    pub input_dir: PathBuf,

    /// Directory the report and bibliography are written to
    #[serde(default = "executable_dir")]
    pub output_dir: PathBuf,

    /// Pages read from each PDF for metadata and summary
    #[serde(default = "default_metadata_pages")]
    pub metadata_pages: usize,

    #[serde(default = "default_report_name")]
    pub report_name: String,

    #[serde(default = "default_bib_name")]
    pub bib_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: executable_dir(),
            output_dir: executable_dir(),
            metadata_pages: default_metadata_pages(),
            report_name: default_report_name(),
            bib_name: default_bib_name(),
        }
    }
}

impl PipelineConfig {
    /// Use `dir` for both input and output
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            input_dir: dir.clone(),
            output_dir: dir,
            ..Self::default()
        }
    }

    /// Full path of the plain-text report
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_name)
    }

    /// Full path of the BibTeX file
    pub fn bib_path(&self) -> PathBuf {
        self.output_dir.join(&self.bib_name)
    }
}

fn default_metadata_pages() -> usize {
    3
}

fn default_report_name() -> String {
    "output.txt".to_string()
}

fn default_bib_name() -> String {
    "references.bib".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Directory containing the running executable, or `.` if it cannot be found
pub fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load a `.env` file into the process environment.
///
/// The file next to the executable wins; otherwise `.env` is looked up from
/// the working directory. Returns the file that was loaded, if any.
pub fn load_env_file() -> Option<PathBuf> {
    let colocated = executable_dir().join(".env");
    if colocated.is_file() {
        return dotenvy::from_path(&colocated).ok().map(|_| colocated);
    }
    dotenvy::dotenv().ok()
}

/// Find a settings file next to the executable or in the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        Some(executable_dir().join(CONFIG_FILE_NAME)),
        dirs::config_dir().map(|dir| dir.join("refmaker").join(CONFIG_FILE_NAME)),
    ];

    candidates.into_iter().flatten().find(|path| path.is_file())
}

/// Load configuration from an optional file plus `REFMAKER_*` overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = ::config::Config::builder();
    if let Some(path) = path {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        builder = builder.add_source(::config::File::from(path));
    }

    let settings = builder
        .add_source(
            ::config::Environment::with_prefix("REFMAKER")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Errors raised while assembling the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ::config::ConfigError),
}

/// Supplies the pipeline with its configuration.
pub trait ConfigProvider {
    fn load(&self) -> Result<Config, ConfigError>;
}

/// Provider reading `.env`, an optional settings file and the environment
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    config_path: Option<PathBuf>,
    env_file: OnceLock<Option<PathBuf>>,
}

impl EnvConfigProvider {
    /// Search the default locations for a settings file
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit settings file
    pub fn with_config_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// The settings file that will be read, if any
    pub fn config_file(&self) -> Option<PathBuf> {
        self.config_path.clone().or_else(find_config_file)
    }

    /// The `.env` file loaded by the first [`ConfigProvider::load`], if any
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.get().and_then(|file| file.as_deref())
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn load(&self) -> Result<Config, ConfigError> {
        self.env_file.get_or_init(load_env_file);
        let config_file = self.config_file();
        load_config(config_file.as_deref())
    }
}

impl ConfigProvider for Config {
    fn load(&self) -> Result<Config, ConfigError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pipeline.metadata_pages, 3);
        assert_eq!(config.pipeline.report_name, "output.txt");
        assert_eq!(config.pipeline.bib_name, "references.bib");
        assert_eq!(config.openai.summary_chars, 4000);
        assert_eq!(config.openai.timeout_secs, 120);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_output_paths() {
        let pipeline = PipelineConfig::for_dir("/data/papers");
        assert_eq!(pipeline.input_dir, PathBuf::from("/data/papers"));
        assert_eq!(pipeline.report_path(), PathBuf::from("/data/papers/output.txt"));
        assert_eq!(pipeline.bib_path(), PathBuf::from("/data/papers/references.bib"));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
[openai]
api_key = "file-key"
model = "gpt-4o"
timeout_secs = 30

[pipeline]
input_dir = "/tmp/papers"
metadata_pages = 5
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.openai.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.timeout_secs, 30);
        assert_eq!(config.pipeline.input_dir, PathBuf::from("/tmp/papers"));
        assert_eq!(config.pipeline.metadata_pages, 5);
        assert_eq!(config.pipeline.bib_name, "references.bib");
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/refmaker.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_config_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[pipeline]\nmetadata_pages = \"many\"\n").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_config_is_its_own_provider() {
        let config = Config {
            pipeline: PipelineConfig::for_dir("/x"),
            ..Config::default()
        };
        assert_eq!(config.load().unwrap(), config);
    }

    #[test]
    fn test_env_file_is_loaded_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let provider = EnvConfigProvider::with_config_file(&path);
        assert!(provider.env_file().is_none());

        let config = provider.load().unwrap();
        assert_eq!(config.logging.level, "warn");
        let first = provider.env_file().map(Path::to_path_buf);
        provider.load().unwrap();
        assert_eq!(provider.env_file().map(Path::to_path_buf), first);
    }
}
