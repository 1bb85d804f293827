//! Service configuration.
//!
//! Settings come from an optional `blockscope.toml` file and are then
//! overridden by environment variables:
//!
//! | Variable | Setting |
//! |---|---|
//! | `HOST` | `server.host` |
//! | `PORT` | `server.port` |
//! | `DATA_DIR` | `data.dir` |
//! | `BLOCK_SUMMARY_PATH` | `data.block_summary_path` |
//! | `ANSWER_SAMPLES_PATH` | `data.answer_samples_path` |
//! | `OPENAI_API_KEY` | `llm.api_key` |
//! | `OPENAI_API_URL` | `llm.api_url` |
//! | `OPENAI_MODEL` | `llm.model` |
//! | `LLM_TIMEOUT_SECS` | `llm.timeout_secs` |
//!
//! Example file:
//!
//! ```toml
//! [server]
//! port = 5000
//!
//! [data]
//! dir = "public/data"
//!
//! [llm]
//! model = "gpt-3.5-turbo"
//! timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "blockscope.toml";
pub const BLOCK_SUMMARY_FILE: &str = "block_summary.json";
pub const ANSWER_SAMPLES_FILE: &str = "answer_samples.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No {0} found in standard locations")]
    NotFound(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
    /// Overrides `<dir>/block_summary.json`.
    #[serde(default)]
    pub block_summary_path: Option<PathBuf>,
    /// Overrides `<dir>/answer_samples.json`.
    #[serde(default)]
    pub answer_samples_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("public/data")
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            block_summary_path: None,
            answer_samples_path: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DataSettings {
    pub fn block_summary_path(&self) -> PathBuf {
        self.block_summary_path
            .clone()
            .unwrap_or_else(|| self.dir.join(BLOCK_SUMMARY_FILE))
    }

    pub fn answer_samples_path(&self) -> PathBuf {
        self.answer_samples_path
            .clone()
            .unwrap_or_else(|| self.dir.join(ANSWER_SAMPLES_FILE))
    }
}

impl AppConfig {
    /// Parse a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Look for `blockscope.toml` in the current directory, `backend/`, then the parent directory.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths.iter() {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(ConfigError::NotFound(CONFIG_FILE_NAME))
    }

    /// Defaults, then the config file if one exists, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::from_default_location() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => {
                log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay environment variables onto the current settings.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = env_string("HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parsed::<u16>("PORT")? {
            self.server.port = port;
        }
        if let Some(dir) = env_string("DATA_DIR") {
            self.data.dir = PathBuf::from(dir);
        }
        if let Some(path) = env_string("BLOCK_SUMMARY_PATH") {
            self.data.block_summary_path = Some(PathBuf::from(path));
        }
        if let Some(path) = env_string("ANSWER_SAMPLES_PATH") {
            self.data.answer_samples_path = Some(PathBuf::from(path));
        }
        if let Some(key) = env_string("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = env_string("OPENAI_API_URL") {
            self.llm.api_url = url;
        }
        if let Some(model) = env_string("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if let Some(timeout) = env_parsed::<u64>("LLM_TIMEOUT_SECS")? {
            self.llm.timeout_secs = timeout;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env_string(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}
