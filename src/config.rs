use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::common::constants::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, DEFAULT_REFERENCE_URL_BASE};
use crate::common::error::{CompanyError, Result};

pub const CONFIG_ENV: &str = "CNPJ_SHEETS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ingest: IngestConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    /// Pre-built web client served for paths no API route matches
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub reference_url_base: String,
    /// Where uploads are staged while decoding; system temp dir when unset
    pub upload_dir: Option<PathBuf>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            reference_url_base: DEFAULT_REFERENCE_URL_BASE.to_string(),
            upload_dir: None,
        }
    }
}

impl IngestConfig {
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_prefix: "cnpj_sheets.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus scrape listener; metrics are not exported when unset
    pub listen_addr: Option<String>,
}

impl Config {
    /// Load configuration: explicit path, then `CNPJ_SHEETS_CONFIG`, then
    /// `config.toml` if it exists, then built-in defaults. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(p) => Self::from_file(&p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Config::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CompanyError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("CNPJ_SHEETS_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CNPJ_SHEETS_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| CompanyError::Config(format!("Invalid CNPJ_SHEETS_PORT '{}'", port)))?;
        }
        if let Ok(dir) = std::env::var("CNPJ_SHEETS_UPLOAD_DIR") {
            self.ingest.upload_dir = Some(PathBuf::from(dir));
        }
        if let Ok(base) = std::env::var("CNPJ_SHEETS_REFERENCE_URL") {
            self.ingest.reference_url_base = base;
        }
        if let Ok(addr) = std::env::var("CNPJ_SHEETS_METRICS_ADDR") {
            self.metrics.listen_addr = Some(addr);
        }
        Ok(())
    }
}
