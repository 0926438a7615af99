use std::str::FromStr;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// How new record ids are produced.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Millisecond wall-clock ids, kept strictly increasing per collection.
    #[default]
    Timestamp,
    /// Random UUID v4 ids.
    Uuid,
}

impl FromStr for IdStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(Self::Timestamp),
            "uuid" => Ok(Self::Uuid),
            other => Err(anyhow!("unknown id strategy '{other}' (expected timestamp or uuid)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one `<resource>.json` collection file per resource.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), id_strategy: IdStrategy::default() }
    }
}

fn default_data_dir() -> String { "db".to_string() }

/// Optional side listener for `/healthz` and `/metrics`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub addr: Option<String>,
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Prefer the TOML file at `CONFIG_PATH` (default `config.toml`); fall
    /// back to environment variables only when that file does not exist.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env()?,
            Err(e) => return Err(e.context(format!("invalid config file {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads =
            std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok());
        if let Ok(dir) = std::env::var("DATA_DIR") {
            cfg.storage.data_dir = dir;
        }
        if let Ok(strategy) = std::env::var("ID_STRATEGY") {
            cfg.storage.id_strategy = strategy.parse()?;
        }
        cfg.admin.addr = std::env::var("ADMIN_ADDR").ok();
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.admin.normalize();
        Ok(())
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>().is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir is empty; set it in config.toml or DATA_DIR"));
        }
        Ok(())
    }
}

impl AdminConfig {
    fn normalize(&mut self) {
        if self.addr.as_deref().is_some_and(|a| a.trim().is_empty()) {
            self.addr = None;
        }
    }
}
