mod file_config;

pub use file_config::{FileConfig, StoreFileConfig};

use crate::catalogue_store::{
    StoreConfig, DEFAULT_MAX_ASSOCIATION_SET, DEFAULT_READ_POOL_SIZE, DEFAULT_STORE_TIMEOUT,
    MAX_ASSOCIATION_SET_LIMIT,
};
use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_ENV: &str = "development";
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE_SIZE_LIMIT: i64 = 1000;
pub const ENVIRONMENTS: &[&str] = &["development", "staging", "production"];

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub env: String,
    pub logging_level: RequestsLoggingLevel,
    pub store_timeout_ms: u64,
    pub read_pool_size: usize,
    pub max_page_size: i64,
    pub max_association_set: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            port: DEFAULT_PORT,
            env: DEFAULT_ENV.to_string(),
            logging_level: RequestsLoggingLevel::default(),
            store_timeout_ms: DEFAULT_STORE_TIMEOUT.as_millis() as u64,
            read_pool_size: DEFAULT_READ_POOL_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            max_association_set: DEFAULT_MAX_ASSOCIATION_SET,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub env: String,
    pub logging_level: RequestsLoggingLevel,
    pub max_page_size: i64,

    pub store_timeout: Duration,
    pub read_pool_size: usize,
    pub max_association_set: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let store_file = file.store.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified on the command line or in config file")
            })?;

        if db_path.is_dir() {
            bail!("db_path is a directory, expected a database file: {:?}", db_path);
        }
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let port = file.port.unwrap_or(cli.port);

        let env = file.env.unwrap_or_else(|| cli.env.clone());
        if !ENVIRONMENTS.contains(&env.as_str()) {
            bail!(
                "Unknown environment {:?}, expected one of {}",
                env,
                ENVIRONMENTS.join("|")
            );
        }

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Unknown logging_level {:?} in config file", s),
            },
            None => cli.logging_level.clone(),
        };

        let max_page_size = file.max_page_size.unwrap_or(cli.max_page_size);
        if !(1..=MAX_PAGE_SIZE_LIMIT).contains(&max_page_size) {
            bail!(
                "max_page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE_LIMIT,
                max_page_size
            );
        }

        let store_timeout_ms = store_file.timeout_ms.unwrap_or(cli.store_timeout_ms);
        if store_timeout_ms == 0 {
            bail!("Store timeout must be greater than zero");
        }
        let read_pool_size = store_file.read_pool_size.unwrap_or(cli.read_pool_size);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }
        let max_association_set = store_file
            .max_association_set
            .unwrap_or(cli.max_association_set);
        if !(1..=MAX_ASSOCIATION_SET_LIMIT).contains(&max_association_set) {
            bail!(
                "max_association_set must be between 1 and {}, got {}",
                MAX_ASSOCIATION_SET_LIMIT,
                max_association_set
            );
        }

        Ok(Self {
            db_path,
            port,
            env,
            logging_level,
            max_page_size,
            store_timeout: Duration::from_millis(store_timeout_ms),
            read_pool_size,
            max_association_set,
        })
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            read_pool_size: self.read_pool_size,
            timeout: self.store_timeout,
            max_association_set: self.max_association_set,
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            port: self.port,
            requests_logging_level: self.logging_level.clone(),
            env: self.env.clone(),
            max_page_size: self.max_page_size,
            max_filter_ids: self.max_association_set,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
