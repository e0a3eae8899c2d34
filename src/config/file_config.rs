use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_path: Option<String>,
    pub port: Option<u16>,
    pub env: Option<String>,
    pub logging_level: Option<String>,
    pub max_page_size: Option<i64>,

    pub store: Option<StoreFileConfig>,
}

/// `[store]` section.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct StoreFileConfig {
    pub timeout_ms: Option<u64>,
    pub read_pool_size: Option<usize>,
    pub max_association_set: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
