use anyhow::{Context, Result};
use book_catalogue_server::catalogue_store::{
    SqliteCatalogueStore, DEFAULT_MAX_ASSOCIATION_SET, DEFAULT_READ_POOL_SIZE,
};
use book_catalogue_server::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_ENV, DEFAULT_MAX_PAGE_SIZE, DEFAULT_PORT,
};
use book_catalogue_server::server::{run_server, GuardedCatalogueStore, RequestsLoggingLevel};
use clap::Parser;
use std::sync::Arc;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite catalogue database file. Created if missing.
    #[clap(value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Environment reported by the healthcheck (development|staging|production).
    #[clap(long, default_value = DEFAULT_ENV)]
    pub env: String,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Deadline for every storage operation, in milliseconds.
    #[clap(long, default_value_t = 3000)]
    pub store_timeout_ms: u64,

    /// Number of read-only connections kept open.
    #[clap(long, default_value_t = DEFAULT_READ_POOL_SIZE)]
    pub read_pool_size: usize,

    /// Largest accepted `page_size` on book listings.
    #[clap(long, default_value_t = DEFAULT_MAX_PAGE_SIZE)]
    pub max_page_size: i64,

    /// Largest author/category set, or delete id list, accepted in one request.
    #[clap(long, default_value_t = DEFAULT_MAX_ASSOCIATION_SET)]
    pub max_association_set: usize,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            port: self.port,
            env: self.env.clone(),
            logging_level: self.logging_level.clone(),
            store_timeout_ms: self.store_timeout_ms,
            read_pool_size: self.read_pool_size,
            max_page_size: self.max_page_size,
            max_association_set: self.max_association_set,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!(
        "Opening SQLite catalogue database at {:?}...",
        app_config.db_path
    );
    let store = SqliteCatalogueStore::new(&app_config.db_path, app_config.store_config())?;
    info!(
        "Store ready: {} read connections, {:?} deadline, sets up to {} ids",
        store.config().read_pool_size,
        store.config().timeout,
        store.config().max_association_set
    );
    let store: GuardedCatalogueStore = Arc::new(store);

    run_server(app_config.server_config(), store).await
}
