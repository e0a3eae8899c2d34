use super::RequestsLoggingLevel;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Reported by the healthcheck: development, staging or production.
    pub env: String,
    /// Upper bound for the `page_size` listing parameter.
    pub max_page_size: i64,
    /// Upper bound for the ids in each `authors`/`categories` listing filter.
    pub max_filter_ids: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 4000,
            env: "development".to_string(),
            max_page_size: 100,
            max_filter_ids: 1000,
        }
    }
}
