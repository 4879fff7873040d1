use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// YAML file holding the candidate locations served by the API and CLI.
    pub locations_path: PathBuf,
    /// Page size used when a list request does not pass `limit`.
    pub default_limit: usize,
    /// Upper bound applied to any requested page size.
    pub max_limit: usize,
}

impl AppConfig {
    /// Clamp a requested page size into `1..=max_limit`, falling back to the default.
    #[must_use]
    pub fn normalize_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}
