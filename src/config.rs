use dotenvy::dotenv;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Process settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Upper bound for fetching one peer's chain.
    pub peer_timeout: Duration,
    /// Peers registered at startup (`PEERS`, comma-separated).
    pub peers: Vec<String>,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        let _ = dotenv();
        Self::from_process_env()
    }

    /// Like [`Config::from_env`], with an explicit env file. Variables
    /// already set in the process win over the file.
    pub fn from_env_file(path: impl AsRef<Path>) -> Self {
        let _ = dotenvy::from_path(path);
        Self::from_process_env()
    }

    fn from_process_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = get("PORT").and_then(|v| v.parse().ok()).unwrap_or(5000);
        let timeout_secs: u64 = get("PEER_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let peers = get("PEERS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host,
            port,
            peer_timeout: Duration::from_secs(timeout_secs),
            peers,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
