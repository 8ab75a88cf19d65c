use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".taskd");
    }
    PathBuf::from(".taskd")
}

/// Runtime configuration for the daemon.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server port.
    pub port: u16,
    /// Bind address for the HTTP server. Default 127.0.0.1; 0.0.0.0 exposes
    /// the API on the LAN.
    pub bind_address: String,
    /// Directory holding the SQLite database.
    pub data_dir: PathBuf,
    /// Log filter directive for tracing-subscriber.
    pub log: String,
}

impl ServerConfig {
    /// Build config from CLI/env args.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        Self {
            port: port.unwrap_or(DEFAULT_PORT),
            bind_address: bind_address.unwrap_or_else(default_bind_address),
            data_dir: data_dir.unwrap_or_else(default_data_dir),
            log: log.unwrap_or_else(|| "info".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_given() {
        let config = ServerConfig::new(None, None, None, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.log, "info");
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let config = ServerConfig::new(
            Some(9090),
            Some(PathBuf::from("/tmp/taskd-test")),
            Some("debug".to_string()),
            Some("0.0.0.0".to_string()),
        );
        assert_eq!(config.port, 9090);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/taskd-test"));
        assert_eq!(config.log, "debug");
    }
}
