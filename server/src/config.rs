use clap::Parser;
use std::path::PathBuf;

/// Largest accepted log upload (1 MiB).
pub const DEFAULT_MAX_LOG_BYTES: usize = 1024 * 1024;

/// Server configuration
#[derive(Debug, Clone, Parser)]
#[command(
    name = "heads-server",
    version,
    about = "Static file, asset listing and log relay server for the talking heads scene"
)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HEADS_LISTEN", default_value = "0.0.0.0")]
    pub listen: String,
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
    /// Directory served as the site root; images live in `<dir>/images`
    #[arg(long, env = "HEADS_PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,
    /// Maximum body size for log uploads, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LOG_BYTES)]
    pub max_log_bytes: usize,
    /// Nesting depth kept when relaying logs; deeper containers are elided
    #[arg(long, default_value_t = 3)]
    pub log_depth: usize,
    /// Relay records buffered per observer before it starts skipping
    #[arg(long, default_value_t = 256)]
    pub log_channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0".to_string(),
            port: 3000,
            public_dir: PathBuf::from("public"),
            max_log_bytes: DEFAULT_MAX_LOG_BYTES,
            log_depth: 3,
            log_channel_capacity: 256,
        }
    }
}

impl ServerConfig {
    /// `host:port` string to bind.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen.trim().is_empty() {
            return Err("listen address must not be empty".to_string());
        }
        if self.max_log_bytes == 0 {
            return Err("max_log_bytes must be > 0".to_string());
        }
        if self.log_depth == 0 {
            return Err("log_depth must be >= 1".to_string());
        }
        if self.log_channel_capacity == 0 {
            return Err("log_channel_capacity must be > 0".to_string());
        }
        Ok(())
    }
}
