//! Configuration management for office-mcp

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Main configuration structure for the application
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Spreadsheet server configuration
    pub sheets: SheetsConfig,

    /// Slide server configuration
    pub slides: SlidesConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Enable verbose (debug) logging
    #[serde(default)]
    pub verbose: bool,

    /// Transport protocol: "stdio" or "http"
    #[serde(default = "default_transport")]
    pub transport: Transport,

    /// Host to bind for HTTP
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind for HTTP
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow binding to non-loopback interfaces.
    #[serde(default)]
    pub allow_remote: bool,

    /// Maximum number of concurrent HTTP requests served.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Maximum accepted HTTP request body size in bytes.
    #[serde(default = "default_max_request_body_bytes")]
    pub max_request_body_bytes: usize,
}

#[derive(
    Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Stdio,
    Http,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SheetsConfig {
    /// Directory used for workbooks created without `output_path`, and the
    /// prefix applied to relative `write_excel` paths.
    #[serde(default = "default_sheets_dir")]
    pub default_dir: PathBuf,

    /// Row cap applied by `read_excel` when `max_rows` is not given.
    #[serde(default = "default_read_max_rows")]
    pub read_max_rows: usize,

    /// Number of records included in the `read_excel` data preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SlidesConfig {
    /// Directory used by `save_presentation` when `output_path` is omitted.
    #[serde(default = "default_slides_dir")]
    pub default_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            transport: default_transport(),
            host: default_host(),
            port: default_port(),
            allow_remote: false,
            max_concurrent_requests: default_max_concurrent_requests(),
            max_request_body_bytes: default_max_request_body_bytes(),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            default_dir: default_sheets_dir(),
            read_max_rows: default_read_max_rows(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl Default for SlidesConfig {
    fn default() -> Self {
        Self {
            default_dir: default_slides_dir(),
        }
    }
}

// Default value functions
fn default_transport() -> Transport {
    Transport::Stdio
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3737
}

fn default_max_concurrent_requests() -> usize {
    64
}

fn default_max_request_body_bytes() -> usize {
    256 * 1024
}

fn default_sheets_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("Documents"))
}

fn default_read_max_rows() -> usize {
    100
}

fn default_preview_rows() -> usize {
    10
}

fn default_slides_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Returns `true` if the host string refers to a loopback address.
pub fn is_loopback_host(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

fn path_default(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            // Start with default values
            .set_default("server.verbose", false)?
            .set_default("server.transport", "stdio")?
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("server.allow_remote", false)?
            .set_default(
                "server.max_concurrent_requests",
                default_max_concurrent_requests() as i64,
            )?
            .set_default(
                "server.max_request_body_bytes",
                default_max_request_body_bytes() as i64,
            )?
            .set_default("sheets.default_dir", path_default(&default_sheets_dir()))?
            .set_default("sheets.read_max_rows", default_read_max_rows() as i64)?
            .set_default("sheets.preview_rows", default_preview_rows() as i64)?
            .set_default("slides.default_dir", path_default(&default_slides_dir()))?;

        // Try to load from office-mcp.toml in the current directory
        if Path::new("office-mcp.toml").exists() {
            builder = builder.add_source(config::File::with_name("office-mcp"));
        }

        // Try to load from ~/.office-mcp/office-mcp.toml
        if let Some(home_dir) = dirs::home_dir() {
            let config_path = home_dir.join(".office-mcp").join("office-mcp.toml");
            if config_path.exists() {
                builder = builder.add_source(config::File::from(config_path));
            }
        }

        // Override with environment variables (e.g. OFFICE_MCP__SHEETS__DEFAULT_DIR=/tmp)
        builder = builder.add_source(
            config::Environment::with_prefix("OFFICE_MCP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let cfg = Config::default();
        assert_eq!(cfg.server.transport, Transport::Stdio);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 3737);
        assert!(!cfg.server.allow_remote);
        assert_eq!(cfg.server.max_concurrent_requests, 64);
        assert_eq!(cfg.server.max_request_body_bytes, 256 * 1024);
        assert_eq!(cfg.sheets.read_max_rows, 100);
        assert_eq!(cfg.sheets.preview_rows, 10);
        assert_eq!(cfg.sheets.default_dir, default_sheets_dir());
        assert_eq!(cfg.slides.default_dir, PathBuf::from("."));
    }

    #[test]
    fn loopback_hosts_are_detected() {
        assert!(is_loopback_host("localhost"));
        assert!(is_loopback_host("127.0.0.1"));
        assert!(is_loopback_host("::1"));
        assert!(!is_loopback_host("0.0.0.0"));
        assert!(!is_loopback_host("example.com"));
    }

    #[test]
    #[serial_test::serial]
    #[allow(unsafe_code)]
    fn env_overrides_work() {
        // Environment overrides use prefix OFFICE_MCP__
        unsafe { std::env::set_var("OFFICE_MCP__SHEETS__DEFAULT_DIR", "/tmp/office-mcp-sheets") };
        unsafe { std::env::set_var("OFFICE_MCP__SHEETS__PREVIEW_ROWS", "3") };
        unsafe { std::env::set_var("OFFICE_MCP__SERVER__TRANSPORT", "http") };
        let loaded = Config::load().expect("load config from env");
        assert_eq!(
            loaded.sheets.default_dir,
            PathBuf::from("/tmp/office-mcp-sheets")
        );
        assert_eq!(loaded.sheets.preview_rows, 3);
        assert_eq!(loaded.server.transport, Transport::Http);
        // Cleanup
        unsafe { std::env::remove_var("OFFICE_MCP__SHEETS__DEFAULT_DIR") };
        unsafe { std::env::remove_var("OFFICE_MCP__SHEETS__PREVIEW_ROWS") };
        unsafe { std::env::remove_var("OFFICE_MCP__SERVER__TRANSPORT") };
    }
}
