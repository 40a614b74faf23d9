//! Layered application configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. YAML file passed with `--config`
//! 3. environment variables prefixed `APP__`, nested with `__`
//!    (e.g. `APP__EDGE_API__STORE__REMOTE__BASE_URL`)
//! 4. command-line overrides

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use edge_api::config::StoreBackend;
use edge_api::EdgeApiConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub edge_api: EdgeApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Requests running longer than this are answered with 504.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Largest accepted request body.
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout_secs: default_request_timeout_secs(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl ServerConfig {
    /// # Errors
    /// Fails when `bind_addr` is not a `host:port` socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {e}", self.bind_addr))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `edge_api=debug,info`.
    /// `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Command-line values that override the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
    pub mock: bool,
}

impl AppConfig {
    /// Loads defaults, then the optional YAML file, then `APP__*` variables.
    ///
    /// # Errors
    /// Fails when the file cannot be parsed or a value has the wrong shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .context("failed to parse configuration (yaml file or APP__ environment)")
    }

    /// Applies command-line overrides on top of the loaded layers.
    ///
    /// # Errors
    /// Fails when `--port` is given but the configured bind address cannot
    /// be parsed to carry it.
    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) -> Result<()> {
        if let Some(port) = cli.port {
            let mut addr = self.server.socket_addr()?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }

        if cli.mock {
            self.edge_api.store.backend = StoreBackend::Memory;
        }

        let level = match cli.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        };
        if let Some(level) = level {
            level.clone_into(&mut self.logging.level);
        }
        Ok(())
    }

    /// Effective configuration as YAML. Secrets are redacted.
    ///
    /// # Errors
    /// Fails if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration as YAML")
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8087".to_owned()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_body_limit_bytes() -> usize {
    16 * 1024
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    const ENV_KEYS: [&str; 5] = [
        "APP__SERVER__BIND_ADDR",
        "APP__EDGE_API__SOURCE_TAG",
        "APP__EDGE_API__STORE__BACKEND",
        "APP__EDGE_API__STORE__REMOTE__BASE_URL",
        "APP__EDGE_API__STORE__REMOTE__TOKEN",
    ];

    // Loads with the override variables cleared; temp_env serializes env access across tests.
    fn load_isolated(path: Option<&Path>) -> Result<AppConfig> {
        temp_env::with_vars_unset(ENV_KEYS, || AppConfig::load(path))
    }

    fn yaml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sources() {
        let cfg = load_isolated(None).unwrap();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8087");
        assert_eq!(cfg.server.request_timeout_secs, 30);
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert_eq!(cfg.edge_api.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.edge_api.source_tag.as_deref(), Some("serverless"));
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let file = yaml_file(
            r"
server:
  bind_addr: 0.0.0.0:9000
logging:
  format: json
edge_api:
  source_tag: edge
  store:
    backend: remote
    remote:
      base_url: https://kv.example.com
      token: from-file
",
        );

        let cfg = load_isolated(Some(file.path())).unwrap();
        assert_eq!(cfg.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.edge_api.source_tag.as_deref(), Some("edge"));
        assert_eq!(cfg.edge_api.store.backend, StoreBackend::Remote);
        assert_eq!(
            cfg.edge_api.store.remote.base_url.as_deref(),
            Some("https://kv.example.com")
        );
        assert!(cfg.edge_api.store.remote.token.is_some());
    }

    #[test]
    fn env_overrides_file() {
        let file = yaml_file("server:\n  bind_addr: 0.0.0.0:9000\n");

        temp_env::with_vars(
            [
                ("APP__SERVER__BIND_ADDR", Some("127.0.0.1:7000")),
                ("APP__EDGE_API__STORE__BACKEND", Some("remote")),
                (
                    "APP__EDGE_API__STORE__REMOTE__BASE_URL",
                    Some("http://localhost:8079"),
                ),
            ],
            || {
                let cfg = AppConfig::load(Some(file.path())).unwrap();
                assert_eq!(cfg.server.bind_addr, "127.0.0.1:7000");
                assert_eq!(cfg.edge_api.store.backend, StoreBackend::Remote);
                assert_eq!(
                    cfg.edge_api.store.remote.base_url.as_deref(),
                    Some("http://localhost:8079")
                );
            },
        );
    }

    #[test]
    fn all_digit_env_values_load_as_text() {
        temp_env::with_vars(
            [
                ("APP__EDGE_API__STORE__REMOTE__TOKEN", Some("1234567890")),
                ("APP__EDGE_API__SOURCE_TAG", Some("123")),
            ],
            || {
                let cfg = AppConfig::load(None).unwrap();
                assert_eq!(cfg.edge_api.source_tag.as_deref(), Some("123"));
                assert_eq!(
                    cfg.edge_api
                        .store
                        .remote
                        .token
                        .as_ref()
                        .unwrap()
                        .expose_secret(),
                    "1234567890"
                );
            },
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = yaml_file("server:\n  bind_adress: 0.0.0.0:9000\n");
        assert!(load_isolated(Some(file.path())).is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let mut cfg = AppConfig::default();
        cfg.edge_api.store.backend = StoreBackend::Remote;

        cfg.apply_cli_overrides(&CliOverrides {
            port: Some(9999),
            verbose: 2,
            mock: true,
        })
        .unwrap();

        assert_eq!(cfg.server.bind_addr, "127.0.0.1:9999");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.edge_api.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn no_verbose_keeps_configured_level() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "warn".to_owned();
        cfg.apply_cli_overrides(&CliOverrides::default()).unwrap();
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn invalid_bind_addr_is_reported() {
        let mut cfg = AppConfig::default();
        cfg.server.bind_addr = "not-an-address".to_owned();
        let err = cfg.server.socket_addr().unwrap_err();
        assert!(err.to_string().contains("Invalid bind address"));
    }

    #[test]
    fn yaml_output_redacts_token() {
        let file = yaml_file("edge_api:\n  store:\n    remote:\n      token: hunter2\n");
        let cfg = load_isolated(Some(file.path())).unwrap();

        let yaml = cfg.to_yaml().unwrap();
        assert!(yaml.contains("[REDACTED]"));
        assert!(!yaml.contains("hunter2"));
    }
}
