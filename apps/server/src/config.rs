//! Gateway configuration
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. Optional config file (`--config <path>`, `CATALOG_CONFIG`, or `./catalog-gateway.{toml,yaml,json}`)
//! 3. `CATALOG__*` environment variables (`CATALOG__SERVER__PORT=9000`)
//! 4. `ELASTICSEARCH_NODES` / `ELASTICSEARCH_CONN_TIMEOUT`
//! 5. Command-line flags (applied by the binary via [`Config::apply_overrides`])

use catalog_query::ParseOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "CATALOG";
const DEFAULT_CONFIG_FILE: &str = "catalog-gateway";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub query: QueryConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty disables CORS headers.
    pub cors_origins: Vec<String>,
    pub max_request_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            max_request_body_size: 64 * 1024,
        }
    }
}

/// Elasticsearch cluster access.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URLs of cluster nodes, used round-robin.
    pub nodes: Vec<String>,
    pub index: String,
    /// Per-query timeout.
    pub timeout_seconds: u64,
    /// How long startup waits for the cluster to answer; 0 skips the wait.
    pub connect_timeout_ms: u64,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["http://localhost:9200".to_string()],
            index: "products".to_string(),
            timeout_seconds: 10,
            connect_timeout_ms: 0,
            username: None,
            password: None,
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("nodes", &self.nodes)
            .field("index", &self.index)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Pagination defaults and limits for `/v1/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_size: usize,
    pub max_size: usize,
    /// Upper bound for `from + size`; keep at or below the index's `max_result_window`.
    pub max_window: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        let defaults = ParseOptions::default();
        Self {
            default_size: defaults.default_size,
            max_size: defaults.max_size,
            max_window: defaults.max_window,
        }
    }
}

impl QueryConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            default_size: self.default_size,
            max_size: self.max_size,
            max_window: self.max_window,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Disable only for local development.
    pub enabled: bool,
    pub realm: String,
    pub credentials: Vec<Credential>,
    /// Exact paths served without credentials.
    pub public_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            realm: "catalog".to_string(),
            credentials: Vec::new(),
            public_paths: vec!["/".to_string(), "/health".to_string(), "/metrics".to_string()],
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level for gateway targets; `RUST_LOG` overrides it.
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// daily, hourly, minutely or never
    pub file_rotation: String,
    pub service_name: String,
    pub deployment_environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "catalog-gateway".to_string(),
            file_rotation: "daily".to_string(),
            service_name: "catalog-gateway".to_string(),
            deployment_environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load from defaults, the config file and the environment.
    ///
    /// An explicit `path` must exist. Without one, `catalog-gateway.{toml,yaml,json}`
    /// in the working directory is read if present.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        // A missing .env file is the normal case outside development.
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("search.nodes")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("auth.public_paths")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: Config = settings.try_deserialize()?;
        cfg.apply_legacy_env()?;
        Ok(cfg)
    }

    fn apply_legacy_env(&mut self) -> Result<(), config::ConfigError> {
        if let Ok(nodes) = std::env::var("ELASTICSEARCH_NODES") {
            self.apply_overrides(Some(&nodes), None);
        }
        if let Ok(timeout) = std::env::var("ELASTICSEARCH_CONN_TIMEOUT") {
            let parsed = parse_duration(&timeout).ok_or_else(|| {
                config::ConfigError::Message(format!(
                    "invalid elasticsearch cluster connection timeout value: {timeout}"
                ))
            })?;
            self.apply_overrides(None, Some(parsed));
        }
        Ok(())
    }

    /// Apply a comma-separated node list and/or a startup connect timeout.
    pub fn apply_overrides(&mut self, nodes: Option<&str>, connect_timeout: Option<Duration>) {
        if let Some(nodes) = nodes {
            self.search.nodes = split_nodes(nodes);
        }
        if let Some(timeout) = connect_timeout {
            self.search.connect_timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.search.nodes.is_empty() {
            return Err(
                "there were no elasticsearch nodes provided, did you forget to populate ELASTICSEARCH_NODES=?"
                    .to_string(),
            );
        }
        for node in &self.search.nodes {
            let parsed =
                url::Url::parse(node).map_err(|e| format!("invalid search node URL '{node}': {e}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(format!("search node URL '{node}' must use http or https"));
            }
        }
        if self.search.index.trim().is_empty() {
            return Err("search.index must not be empty".to_string());
        }
        if self.search.timeout_seconds == 0 {
            return Err("search.timeout_seconds must be greater than 0".to_string());
        }
        if self.query.default_size > self.query.max_size {
            return Err(format!(
                "query.default_size ({}) must not exceed query.max_size ({})",
                self.query.default_size, self.query.max_size
            ));
        }
        if self.query.max_size > self.query.max_window {
            return Err(format!(
                "query.max_size ({}) must not exceed query.max_window ({})",
                self.query.max_size, self.query.max_window
            ));
        }
        if self.auth.enabled && self.auth.credentials.is_empty() {
            return Err(
                "auth.credentials must contain at least one entry when auth is enabled".to_string(),
            );
        }
        if self
            .auth
            .credentials
            .iter()
            .any(|c| c.username.is_empty() || c.username.contains(':'))
        {
            return Err("auth.credentials usernames must be non-empty and must not contain ':'".to_string());
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

fn split_nodes(nodes: &str) -> Vec<String> {
    nodes
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

/// Parse a duration such as `30s`, `500ms`, `1m30s` or `1.5s`.
///
/// Accepts the units `ns`, `us`/`µs`, `ms`, `s`, `m` and `h`, optionally
/// fractional and chained. A bare number is read as seconds.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return nanos_to_duration(component_nanos(value, "s")?);
    }

    let mut total: u128 = 0;
    let mut rest = value;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);
        total = total.checked_add(component_nanos(number, unit)?)?;
        rest = next;
    }
    nanos_to_duration(total)
}

/// Nanoseconds in `number` (`12`, `1.5`, `.25`) of `unit`, computed without floats.
fn component_nanos(number: &str, unit: &str) -> Option<u128> {
    let scale: u128 = match unit {
        "ns" => 1,
        "us" | "µs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60_000_000_000,
        "h" => 3_600_000_000_000,
        _ => return None,
    };
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(scale)?;

    // Digits past nanosecond precision for any unit are dropped.
    let fraction = &fraction[..fraction.len().min(18)];
    if !fraction.is_empty() {
        let digits: u128 = fraction.parse().ok()?;
        let divisor = 10u128.pow(fraction.len() as u32);
        nanos = nanos.checked_add(digits * scale / divisor)?;
    }
    Some(nanos)
}

fn nanos_to_duration(nanos: u128) -> Option<Duration> {
    let secs = u64::try_from(nanos / 1_000_000_000).ok()?;
    Some(Duration::new(secs, (nanos % 1_000_000_000) as u32))
}
