use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "http://127.0.0.1";
pub const DEFAULT_RESTPP_PORT: u16 = 9000;
pub const DEFAULT_GSQL_PORT: u16 = 14240;
pub const DEFAULT_VERSION: &str = "4.x";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_restpp_port() -> u16 {
    DEFAULT_RESTPP_PORT
}
fn default_gsql_port() -> u16 {
    DEFAULT_GSQL_PORT
}
fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Which server port an endpoint is served on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortRole {
    RestppPort,
    GsqlPort,
}

/// Connection settings for one TigerGraph server.
///
/// At most one authentication strategy is used per connection; see
/// [`Auth::from_config`] for the selection rule when several are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_restpp_port")]
    pub restpp_port: u16,
    #[serde(default = "default_gsql_port")]
    pub gsql_port: u16,
    /// Server version tag used for endpoint resolution, e.g. "3.x" or "4.x".
    #[serde(default = "default_version")]
    pub version: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            restpp_port: DEFAULT_RESTPP_PORT,
            gsql_port: DEFAULT_GSQL_PORT,
            version: default_version(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            username: None,
            password: None,
            secret: None,
            token: None,
        }
    }
}

impl ConnectionConfig {
    /// Load configuration from defaults, an optional `tigerlink.toml` file,
    /// and `TIGERLINK_*` environment overrides
    /// (e.g. `TIGERLINK_HOST=http://tg.internal`).
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("restpp_port", DEFAULT_RESTPP_PORT as i64)?
            .set_default("gsql_port", DEFAULT_GSQL_PORT as i64)?
            .set_default("version", DEFAULT_VERSION)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .add_source(File::with_name("tigerlink").required(false))
            .add_source(Environment::with_prefix("TIGERLINK").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Host with a scheme, adding `http://` when none was given.
    pub fn host_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", self.host.trim_end_matches('/'))
        }
    }

    /// Base URL for the given port role, e.g. `http://127.0.0.1:9000`.
    pub fn base_url(&self, role: PortRole) -> String {
        let port = match role {
            PortRole::RestppPort => self.restpp_port,
            PortRole::GsqlPort => self.gsql_port,
        };
        format!("{}:{}", self.host_url(), port)
    }
}

/// One authentication strategy, fixed at construction so that illegal
/// combinations are unrepresentable past the config boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    UsernamePassword { username: String, password: String },
    Secret(String),
    Token(String),
}

impl Auth {
    /// Select the strategy from the config. Priority when several are set:
    /// username/password, then secret, then bearer token.
    pub fn from_config(config: &ConnectionConfig) -> Option<Auth> {
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            return Some(Auth::UsernamePassword {
                username: username.clone(),
                password: password.clone(),
            });
        }
        if let Some(secret) = &config.secret {
            return Some(Auth::Secret(secret.clone()));
        }
        config.token.as_ref().map(|t| Auth::Token(t.clone()))
    }
}
