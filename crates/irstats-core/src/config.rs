//! Client configuration.
//!
//! A [`ClientConfig`] starts from the defaults below and is adjusted by an
//! ordered list of [`ClientOption`]s when the client is built. Options are
//! applied one at a time and the first failure aborts construction.
//!
//! Options can also be derived from the environment (and a `.env` file)
//! with [`options_from_env`].

use std::time::Duration;

use reqwest::header::HeaderValue;
use reqwest::{redirect, Proxy, Url};

use crate::api::ConfigError;

/// Membersite origin used when no base URL option is given
pub const DEFAULT_BASE_URL: &str = "https://members.iracing.com";

/// User agent sent when no user agent option is given
pub const DEFAULT_USER_AGENT: &str = "irstats-rs";

/// Form login endpoint on the membersite
pub const DEFAULT_LOGIN_PATH: &str = "/membersite/Login";

const ENV_BASE_URL: &str = "IRSTATS_BASE_URL";
const ENV_USER_AGENT: &str = "IRSTATS_USER_AGENT";
const ENV_TIMEOUT_SECS: &str = "IRSTATS_TIMEOUT_SECS";
const ENV_PROXY: &str = "IRSTATS_PROXY";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    user_agent: String,
    login_path: String,
    timeout: Option<Duration>,
    proxy: Option<Proxy>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            timeout: None,
            proxy: None,
        }
    }
}

impl ClientConfig {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn has_proxy(&self) -> bool {
        self.proxy.is_some()
    }

    /// Resolve a request path against the base URL.
    ///
    /// Paths are relative to the base URL's path, with or without a leading
    /// `/`. Absolute `http(s)://` URLs replace the base entirely.
    pub fn url_for(&self, path: &str) -> Result<Url, String> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| e.to_string())
    }

    /// Build the shared transport.
    ///
    /// Redirects are never followed: the session cookie arrives on the login
    /// response itself.
    pub(crate) fn build_transport(&self) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .redirect(redirect::Policy::none())
            .cookie_store(true);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(ref proxy) = self.proxy {
            builder = builder.proxy(proxy.clone());
        }

        builder.build().map_err(ConfigError::Transport)
    }
}

/// A single configuration step applied at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOption {
    /// Override the base URL (must be http or https with a host)
    BaseUrl(String),
    /// Override the User-Agent header
    UserAgent(String),
    /// Override the login endpoint path
    LoginPath(String),
    /// Total per-request timeout, including the login request
    Timeout(Duration),
    /// Route all traffic through a proxy
    Proxy(String),
}

impl ClientOption {
    pub fn apply(self, config: &mut ClientConfig) -> Result<(), ConfigError> {
        match self {
            ClientOption::BaseUrl(url) => {
                config.base_url = parse_base_url(&url)?;
            }
            ClientOption::UserAgent(agent) => {
                if HeaderValue::from_str(&agent).is_err() {
                    return Err(ConfigError::InvalidUserAgent(agent));
                }
                config.user_agent = agent;
            }
            ClientOption::LoginPath(path) => {
                if !path.starts_with('/') {
                    return Err(ConfigError::InvalidLoginPath(path));
                }
                config.login_path = path;
            }
            ClientOption::Timeout(timeout) => {
                if timeout.is_zero() {
                    return Err(ConfigError::InvalidTimeout);
                }
                config.timeout = Some(timeout);
            }
            ClientOption::Proxy(url) => {
                let proxy = Proxy::all(url.as_str())
                    .map_err(|source| ConfigError::InvalidProxy { url, source })?;
                config.proxy = Some(proxy);
            }
        }
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    // Request paths join beneath the base path
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Collect options from `IRSTATS_*` environment variables.
///
/// A `.env` file in the working directory is loaded first if present.
pub fn options_from_env() -> Result<Vec<ClientOption>, ConfigError> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();
    options_from_lookup(|key| std::env::var(key).ok())
}

pub(crate) fn options_from_lookup<F>(lookup: F) -> Result<Vec<ClientOption>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut options = Vec::new();

    if let Some(url) = value(ENV_BASE_URL) {
        options.push(ClientOption::BaseUrl(url));
    }
    if let Some(agent) = value(ENV_USER_AGENT) {
        options.push(ClientOption::UserAgent(agent));
    }
    if let Some(secs) = value(ENV_TIMEOUT_SECS) {
        let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::InvalidEnv {
            var: ENV_TIMEOUT_SECS,
            reason: format!("{e}"),
        })?;
        options.push(ClientOption::Timeout(Duration::from_secs(secs)));
    }
    if let Some(proxy) = value(ENV_PROXY) {
        options.push(ClientOption::Proxy(proxy));
    }

    Ok(options)
}
