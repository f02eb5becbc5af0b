//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The client secret is loaded from the VEND_CLIENT_SECRET env var or
//! client_secret_file, never stored in the TOML directly to avoid leaking it.

use common::Secret;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use vend_auth::{ACCESS_ENDPOINT_TEMPLATE, AUTHORIZATION_ENDPOINT, Endpoints, GatewayConfig};

/// Env var holding the OAuth client secret
pub const CLIENT_SECRET_ENV: &str = "VEND_CLIENT_SECRET";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub vend: VendConfig,
    pub server: ServerConfig,
}

/// Vend application registration and store
#[derive(Debug, Deserialize)]
pub struct VendConfig {
    /// Store subdomain used when the callback carries no domain_prefix
    pub store_name: String,
    pub client_id: String,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    /// Path to a file containing the client secret (alternative to VEND_CLIENT_SECRET)
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
    /// Callback URI registered with Vend
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default = "default_authorization_endpoint")]
    pub authorization_endpoint: String,
    /// Token endpoint template, `{store}` is replaced by the store name
    #[serde(default = "default_access_endpoint")]
    pub access_endpoint: String,
}

/// HTTP listener settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// Timeout for calls to Vend
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_authorization_endpoint() -> String {
    AUTHORIZATION_ENDPOINT.to_string()
}

fn default_access_endpoint() -> String {
    ACCESS_ENDPOINT_TEMPLATE.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_connections() -> usize {
    100
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

impl VendConfig {
    /// Gateway configuration for one flow.
    ///
    /// `store_override` comes from the callback's `domain_prefix` and wins
    /// over the configured store name.
    pub fn gateway_config(&self, store_override: Option<&str>) -> GatewayConfig {
        GatewayConfig {
            store_name: store_override.unwrap_or(&self.store_name).to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone(),
            endpoints: Endpoints {
                authorization: self.authorization_endpoint.clone(),
                access_template: self.access_endpoint.clone(),
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Client secret resolution order:
    /// 1. VEND_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if config.vend.client_id.trim().is_empty() {
            return Err(common::Error::Config(
                "vend.client_id must not be empty".into(),
            ));
        }

        if !is_valid_store_name(&config.vend.store_name) {
            return Err(common::Error::Config(format!(
                "vend.store_name must be a store subdomain, got: {}",
                config.vend.store_name
            )));
        }

        if let Some(ref redirect_uri) = config.vend.redirect_uri
            && !is_http_url(redirect_uri)
        {
            return Err(common::Error::Config(format!(
                "vend.redirect_uri must start with http:// or https://, got: {redirect_uri}"
            )));
        }

        if !is_http_url(&config.vend.authorization_endpoint) {
            return Err(common::Error::Config(format!(
                "vend.authorization_endpoint must start with http:// or https://, got: {}",
                config.vend.authorization_endpoint
            )));
        }

        if !is_http_url(&config.vend.access_endpoint)
            || !config.vend.access_endpoint.contains(vend_auth::STORE_PLACEHOLDER)
        {
            return Err(common::Error::Config(format!(
                "vend.access_endpoint must be an http(s) URL containing {{store}}, got: {}",
                config.vend.access_endpoint
            )));
        }

        if config.server.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if config.server.max_connections == 0 {
            return Err(common::Error::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        // Resolve client secret: env var takes precedence over file
        if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            config.vend.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = config.vend.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                config.vend.client_secret = Some(Secret::new(secret));
            }
        }

        if config.vend.client_secret.as_ref().is_none_or(Secret::is_blank) {
            return Err(common::Error::Config(format!(
                "client secret missing: set {CLIENT_SECRET_ENV} or vend.client_secret_file"
            )));
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("vend-connect.toml")
    }
}

/// Store names are DNS labels: ASCII alphanumerics and `-`, no leading or
/// trailing `-`, at most 63 characters.
pub fn is_valid_store_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
