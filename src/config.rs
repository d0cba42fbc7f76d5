//! Configuration management

use std::{env, path::Path};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default upstream host
pub const DEFAULT_BASE_URL: &str = "https://api.blockchair.com";

/// Environment variable consulted when no credential is configured
pub const CREDENTIAL_ENV_VAR: &str = "BLOCKCHAIR_API_KEY";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Environment files to load before resolving the credential.
    /// Paths support ~ expansion. Loaded in order; variables already set win.
    pub env_files: Vec<String>,
    /// Upstream API configuration
    pub api: ApiConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Dashboard configuration
    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env_files: vec![".env".to_string()],
            api: ApiConfig::default(),
            server: ServerConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the aggregation API
    pub base_url: String,
    /// API key. Supports a literal value or `env:VAR_NAME`.
    /// Falls back to `BLOCKCHAIR_API_KEY` when unset.
    pub credential: Option<String>,
    /// User-Agent header sent upstream
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credential: None,
            user_agent: format!("blockchair-dashboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 39480,
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Chain used for address and transaction lookups
    pub chain: String,
    /// Number of recent transactions to request
    pub recent_limit: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            chain: "bitcoin".to_string(),
            recent_limit: 5,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    /// A missing credential is not an error here; operations report it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        figment = figment.merge(Env::prefixed("BLOCKCHAIR_DASHBOARD_").split("__"));

        let mut config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        // Env files first so `${VAR}` and `env:VAR` can see their values
        config.load_env_files();
        config.expand_env_vars();
        config.api.credential =
            resolve_credential(config.api.credential.as_deref(), |name| env::var(name).ok());

        Ok(config)
    }

    /// Load environment files into the process environment.
    /// Files that don't exist are silently skipped.
    fn load_env_files(&self) {
        for path_str in &self.env_files {
            let expanded = if path_str.starts_with('~') {
                if let Some(home) = dirs::home_dir() {
                    path_str.replacen('~', &home.display().to_string(), 1)
                } else {
                    path_str.clone()
                }
            } else {
                path_str.clone()
            };

            let path = Path::new(&expanded);
            if path.exists() {
                match dotenvy::from_path(path) {
                    Ok(()) => {
                        tracing::info!("Loaded env file: {expanded}");
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load env file {expanded}: {e}");
                    }
                }
            } else {
                tracing::debug!("Env file not found (skipped): {expanded}");
            }
        }
    }

    /// Expand ${VAR} and ${VAR:-default} patterns in the base URL
    fn expand_env_vars(&mut self) {
        let Ok(re) = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}") else {
            return;
        };
        self.api.base_url = expand_string(&re, &self.api.base_url, |name| env::var(name).ok());
    }
}

/// Expand environment variables in a string
fn expand_string(re: &Regex, value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    re.replace_all(value, |caps: &regex::Captures| {
        let default = caps.get(2).map_or("", |m| m.as_str());
        lookup(&caps[1]).unwrap_or_else(|| default.to_string())
    })
    .into_owned()
}

/// Resolve the configured credential.
///
/// `env:VAR` reads `VAR`; an unset or blank value falls back to
/// [`CREDENTIAL_ENV_VAR`]. Blank results count as missing.
pub fn resolve_credential(
    configured: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let resolved = match configured.map(str::trim) {
        Some(value) if !value.is_empty() => match value.strip_prefix("env:") {
            Some(var_name) => lookup(var_name),
            None => Some(value.to_string()),
        },
        _ => lookup(CREDENTIAL_ENV_VAR),
    };

    resolved
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
