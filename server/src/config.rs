//! Server configuration
//!
//! Everything comes from environment variables, except the API credentials
//! which live in a TOML secrets file and may be overridden from the
//! environment.

use common::Credentials;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the web server listens on
    pub bind_addr: String,

    /// TOML file holding the `[rapidapi]` key and host
    pub secrets_path: PathBuf,

    /// Timeout for a single call to the job API
    pub api_timeout: Duration,

    /// Path of the search endpoint on the API host
    pub endpoint_path: String,

    /// Idle time after which a browser session is dropped
    pub session_ttl: Duration,

    /// Most sessions kept in memory at once
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            secrets_path: PathBuf::from("secrets.toml"),
            api_timeout: client::DEFAULT_TIMEOUT,
            endpoint_path: client::DEFAULT_ENDPOINT_PATH.to_string(),
            session_ttl: crate::store::DEFAULT_SESSION_TTL,
            max_sessions: crate::store::DEFAULT_MAX_SESSIONS,
        }
    }
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables:
    /// - JOBS_BIND_ADDR (default: 127.0.0.1:3000)
    /// - JOBS_SECRETS_PATH (default: secrets.toml)
    /// - JOBS_API_TIMEOUT (seconds, default: 30)
    /// - JOBS_API_ENDPOINT (default: /active-jb-7d)
    /// - JOBS_SESSION_TTL (seconds, default: 1800)
    /// - JOBS_MAX_SESSIONS (default: 10000)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_timeout = lookup("JOBS_API_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.api_timeout);

        let session_ttl = lookup("JOBS_SESSION_TTL")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_ttl);

        let max_sessions = lookup("JOBS_MAX_SESSIONS")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|max| *max > 0)
            .unwrap_or(defaults.max_sessions);

        Self {
            bind_addr: lookup("JOBS_BIND_ADDR").unwrap_or(defaults.bind_addr),
            secrets_path: lookup("JOBS_SECRETS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.secrets_path),
            api_timeout,
            endpoint_path: lookup("JOBS_API_ENDPOINT").unwrap_or(defaults.endpoint_path),
            session_ttl,
            max_sessions,
        }
    }

    /// Loads the API credentials.
    ///
    /// RAPIDAPI_KEY and RAPIDAPI_HOST take precedence over the secrets file.
    /// Missing values are not an error here; searches report them instead.
    pub fn load_credentials(&self) -> Credentials {
        load_credentials(&self.secrets_path, |name| std::env::var(name).ok())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    rapidapi: RapidApiSecrets,
}

#[derive(Debug, Default, Deserialize)]
struct RapidApiSecrets {
    key: Option<String>,
    host: Option<String>,
}

fn read_secrets(path: &Path) -> RapidApiSecrets {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Could not read secrets file {:?}: {}", path, e);
            return RapidApiSecrets::default();
        }
    };

    match toml::from_str::<SecretsFile>(&content) {
        Ok(secrets) => secrets.rapidapi,
        Err(e) => {
            warn!("Failed to parse secrets file {:?}: {}", path, e);
            RapidApiSecrets::default()
        }
    }
}

fn load_credentials(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Credentials {
    let secrets = read_secrets(path);
    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let credentials = Credentials::new(
        non_blank(lookup("RAPIDAPI_KEY"))
            .or(secrets.key)
            .unwrap_or_default(),
        non_blank(lookup("RAPIDAPI_HOST"))
            .or(secrets.host)
            .unwrap_or_default(),
    );

    if credentials.is_present() {
        info!("🔑 Loaded API credentials for {}", credentials.api_host);
    } else {
        warn!("⚠️  API credentials not configured; searches will fail until they are");
    }

    credentials
}
