//! Transport options and file/environment settings.
//!
//! Settings are read from a TOML file and then overlaid with environment
//! variables:
//!
//! ```toml
//! base_url = "http://localhost:8947"
//!
//! [transport]
//! timeout_secs = 30
//! request_retries = 2
//!
//! [options]
//! profile = "research"
//! region = "us-west-2"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use api::ClientConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daemon address used when nothing else is configured.
pub const DEFAULT_DAEMON_URL: &str = "http://localhost:8947";

/// Overrides the daemon base URL.
pub const ENV_DAEMON_URL: &str = "CWSD_URL";
/// Overrides the API key.
pub const ENV_API_KEY: &str = "CWS_API_KEY";
/// Overrides the credentials profile.
pub const ENV_PROFILE: &str = "AWS_PROFILE";
/// Overrides the region.
pub const ENV_REGION: &str = "AWS_REGION";

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`ClientSettings`].
    #[error("failed to parse settings: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range.
    #[error("invalid transport settings: {message}")]
    Invalid { message: String },
}

// ---------------------------------------------------------------------------
// Transport options
// ---------------------------------------------------------------------------

/// Connection-pool, timeout and retry configuration of the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Overall per-attempt request timeout.
    #[serde(rename = "timeout_secs", with = "secs")]
    pub timeout: Duration,
    /// TCP connect timeout.
    #[serde(rename = "connect_timeout_secs", with = "secs")]
    pub connect_timeout: Duration,
    /// Maximum idle connections kept per host.
    pub max_conns_per_host: usize,
    /// Maximum idle connections kept in total.
    ///
    /// Validated against `max_conns_per_host`; the underlying pool only caps
    /// idle connections per host, and a client talks to a single daemon.
    pub max_idle_conns: usize,
    /// How long an idle pooled connection is kept.
    #[serde(rename = "idle_conn_timeout_secs", with = "secs")]
    pub idle_conn_timeout: Duration,
    /// TCP keep-alive interval.
    #[serde(rename = "keep_alive_secs", with = "secs")]
    pub keep_alive: Duration,
    /// Extra attempts for idempotent requests that fail transiently.
    pub request_retries: u32,
    /// Delay before the first retry; doubled on every further attempt.
    #[serde(rename = "retry_backoff_ms", with = "millis")]
    pub retry_backoff: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_conns_per_host: 10,
            max_idle_conns: 100,
            idle_conn_timeout: Duration::from_secs(30),
            keep_alive: Duration::from_secs(30),
            request_retries: 0,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

impl TransportOptions {
    /// Rejects zero timeouts and an idle-connection total below the
    /// per-host limit.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |message: &str| {
            Err(SettingsError::Invalid {
                message: message.to_string(),
            })
        };

        if self.timeout.is_zero() {
            return invalid("timeout must be greater than zero");
        }
        if self.connect_timeout.is_zero() {
            return invalid("connect timeout must be greater than zero");
        }
        if self.idle_conn_timeout.is_zero() {
            return invalid("idle connection timeout must be greater than zero");
        }
        if self.max_conns_per_host == 0 {
            return invalid("max_conns_per_host must be at least 1");
        }
        if self.max_idle_conns < self.max_conns_per_host {
            return invalid("max_idle_conns must not be lower than max_conns_per_host");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Client settings
// ---------------------------------------------------------------------------

/// Everything needed to construct an [`HttpClient`](crate::HttpClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    pub transport: TransportOptions,
    pub options: ClientConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DAEMON_URL.to_string(),
            transport: TransportOptions::default(),
            options: ClientConfig::default(),
        }
    }
}

impl ClientSettings {
    /// Parses settings from TOML text and validates them.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let mut settings: Self =
            toml::from_str(text).map_err(|source| SettingsError::Parse { source })?;
        settings.normalize();
        settings.transport.validate()?;
        Ok(settings)
    }

    /// Reads and parses a TOML settings file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Applies the process environment on top of these settings.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; unset or empty variables are ignored.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(url) = get(ENV_DAEMON_URL) {
            self.base_url = url;
        }
        if let Some(api_key) = get(ENV_API_KEY) {
            self.options.api_key = api_key;
        }
        if let Some(profile) = get(ENV_PROFILE) {
            self.options.profile = profile;
        }
        if let Some(region) = get(ENV_REGION) {
            self.options.region = region;
        }
        self.normalize();
        self
    }

    fn normalize(&mut self) {
        if self.base_url.trim().is_empty() {
            self.base_url = DEFAULT_DAEMON_URL.to_string();
        }
    }
}

// ---------------------------------------------------------------------------
// Duration codecs
// ---------------------------------------------------------------------------

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = TransportOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.max_conns_per_host, 10);
        assert_eq!(options.max_idle_conns, 100);
        assert_eq!(options.idle_conn_timeout, Duration::from_secs(30));
        assert_eq!(options.request_retries, 0);
        assert!(options.validate().is_ok());
        assert_eq!(ClientSettings::default().base_url, DEFAULT_DAEMON_URL);
    }

    #[test]
    fn toml_overrides_only_the_given_fields() {
        let settings = ClientSettings::from_toml_str(
            r#"
            base_url = "http://daemon:9000"

            [transport]
            timeout_secs = 5
            retry_backoff_ms = 50
            request_retries = 3

            [options]
            profile = "research"
            "#,
        )
        .unwrap();

        assert_eq!(settings.base_url, "http://daemon:9000");
        assert_eq!(settings.transport.timeout, Duration::from_secs(5));
        assert_eq!(settings.transport.retry_backoff, Duration::from_millis(50));
        assert_eq!(settings.transport.request_retries, 3);
        assert_eq!(settings.transport.max_conns_per_host, 10);
        assert_eq!(settings.options.profile, "research");
        assert!(settings.options.region.is_empty());
    }

    #[test]
    fn invalid_transport_values_are_rejected() {
        let err = ClientSettings::from_toml_str("[transport]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));

        let err = ClientSettings::from_toml_str(
            "[transport]\nmax_conns_per_host = 20\nmax_idle_conns = 5\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("max_idle_conns"));

        let err = ClientSettings::from_toml_str("base_url = [").unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (ENV_DAEMON_URL, "http://remote:8947"),
            (ENV_API_KEY, "key-1"),
            (ENV_REGION, ""),
        ]
        .into_iter()
        .collect();

        let settings = ClientSettings {
            options: ClientConfig::default().with_region("eu-west-1"),
            ..ClientSettings::default()
        }
        .with_env_from(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(settings.base_url, "http://remote:8947");
        assert_eq!(settings.options.api_key, "key-1");
        // Empty variables do not clear configured values.
        assert_eq!(settings.options.region, "eu-west-1");
    }

    #[test]
    fn empty_base_url_falls_back_to_default() {
        let settings = ClientSettings::from_toml_str("base_url = \"\"").unwrap();
        assert_eq!(settings.base_url, DEFAULT_DAEMON_URL);
    }
}
