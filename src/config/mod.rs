//! Configuration handling for the listing engine.
//!
//! The front end owns the settings store; on this side everything arrives
//! through environment variables. `Config::from_env` loads them with
//! development defaults and validates the few typed values.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use tracing::warn;

use crate::model::{ChannelSource, SourceError};

/// Environment variable names.
pub const ENV_API_ENABLED: &str = "TUBELIST_API_ENABLED";
pub const ENV_API_KEY: &str = "TUBELIST_API_KEY";
pub const ENV_REGION: &str = "TUBELIST_REGION";
pub const ENV_VIDEO_QUALITY: &str = "TUBELIST_VIDEO_QUALITY";
pub const ENV_VERIFY_TLS: &str = "TUBELIST_VERIFY_TLS";
pub const ENV_SOURCE_COUNT: &str = "TUBELIST_SOURCE_COUNT";
/// Prefix of the per-source variables, suffixed with the 1-based index.
pub const ENV_SOURCE_URL_PREFIX: &str = "TUBELIST_SOURCE_URL";
pub const ENV_WEB_BASE: &str = "TUBELIST_WEB_BASE";
pub const ENV_API_BASE: &str = "TUBELIST_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "TUBELIST_TIMEOUT_SECS";

pub const DEFAULT_WEB_BASE: &str = "https://www.youtube.com";
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_REGION: &str = "US";
const DEFAULT_VIDEO_QUALITY: &str = "best";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Highest source index read from the environment.
pub const MAX_SOURCES: u64 = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    api_enabled: bool,
    api_key: String,
    region: String,
    video_quality: String,
    verify_tls: bool,
    source_urls: Vec<String>,
    web_base: String,
    api_base: String,
    timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_enabled: false,
            api_key: String::new(),
            region: DEFAULT_REGION.to_string(),
            video_quality: DEFAULT_VIDEO_QUALITY.to_string(),
            verify_tls: true,
            source_urls: Vec::new(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key/value lookup (environment, a settings file, a test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        let source_count = match lookup(ENV_SOURCE_COUNT) {
            Some(raw) => parse_number(ENV_SOURCE_COUNT, &raw)?,
            None => 0,
        };
        if source_count > MAX_SOURCES {
            warn!(
                declared = source_count,
                limit = MAX_SOURCES,
                "too many channel sources declared, reading only the first ones"
            );
        }
        let source_urls = (1..=source_count.min(MAX_SOURCES))
            .map(|index| lookup(&format!("{ENV_SOURCE_URL_PREFIX}{index}")).unwrap_or_default())
            .collect();

        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => Duration::from_secs(parse_number(ENV_TIMEOUT_SECS, &raw)?),
            None => defaults.timeout,
        };

        Ok(Self {
            api_enabled: match lookup(ENV_API_ENABLED) {
                Some(raw) => parse_bool(ENV_API_ENABLED, &raw)?,
                None => defaults.api_enabled,
            },
            api_key: lookup(ENV_API_KEY).unwrap_or_default().trim().to_string(),
            region: text(ENV_REGION, defaults.region),
            video_quality: text(ENV_VIDEO_QUALITY, defaults.video_quality),
            verify_tls: match lookup(ENV_VERIFY_TLS) {
                Some(raw) => parse_bool(ENV_VERIFY_TLS, &raw)?,
                None => defaults.verify_tls,
            },
            source_urls,
            web_base: text(ENV_WEB_BASE, defaults.web_base)
                .trim_end_matches('/')
                .to_string(),
            api_base: text(ENV_API_BASE, defaults.api_base)
                .trim_end_matches('/')
                .to_string(),
            timeout,
        })
    }

    /// The API credential, only when the API is switched on and a key is set.
    pub fn api_key(&self) -> Option<&str> {
        (self.api_enabled && !self.api_key.is_empty()).then_some(self.api_key.as_str())
    }
    pub fn api_enabled(&self) -> bool {
        self.api_enabled
    }
    pub fn region(&self) -> &str {
        &self.region
    }
    /// Quality preference handed to the stream resolver; unused by listings.
    pub fn video_quality(&self) -> &str {
        &self.video_quality
    }
    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }
    /// Raw configured source strings, in index order (blank entries included).
    pub fn source_urls(&self) -> &[String] {
        &self.source_urls
    }
    pub fn web_base(&self) -> &str {
        &self.web_base
    }
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Configured sources in index order. Blank entries are skipped and
    /// references that are neither a channel nor a user are dropped.
    pub fn channel_sources(&self) -> Vec<ChannelSource> {
        self.source_urls
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| match ChannelSource::parse(raw) {
                Ok(source) => Some(source),
                Err(SourceError::Blank) => None,
                Err(err) => {
                    warn!(index = index + 1, error = %err, "dropping configured source");
                    None
                }
            })
            .collect()
    }
}

fn parse_bool(field: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        reason: format!("expected a non-negative integer, got '{}'", raw.trim()),
    })
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceType;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn from_map(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = from_map(&[]).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.region(), "US");
        assert_eq!(cfg.web_base(), DEFAULT_WEB_BASE);
        assert!(cfg.verify_tls());
        assert_eq!(cfg.api_key(), None);
        assert!(cfg.channel_sources().is_empty());
    }

    #[test]
    fn api_key_requires_flag_and_value() {
        let cfg = from_map(&[(ENV_API_KEY, "secret")]).unwrap();
        assert_eq!(cfg.api_key(), None);

        let cfg = from_map(&[(ENV_API_ENABLED, "true"), (ENV_API_KEY, "  ")]).unwrap();
        assert_eq!(cfg.api_key(), None);

        let cfg = from_map(&[(ENV_API_ENABLED, "yes"), (ENV_API_KEY, "secret")]).unwrap();
        assert_eq!(cfg.api_key(), Some("secret"));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(from_map(&[(ENV_VERIFY_TLS, "maybe")]).is_err());
        assert!(from_map(&[(ENV_SOURCE_COUNT, "-2")]).is_err());
        assert!(from_map(&[(ENV_TIMEOUT_SECS, "soon")]).is_err());
    }

    #[test]
    fn sources_keep_index_order_and_drop_bad_entries() {
        let cfg = from_map(&[
            (ENV_SOURCE_COUNT, "4"),
            ("TUBELIST_SOURCE_URL1", "/user/first"),
            ("TUBELIST_SOURCE_URL2", ""),
            ("TUBELIST_SOURCE_URL3", "https://www.youtube.com/c/custom"),
            ("TUBELIST_SOURCE_URL4", "https://www.youtube.com/channel/UC4/videos"),
            ("TUBELIST_SOURCE_URL5", "/channel/ignored"),
        ])
        .unwrap();

        assert_eq!(cfg.source_urls().len(), 4);
        let sources = cfg.channel_sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].id, "first");
        assert_eq!(sources[0].source_type, SourceType::User);
        assert_eq!(sources[1].id, "UC4");
        assert_eq!(sources[1].source_type, SourceType::Channel);
    }

    #[test]
    fn huge_source_count_is_capped() {
        let cfg = from_map(&[
            (ENV_SOURCE_COUNT, "100000000000"),
            ("TUBELIST_SOURCE_URL1", "https://www.youtube.com/channel/UC1"),
        ])
        .unwrap();

        assert_eq!(cfg.source_urls().len(), MAX_SOURCES as usize);
        let sources = cfg.channel_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, "UC1");
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe {
            env::set_var(ENV_REGION, "DE");
            env::set_var(ENV_WEB_BASE, "http://localhost:9000/");
        }
        let cfg = Config::from_env().unwrap();
        unsafe {
            env::remove_var(ENV_REGION);
            env::remove_var(ENV_WEB_BASE);
        }
        assert_eq!(cfg.region(), "DE");
        assert_eq!(cfg.web_base(), "http://localhost:9000");
    }
}
