//! Runtime configuration.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything tunable about a run.
///
/// Assembled from three layers, later layers winning: built-in defaults,
/// an optional `ccdig.toml` in the working directory, then `CCDIG_`-prefixed
/// environment variables (e.g. `CCDIG_PAGE_CONCURRENCY=8`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the capture index host.
    pub index_base: String,
    /// Base URL of the bulk archive data store.
    pub data_base: String,
    /// `User-Agent` sent with every request; the archive host throttles
    /// anonymous agents.
    pub user_agent: String,
    /// URL glob the discovery sweep matches. A trailing `*` means "this
    /// host and everything under it".
    pub discovery_pattern: String,
    /// CDX page size, in index blocks.
    pub page_size: u32,
    /// How many CDX pages to fetch concurrently during discovery.
    pub page_concurrency: usize,
    /// Per-request deadline, in seconds.
    pub fetch_timeout_secs: u64,
    /// Reject locators longer than this before fetching.
    pub max_compressed_bytes: u64,
    /// Abandon records that inflate past this.
    pub max_uncompressed_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_base: "https://index.commoncrawl.org".to_string(),
            data_base: "https://data.commoncrawl.org".to_string(),
            user_agent: concat!("ccdig/", env!("CARGO_PKG_VERSION")).to_string(),
            discovery_pattern: "jobs.ashbyhq.com/*".to_string(),
            page_size: 100,
            page_concurrency: 4,
            fetch_timeout_secs: 30,
            max_compressed_bytes: 4 * 1024 * 1024,
            max_uncompressed_bytes: 32 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from defaults, `ccdig.toml`, and the environment.
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("ccdig.toml"))
            .merge(Env::prefixed("CCDIG_"))
            .extract()
            .or_raise(|| ErrorKind::Config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// The extraction caps this configuration implies.
    pub fn caps(&self) -> Caps {
        Caps {
            max_compressed_bytes: self.max_compressed_bytes,
            max_uncompressed_bytes: self.max_uncompressed_bytes,
            timeout: self.timeout(),
        }
    }
}

/// Safety caps for one extraction.
///
/// Both size caps guard against decompression-bomb captures; the timeout
/// bounds the range fetch. Exceeding any of them abandons that one record
/// only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caps {
    pub max_compressed_bytes: u64,
    pub max_uncompressed_bytes: u64,
    pub timeout: Duration,
}

impl Default for Caps {
    fn default() -> Self {
        Config::default().caps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = Config::default();
        assert!(config.index_base.starts_with("https://"));
        assert!(config.max_compressed_bytes < config.max_uncompressed_bytes);
        assert!(config.page_concurrency > 0);
    }

    #[test]
    fn test_caps_follow_config() {
        let mut config = Config::default();
        config.fetch_timeout_secs = 7;
        config.max_compressed_bytes = 1000;
        let caps = config.caps();
        assert_eq!(caps.timeout, Duration::from_secs(7));
        assert_eq!(caps.max_compressed_bytes, 1000);
    }

    #[test]
    fn test_defaults_extract_through_figment() {
        let config: Config = Figment::from(Serialized::defaults(Config::default())).extract().unwrap();
        assert_eq!(config.page_size, Config::default().page_size);
    }
}
