//! Client configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Core API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.shodan.io";

/// Exploits API base URL
pub const DEFAULT_EXPLOIT_BASE_URL: &str = "https://exploits.shodan.io/api";

/// Streaming API base URL
pub const DEFAULT_STREAM_BASE_URL: &str = "https://stream.shodan.io";

/// Default number of chunks a subscription buffers before the reader waits
pub const DEFAULT_STREAM_CAPACITY: usize = 1;

/// Default time allowed to establish a connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// The three upstream hosts a client talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Core API (hosts, search, account, tools)
    #[serde(default = "default_api")]
    pub api: String,

    /// Exploits API
    #[serde(default = "default_exploits")]
    pub exploits: String,

    /// Streaming API
    #[serde(default = "default_stream")]
    pub stream: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: default_api(),
            exploits: default_exploits(),
            stream: default_stream(),
        }
    }
}

impl Endpoints {
    /// Point all three APIs at one host (useful for testing against a mock server)
    #[must_use]
    pub fn single(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            api: base.clone(),
            exploits: base.clone(),
            stream: base,
        }
    }
}

fn default_api() -> String {
    String::from(DEFAULT_BASE_URL)
}

fn default_exploits() -> String {
    String::from(DEFAULT_EXPLOIT_BASE_URL)
}

fn default_stream() -> String {
    String::from(DEFAULT_STREAM_BASE_URL)
}

/// Serializable client settings, consumed by
/// [`ShodanClientBuilder::from_config`](crate::ShodanClientBuilder::from_config).
///
/// The API key is not part of this struct; it is passed to the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Total per-request timeout applied by the transport. Also bounds how
    /// long a stream may stay open, so it is unset by default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub user_agent: Option<String>,

    /// Chunks buffered per subscription (minimum 1)
    #[serde(default = "default_stream_capacity")]
    pub stream_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timeout_secs: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: None,
            stream_capacity: default_stream_capacity(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

const fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT.as_secs()
}

const fn default_stream_capacity() -> usize {
    DEFAULT_STREAM_CAPACITY
}
