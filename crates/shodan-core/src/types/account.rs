use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Account profile from /account/profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountProfile {
    #[serde(default)]
    pub display_name: Option<String>,

    /// Whether the account has a paid membership
    #[serde(default)]
    pub member: bool,

    #[serde(default)]
    pub credits: i64,

    #[serde(default)]
    pub created: Option<String>,
}

/// API plan information from /api-info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    pub plan: Option<String>,

    /// Query credits left this month
    #[serde(default)]
    pub query_credits: i64,

    /// Scan credits left this month
    #[serde(default)]
    pub scan_credits: i64,

    #[serde(default)]
    pub monitored_ips: Option<i64>,

    /// Whether search filters are unlocked
    #[serde(default)]
    pub unlocked: bool,

    #[serde(default)]
    pub unlocked_left: i64,

    #[serde(default)]
    pub https: bool,

    #[serde(default)]
    pub telnet: bool,

    #[serde(default)]
    pub usage_limits: Option<UsageLimits>,
}

impl ApiInfo {
    /// Returns true if there are query credits available
    #[must_use]
    pub const fn has_query_credits(&self) -> bool {
        self.query_credits > 0
    }
}

/// Monthly plan limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLimits {
    #[serde(default)]
    pub query_credits: Option<i64>,

    #[serde(default)]
    pub scan_credits: Option<i64>,

    #[serde(default)]
    pub monitored_ips: Option<i64>,
}

/// Request headers as seen by the API, from /tools/httpheaders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HttpHeaders(pub HashMap<String, String>);

impl HttpHeaders {
    /// Case-insensitive header lookup
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Caller's public address, from /tools/myip
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MyIpResponse(pub String);

impl MyIpResponse {
    /// Try to parse as an IP address
    #[must_use]
    pub fn parse(&self) -> Option<std::net::IpAddr> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for MyIpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
