use super::{GeoLocation, Transport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

/// Everything Shodan knows about one IP, from /shodan/host/{ip}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostInfo {
    /// IP address as string
    pub ip_str: String,

    /// Open ports seen on the host
    #[serde(default)]
    pub ports: Vec<u16>,

    #[serde(default)]
    pub hostnames: Vec<String>,

    #[serde(default)]
    pub domains: Vec<String>,

    /// Organization that owns the IP
    #[serde(default)]
    pub org: Option<String>,

    /// Internet Service Provider
    #[serde(default)]
    pub isp: Option<String>,

    /// Autonomous System Number
    #[serde(default)]
    pub asn: Option<String>,

    /// Operating system
    #[serde(default)]
    pub os: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// CVE identifiers affecting any service on the host
    #[serde(default)]
    pub vulns: Vec<String>,

    #[serde(default)]
    pub last_update: Option<String>,

    /// Host-level location fields are flattened into the top-level object
    #[serde(flatten)]
    pub location: GeoLocation,

    /// Service banners (omitted when `minify` is requested)
    #[serde(default)]
    pub data: Vec<Banner>,
}

impl HostInfo {
    /// Returns the IP address, parsed
    #[must_use]
    pub fn ip_addr(&self) -> Option<IpAddr> {
        self.ip_str.parse().ok()
    }

    /// Returns the banner seen on the given port, if any
    #[must_use]
    pub fn service(&self, port: u16) -> Option<&Banner> {
        self.data.iter().find(|b| b.port == port)
    }
}

/// One service banner.
///
/// This is the record type of search matches, host details and every
/// streaming feed line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    pub ip_str: String,

    pub port: u16,

    #[serde(default)]
    pub transport: Transport,

    #[serde(default)]
    pub hostnames: Vec<String>,

    #[serde(default)]
    pub domains: Vec<String>,

    #[serde(default)]
    pub org: Option<String>,

    #[serde(default)]
    pub isp: Option<String>,

    #[serde(default)]
    pub asn: Option<String>,

    #[serde(default)]
    pub os: Option<String>,

    /// Product name
    #[serde(default)]
    pub product: Option<String>,

    /// Product version
    #[serde(default)]
    pub version: Option<String>,

    /// CPE identifiers
    #[serde(default)]
    pub cpe: Vec<String>,

    /// Raw banner text
    #[serde(default)]
    pub data: Option<String>,

    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub location: GeoLocation,

    #[serde(default)]
    pub http: Option<HttpData>,

    #[serde(default)]
    pub ssl: Option<SslData>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Vulnerabilities keyed by CVE
    #[serde(default)]
    pub vulns: HashMap<String, VulnInfo>,
}

impl Banner {
    /// Returns true if this service has known vulnerabilities
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        !self.vulns.is_empty()
    }
}

/// HTTP details of a web banner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpData {
    #[serde(default)]
    pub status: Option<u16>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub server: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub location: Option<String>,
}

/// TLS details of a banner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SslData {
    /// Negotiated protocol versions (e.g. "TLSv1.2")
    #[serde(default)]
    pub versions: Vec<String>,

    /// Certificate chain in PEM form
    #[serde(default)]
    pub chain: Vec<String>,

    /// Parsed leaf certificate, left opaque
    #[serde(default)]
    pub cert: Option<serde_json::Value>,
}

/// One vulnerability entry in a banner's `vulns` map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VulnInfo {
    #[serde(default)]
    pub cvss: Option<f64>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub verified: bool,

    #[serde(default)]
    pub references: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_with_flattened_location() {
        let host: HostInfo = serde_json::from_str(
            r#"{
                "ip_str": "8.8.8.8",
                "ports": [53, 443],
                "country_code": "US",
                "org": "Google LLC",
                "data": [{"ip_str": "8.8.8.8", "port": 53, "transport": "udp"}]
            }"#,
        )
        .unwrap();

        assert_eq!(host.location.country_code.as_deref(), Some("US"));
        assert_eq!(host.ip_addr(), Some("8.8.8.8".parse().unwrap()));
        assert_eq!(host.service(53).map(|b| b.transport), Some(Transport::Udp));
        assert!(host.service(80).is_none());
    }

    #[test]
    fn test_banner_vulns() {
        let banner: Banner = serde_json::from_str(
            r#"{
                "ip_str": "1.2.3.4",
                "port": 80,
                "location": {"country_code": "DE"},
                "vulns": {"CVE-2021-44228": {"cvss": 10.0, "verified": false}}
            }"#,
        )
        .unwrap();

        assert!(banner.is_vulnerable());
        assert_eq!(banner.location.country_code.as_deref(), Some("DE"));
        assert_eq!(banner.transport, Transport::Tcp);
    }
}
