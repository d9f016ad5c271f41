use super::Facets;
use serde::{Deserialize, Serialize};

/// Results from the Exploits API `/search` and `/count` endpoints
///
/// `/count` returns the same shape with an empty `matches` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploitResults {
    #[serde(default)]
    pub matches: Vec<Exploit>,

    pub total: u64,

    #[serde(default)]
    pub facets: Facets,
}

/// A single exploit or advisory record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exploit {
    /// Identifier within the originating source
    #[serde(rename = "_id")]
    pub id: serde_json::Value,

    /// Data source (e.g. "ExploitDB", "CVE", "Metasploit")
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Author name or numeric author id, depending on the source
    #[serde(default)]
    pub author: Option<serde_json::Value>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    /// Exploit kind (e.g. "remote", "dos", "local")
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Exploit source code, when the source publishes it
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub cve: Vec<String>,

    /// Bugtraq ids
    #[serde(default)]
    pub bid: Vec<u64>,

    /// Microsoft security bulletin ids
    #[serde(default)]
    pub msb: Vec<String>,

    #[serde(default)]
    pub osvdb: Vec<u64>,
}

impl Exploit {
    /// Returns true if the record references the given CVE (case-insensitive)
    #[must_use]
    pub fn references_cve(&self, cve: &str) -> bool {
        self.cve.iter().any(|c| c.eq_ignore_ascii_case(cve))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exploit_search_response() {
        let results: ExploitResults = serde_json::from_str(
            r#"{
                "matches": [{
                    "_id": 16929,
                    "source": "ExploitDB",
                    "type": "remote",
                    "author": "metasploit",
                    "cve": ["CVE-2014-0160"],
                    "bid": [66690],
                    "port": 443
                }],
                "total": 1
            }"#,
        )
        .unwrap();

        let exploit = &results.matches[0];
        assert_eq!(exploit.kind.as_deref(), Some("remote"));
        assert!(exploit.references_cve("cve-2014-0160"));
        assert_eq!(exploit.id, serde_json::json!(16929));
        assert!(results.facets.is_empty());
    }

    #[test]
    fn test_count_response_has_no_matches() {
        let results: ExploitResults = serde_json::from_str(
            r#"{"total": 42, "facets": {"type": [{"value": "dos", "count": 40}]}}"#,
        )
        .unwrap();
        assert!(results.matches.is_empty());
        assert_eq!(results.facets["type"][0].count, 40);
    }
}
