//! On-demand scanning API endpoints.

use super::path_segment;
use crate::ShodanClient;
use serde::Serialize;
use shodan_core::{Result, ScanResponse, ScanStatus, ShodanError};
use std::collections::HashMap;

#[derive(Serialize)]
struct ScanForm {
    ips: String,
}

/// On-demand scanning API endpoints
pub struct ScanApi<'a> {
    client: &'a ShodanClient,
}

impl<'a> ScanApi<'a> {
    pub(crate) const fn new(client: &'a ShodanClient) -> Self {
        Self { client }
    }

    /// List all ports that Shodan crawlers look at
    pub async fn ports(&self) -> Result<Vec<u16>> {
        self.client.get("/shodan/ports").await
    }

    /// Protocol names usable in scans, with their descriptions
    pub async fn protocols(&self) -> Result<HashMap<String, String>> {
        self.client.get("/shodan/protocols").await
    }

    /// Ask Shodan to crawl the given IPs or networks.
    ///
    /// Note: Requires scan credits
    pub async fn request<S: AsRef<str>>(&self, targets: &[S]) -> Result<ScanResponse> {
        if targets.is_empty() {
            return Err(ShodanError::InvalidQuery(
                "At least one IP address is required".to_string(),
            ));
        }

        let form = ScanForm {
            ips: targets
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(","),
        };
        self.client.post_form("/shodan/scan", &form).await
    }

    /// Get the status of a submitted scan
    pub async fn status(&self, scan_id: &str) -> Result<ScanStatus> {
        let scan_id = path_segment("scan id", scan_id)?;
        self.client
            .get(&format!("/shodan/scan/{scan_id}"))
            .await
    }
}
