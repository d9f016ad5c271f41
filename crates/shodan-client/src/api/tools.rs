//! Utility API endpoints.

use crate::ShodanClient;
use shodan_core::{HttpHeaders, MyIpResponse, Result};

/// Utility API endpoints
pub struct ToolsApi<'a> {
    client: &'a ShodanClient,
}

impl<'a> ToolsApi<'a> {
    pub(crate) const fn new(client: &'a ShodanClient) -> Self {
        Self { client }
    }

    /// Headers the API received from this client
    pub async fn http_headers(&self) -> Result<HttpHeaders> {
        self.client.get("/tools/httpheaders").await
    }

    /// Public IP address the API sees this client coming from
    pub async fn my_ip(&self) -> Result<MyIpResponse> {
        self.client.get("/tools/myip").await
    }
}
