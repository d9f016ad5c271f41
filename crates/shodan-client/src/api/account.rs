//! Account API endpoints.

use crate::ShodanClient;
use shodan_core::{AccountProfile, ApiInfo, Result};

/// Account API endpoints
pub struct AccountApi<'a> {
    client: &'a ShodanClient,
}

impl<'a> AccountApi<'a> {
    pub(crate) const fn new(client: &'a ShodanClient) -> Self {
        Self { client }
    }

    pub async fn profile(&self) -> Result<AccountProfile> {
        self.client.get("/account/profile").await
    }

    /// Plan details and remaining credits for the configured key
    pub async fn api_info(&self) -> Result<ApiInfo> {
        self.client.get("/api-info").await
    }
}
