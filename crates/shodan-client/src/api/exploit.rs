//! Exploits API endpoints.

use super::{is_first_page, join_facets};
use crate::ShodanClient;
use serde::Serialize;
use shodan_core::{ExploitResults, Result};

#[derive(Serialize)]
struct ExploitParams<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    facets: Option<String>,
    #[serde(skip_serializing_if = "is_first_page")]
    page: u32,
}

/// Exploits API endpoints (served from the exploits base URL)
pub struct ExploitApi<'a> {
    client: &'a ShodanClient,
}

impl<'a> ExploitApi<'a> {
    pub(crate) const fn new(client: &'a ShodanClient) -> Self {
        Self { client }
    }

    /// Search exploits and advisories
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let found = client.exploits().search("cve:CVE-2014-0160").send().await?;
    /// for exploit in &found.matches {
    ///     println!("{:?} {:?}", exploit.source, exploit.description);
    /// }
    /// ```
    #[must_use]
    pub fn search(&self, query: impl Into<String>) -> ExploitRequestBuilder<'a> {
        ExploitRequestBuilder::new(self.client, query.into(), "/search")
    }

    /// Count matching exploits, with optional facets, without returning them
    #[must_use]
    pub fn count(&self, query: impl Into<String>) -> ExploitRequestBuilder<'a> {
        ExploitRequestBuilder::new(self.client, query.into(), "/count")
    }
}

/// Builder shared by exploit search and count
pub struct ExploitRequestBuilder<'a> {
    client: &'a ShodanClient,
    path: &'static str,
    query: String,
    facets: Vec<String>,
    page: u32,
}

impl<'a> ExploitRequestBuilder<'a> {
    const fn new(client: &'a ShodanClient, query: String, path: &'static str) -> Self {
        Self {
            client,
            path,
            query,
            facets: Vec::new(),
            page: 1,
        }
    }

    /// Add a facet (e.g. `"type"`, `"platform"`, `"source"`)
    #[must_use]
    pub fn facet(mut self, facet: impl Into<String>) -> Self {
        self.facets.push(facet.into());
        self
    }

    /// Add multiple facets
    #[must_use]
    pub fn facets<I, S>(mut self, facets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets.extend(facets.into_iter().map(Into::into));
        self
    }

    /// Set the page number (1-indexed). Ignored by `count`.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Execute the request
    pub async fn send(self) -> Result<ExploitResults> {
        let params = ExploitParams {
            query: &self.query,
            facets: join_facets(&self.facets),
            page: if self.path == "/count" { 1 } else { self.page },
        };
        self.client.get_exploits(self.path, &params).await
    }
}
