//! Host lookup and search endpoints.

use super::{is_false, is_first_page, join_facets};
use crate::ShodanClient;
use serde::Serialize;
use shodan_core::{HostCount, HostInfo, QueryTokens, Result, SearchResults, ShodanError};
use std::net::IpAddr;
use tokio::io::AsyncWrite;

#[derive(Serialize)]
struct HostParams {
    #[serde(skip_serializing_if = "is_false")]
    history: bool,
    #[serde(skip_serializing_if = "is_false")]
    minify: bool,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    facets: Option<String>,
    #[serde(skip_serializing_if = "is_first_page")]
    page: u32,
    #[serde(skip_serializing_if = "is_false")]
    minify: bool,
}

#[derive(Serialize)]
struct QueryParams<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    facets: Option<String>,
}

/// Host lookup and search endpoints
pub struct SearchApi<'a> {
    client: &'a ShodanClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) const fn new(client: &'a ShodanClient) -> Self {
        Self { client }
    }

    /// Get all information about a host
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let host = client.search().host("8.8.8.8").await?;
    /// println!("Ports: {:?}", host.ports);
    /// ```
    pub async fn host(&self, ip: &str) -> Result<HostInfo> {
        self.host_with_options(ip).send().await
    }

    /// Get host information with options
    #[must_use]
    pub fn host_with_options(&self, ip: impl Into<String>) -> HostRequestBuilder<'a> {
        HostRequestBuilder::new(self.client, ip.into())
    }

    /// Search Shodan with a query string
    #[must_use]
    pub fn query(&self, query: impl Into<String>) -> SearchRequestBuilder<'a> {
        SearchRequestBuilder::new(self.client, query.into())
    }

    /// Get count of results without consuming query credits
    #[must_use]
    pub fn count(&self, query: impl Into<String>) -> CountRequestBuilder<'a> {
        CountRequestBuilder::new(self.client, query.into())
    }

    /// List all available search facets
    pub async fn facets(&self) -> Result<Vec<String>> {
        self.client.get("/shodan/host/search/facets").await
    }

    /// List all available search filters
    pub async fn filters(&self) -> Result<Vec<String>> {
        self.client.get("/shodan/host/search/filters").await
    }

    /// Break a search query into its filters and free text
    pub async fn tokens(&self, query: &str) -> Result<QueryTokens> {
        self.client
            .get_with_query(
                "/shodan/host/search/tokens",
                &QueryParams {
                    query,
                    facets: None,
                },
            )
            .await
    }
}

/// Builder for host requests with options
pub struct HostRequestBuilder<'a> {
    client: &'a ShodanClient,
    ip: String,
    params: HostParams,
}

impl<'a> HostRequestBuilder<'a> {
    const fn new(client: &'a ShodanClient, ip: String) -> Self {
        Self {
            client,
            ip,
            params: HostParams {
                history: false,
                minify: false,
            },
        }
    }

    /// Include historical banners
    #[must_use]
    pub fn history(mut self, include: bool) -> Self {
        self.params.history = include;
        self
    }

    /// Return only basic host information
    #[must_use]
    pub fn minify(mut self, minify: bool) -> Self {
        self.params.minify = minify;
        self
    }

    /// Execute the request
    pub async fn send(self) -> Result<HostInfo> {
        let path = self.path()?;
        self.client.get_with_query(&path, &self.params).await
    }

    /// Save the host record exactly as the API returns it.
    ///
    /// Returns the number of bytes written.
    pub async fn write_to<W>(self, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let path = self.path()?;
        self.client.download(&path, &self.params, sink).await
    }

    fn path(&self) -> Result<String> {
        let ip: IpAddr = self
            .ip
            .trim()
            .parse()
            .map_err(|_| ShodanError::InvalidQuery(format!("not an IP address: {}", self.ip)))?;
        Ok(format!("/shodan/host/{ip}"))
    }
}

/// Builder for search requests
pub struct SearchRequestBuilder<'a> {
    client: &'a ShodanClient,
    query: String,
    facets: Vec<String>,
    page: u32,
    minify: bool,
}

impl<'a> SearchRequestBuilder<'a> {
    const fn new(client: &'a ShodanClient, query: String) -> Self {
        Self {
            client,
            query,
            facets: Vec::new(),
            page: 1,
            minify: false,
        }
    }

    /// Add a facet to aggregate results (e.g. `"country"` or `"port:20"`)
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

    /// Set the page number (1-indexed)
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Return minimal results
    #[must_use]
    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Execute the search
    pub async fn send(self) -> Result<SearchResults> {
        self.client
            .get_with_query("/shodan/host/search", &self.params())
            .await
    }

    /// Save the result page exactly as the API returns it.
    pub async fn write_to<W>(self, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        self.client
            .download("/shodan/host/search", &self.params(), sink)
            .await
    }

    fn params(&self) -> SearchParams<'_> {
        SearchParams {
            query: &self.query,
            facets: join_facets(&self.facets),
            page: self.page,
            minify: self.minify,
        }
    }
}

/// Builder for count requests
pub struct CountRequestBuilder<'a> {
    client: &'a ShodanClient,
    query: String,
    facets: Vec<String>,
}

impl<'a> CountRequestBuilder<'a> {
    const fn new(client: &'a ShodanClient, query: String) -> Self {
        Self {
            client,
            query,
            facets: Vec::new(),
        }
    }

    /// Add a facet to aggregate results
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

    /// Execute the count request
    pub async fn send(self) -> Result<HostCount> {
        let params = QueryParams {
            query: &self.query,
            facets: join_facets(&self.facets),
        };
        self.client
            .get_with_query("/shodan/host/count", &params)
            .await
    }
}
