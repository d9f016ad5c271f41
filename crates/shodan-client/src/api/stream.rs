//! Streaming API endpoints.
//!
//! Every method sends the request, waits for the server to accept it and
//! returns a [`Subscription`]. Errors after that point are not returned; the
//! subscription's channel closes instead.

use super::path_segment;
use crate::stream::Subscription;
use crate::ShodanClient;
use shodan_core::{Result, ShodanError};
use std::fmt::Display;

/// Streaming API endpoints (served from the stream base URL)
pub struct StreamApi<'a> {
    client: &'a ShodanClient,
}

impl<'a> StreamApi<'a> {
    pub(crate) const fn new(client: &'a ShodanClient) -> Self {
        Self { client }
    }

    /// Every banner Shodan collects, as it is collected
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut feed = client.stream().banners().await?;
    /// while let Some(line) = feed.recv().await {
    ///     handle(&line);
    /// }
    /// // channel closed: the feed ended or the connection broke
    /// ```
    pub async fn banners(&self) -> Result<Subscription> {
        self.client.subscribe("/shodan/banners").await
    }

    /// Banners from devices in the given autonomous systems (e.g. `"3303"`)
    pub async fn asn<S: Display>(&self, asns: &[S]) -> Result<Subscription> {
        self.filtered("/shodan/asn", "ASN", asns).await
    }

    /// Banners from devices in the given countries (two-letter codes)
    pub async fn countries<S: Display>(&self, countries: &[S]) -> Result<Subscription> {
        self.filtered("/shodan/countries", "country", countries)
            .await
    }

    /// Banners for services on the given ports
    pub async fn ports(&self, ports: &[u16]) -> Result<Subscription> {
        self.filtered("/shodan/ports", "port", ports).await
    }

    /// Banners carrying the given tags
    pub async fn tags<S: Display>(&self, tags: &[S]) -> Result<Subscription> {
        self.filtered("/shodan/tags", "tag", tags).await
    }

    /// Banners affected by the given vulnerabilities (CVE ids)
    pub async fn vulns<S: Display>(&self, vulns: &[S]) -> Result<Subscription> {
        self.filtered("/shodan/vulns", "vulnerability", vulns).await
    }

    /// Banners for all networks monitored by the account's alerts
    pub async fn alerts(&self) -> Result<Subscription> {
        self.client.subscribe("/shodan/alert").await
    }

    /// Banners for the networks of one alert
    pub async fn alert(&self, alert_id: &str) -> Result<Subscription> {
        let alert_id = path_segment("alert id", alert_id)?;
        self.client
            .subscribe(&format!("/shodan/alert/{alert_id}"))
            .await
    }

    async fn filtered<S: Display>(
        &self,
        prefix: &str,
        what: &str,
        values: &[S],
    ) -> Result<Subscription> {
        if values.is_empty() {
            return Err(ShodanError::InvalidQuery(format!(
                "at least one {what} is required"
            )));
        }
        let joined = values
            .iter()
            .map(|value| path_segment(what, &value.to_string()).map(str::to_owned))
            .collect::<Result<Vec<_>>>()?
            .join(",");
        self.client.subscribe(&format!("{prefix}/{joined}")).await
    }
}
