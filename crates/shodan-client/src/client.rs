//! Main Shodan API client implementation.

use crate::api::*;
use crate::config::{ClientConfig, Endpoints, DEFAULT_CONNECT_TIMEOUT, DEFAULT_STREAM_CAPACITY};
use crate::decode::{error_message, Json, Raw, ResponseDestination};
use crate::query::{build_url, encode_form};
use crate::stream::Subscription;
use futures_util::TryStreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shodan_core::{Result, ShodanError};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWrite;
use tracing::{debug, warn};
use url::Url;

/// Main Shodan API client
///
/// Cloning is cheap and clones share the same connection pool.
#[derive(Clone)]
pub struct ShodanClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    api_key: String,
    endpoints: Endpoints,
    stream_capacity: usize,
}

impl std::fmt::Debug for ShodanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShodanClient")
            .field("endpoints", &self.inner.endpoints)
            .field("stream_capacity", &self.inner.stream_capacity)
            .finish_non_exhaustive()
    }
}

impl ShodanClient {
    /// Create a new client with the given API key and a default pooled transport
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ShodanClientBuilder::new(api_key).build()
    }

    /// Create a client on top of an existing HTTP client.
    ///
    /// The transport is shared, not owned: the same `reqwest::Client` can back
    /// any number of Shodan clients.
    #[must_use]
    pub fn with_http_client(http: HttpClient, api_key: impl Into<String>) -> Self {
        Self::from_parts(
            http,
            api_key.into(),
            Endpoints::default(),
            DEFAULT_STREAM_CAPACITY,
        )
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> ShodanClientBuilder {
        ShodanClientBuilder::new(api_key)
    }

    /// A client identical to this one but authenticating with another key.
    #[must_use]
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self::from_parts(
            self.inner.http.clone(),
            api_key.into(),
            self.inner.endpoints.clone(),
            self.inner.stream_capacity,
        )
    }

    fn from_parts(
        http: HttpClient,
        api_key: String,
        endpoints: Endpoints,
        stream_capacity: usize,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                api_key,
                endpoints,
                stream_capacity: stream_capacity.max(1),
            }),
        }
    }

    /// Base URLs this client talks to
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    /// Access host lookup and search endpoints
    #[must_use]
    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    /// Access the Exploits API
    #[must_use]
    pub fn exploits(&self) -> ExploitApi<'_> {
        ExploitApi::new(self)
    }

    /// Access the Streaming API
    #[must_use]
    pub fn stream(&self) -> StreamApi<'_> {
        StreamApi::new(self)
    }

    /// Access on-demand scanning endpoints
    #[must_use]
    pub fn scan(&self) -> ScanApi<'_> {
        ScanApi::new(self)
    }

    /// Access account endpoints
    #[must_use]
    pub fn account(&self) -> AccountApi<'_> {
        AccountApi::new(self)
    }

    /// Access utility endpoints
    #[must_use]
    pub fn tools(&self) -> ToolsApi<'_> {
        ToolsApi::new(self)
    }

    /// Copy the raw body of a core API endpoint into `sink`, without any JSON
    /// parsing. Returns the number of bytes written.
    pub async fn download<P, W>(&self, path: &str, params: &P, sink: &mut W) -> Result<u64>
    where
        P: Serialize + ?Sized,
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        self.fetch(path, params, Raw(sink)).await
    }

    /// GET a core API endpoint and hand the 200 response to `destination`.
    ///
    /// Covers endpoints without a typed wrapper:
    ///
    /// ```rust,ignore
    /// use shodan_client::Json;
    ///
    /// let ports: serde_json::Value = client.fetch("/shodan/ports", &(), Json::new()).await?;
    /// ```
    pub async fn fetch<P, D>(&self, path: &str, params: &P, destination: D) -> Result<D::Output>
    where
        P: Serialize + ?Sized,
        D: ResponseDestination,
    {
        let url = self.api_url(path, params)?;
        self.execute(Method::GET, url, None, destination).await
    }

    /// Perform a GET request on the core API
    pub(crate) async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &()).await
    }

    /// Perform a GET request on the core API with query parameters
    pub(crate) async fn get_with_query<T, P>(&self, path: &str, params: &P) -> Result<T>
    where
        T: DeserializeOwned + Send,
        P: Serialize + ?Sized,
    {
        let url = self.api_url(path, params)?;
        self.execute(Method::GET, url, None, Json::<T>::new()).await
    }

    /// Perform a POST request on the core API with a form-encoded body
    pub(crate) async fn post_form<T, P>(&self, path: &str, form: &P) -> Result<T>
    where
        T: DeserializeOwned + Send,
        P: Serialize + ?Sized,
    {
        let url = self.api_url(path, &())?;
        let body = encode_form(form)?;
        self.execute(Method::POST, url, Some(body), Json::<T>::new()).await
    }

    /// Perform a GET request on the Exploits API
    pub(crate) async fn get_exploits<T, P>(&self, path: &str, params: &P) -> Result<T>
    where
        T: DeserializeOwned + Send,
        P: Serialize + ?Sized,
    {
        let url = build_url(
            &self.inner.endpoints.exploits,
            path,
            params,
            &self.inner.api_key,
        )?;
        self.execute(Method::GET, url, None, Json::<T>::new()).await
    }

    /// Open a line-delimited feed on the Streaming API.
    ///
    /// Only the initial handshake can fail here. Once this returns, the feed
    /// ending or breaking is signalled by the subscription's channel closing.
    pub(crate) async fn subscribe(&self, path: &str) -> Result<Subscription> {
        let url = build_url(&self.inner.endpoints.stream, path, &(), &self.inner.api_key)?;
        let response = self.send(Method::GET, url, None).await?;
        debug!(path, capacity = self.inner.stream_capacity, "stream opened");

        let body = response.bytes_stream().map_err(describe);
        Ok(Subscription::spawn(body, self.inner.stream_capacity))
    }

    pub(crate) fn api_url<P>(&self, path: &str, params: &P) -> Result<Url>
    where
        P: Serialize + ?Sized,
    {
        build_url(&self.inner.endpoints.api, path, params, &self.inner.api_key)
    }

    /// Send one request and hand a 200 response to `destination`.
    pub(crate) async fn execute<D>(
        &self,
        method: Method,
        url: Url,
        form: Option<String>,
        destination: D,
    ) -> Result<D::Output>
    where
        D: ResponseDestination,
    {
        let response = self.send(method, url, form).await?;
        destination.receive(response).await
    }

    /// Send one request; anything but a 200 becomes an error.
    async fn send(
        &self,
        method: Method,
        url: Url,
        form: Option<String>,
    ) -> Result<reqwest::Response> {
        debug!(method = %method, path = url.path(), "sending request");

        let mut request = self.inner.http.request(method, url);
        if let Some(body) = form {
            request = request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ShodanError::Transport(describe(e)))?;

        if response.status() == StatusCode::OK {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }
}

/// Convert a non-200 response to a [`ShodanError`]
async fn error_from_response(response: reqwest::Response) -> ShodanError {
    let code = response.status().as_u16();

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return ShodanError::BodyRead(describe(e)),
    };

    let message = error_message(&body);
    if code == StatusCode::TOO_MANY_REQUESTS.as_u16() {
        warn!(%message, "Rate limited by Shodan API");
    } else {
        debug!(code, %message, "Shodan API returned an error");
    }

    ShodanError::Api { code, message }
}

/// Render a reqwest error with its causes. The URL is stripped because it
/// carries the API key.
pub(crate) fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Builder for configuring a [`ShodanClient`]
pub struct ShodanClientBuilder {
    api_key: String,
    endpoints: Endpoints,
    timeout: Option<Duration>,
    connect_timeout: Duration,
    user_agent: String,
    http: Option<HttpClient>,
    stream_capacity: usize,
}

impl ShodanClientBuilder {
    /// Create a new builder with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoints: Endpoints::default(),
            timeout: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("shodan-rust/{}", env!("CARGO_PKG_VERSION")),
            http: None,
            stream_capacity: DEFAULT_STREAM_CAPACITY,
        }
    }

    /// Start from serializable settings
    #[must_use]
    pub fn from_config(api_key: impl Into<String>, config: &ClientConfig) -> Self {
        let mut builder = Self::new(api_key)
            .endpoints(config.endpoints.clone())
            .connect_timeout(config.connect_timeout())
            .stream_capacity(config.stream_capacity);
        builder.timeout = config.timeout();
        if let Some(agent) = &config.user_agent {
            builder.user_agent.clone_from(agent);
        }
        builder
    }

    /// Set the core API base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.api = url.into();
        self
    }

    /// Set the Exploits API base URL
    #[must_use]
    pub fn exploit_base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.exploits = url.into();
        self
    }

    /// Set the Streaming API base URL
    #[must_use]
    pub fn stream_base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.stream = url.into();
        self
    }

    /// Replace all three base URLs
    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set a total timeout on every request made by the built transport.
    ///
    /// This also bounds how long a stream can stay open, which is why no
    /// timeout is set by default.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout of the built transport
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Use an existing HTTP client. Timeouts and User-Agent set on this
    /// builder are then ignored; the transport's own settings apply.
    #[must_use]
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Number of chunks a subscription buffers before its reader waits
    /// for the consumer (minimum 1)
    #[must_use]
    pub fn stream_capacity(mut self, capacity: usize) -> Self {
        self.stream_capacity = capacity;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ShodanClient> {
        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = HttpClient::builder()
                    .connect_timeout(self.connect_timeout)
                    .user_agent(&self.user_agent)
                    .gzip(true);
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder
                    .build()
                    .map_err(|e| ShodanError::Config(describe(e)))?
            }
        };

        let endpoints = Endpoints {
            api: trim_base(self.endpoints.api),
            exploits: trim_base(self.endpoints.exploits),
            stream: trim_base(self.endpoints.stream),
        };

        Ok(ShodanClient::from_parts(
            http,
            self.api_key,
            endpoints,
            self.stream_capacity,
        ))
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
