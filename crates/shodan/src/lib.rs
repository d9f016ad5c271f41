//! Async Rust client for the Shodan.io REST, Exploits and Streaming APIs.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use shodan::ShodanClient;
//!
//! #[tokio::main]
//! async fn main() -> shodan::Result<()> {
//!     let client = ShodanClient::new("your-api-key")?;
//!
//!     // Get host information
//!     let host = client.search().host("8.8.8.8").await?;
//!     println!("Organization: {:?}", host.org);
//!     println!("Open ports: {:?}", host.ports);
//!
//!     // Search with query
//!     let results = client.search()
//!         .query("apache country:US")
//!         .facets(["port", "org"])
//!         .send()
//!         .await?;
//!
//!     println!("Total: {} results", results.total);
//!
//!     // Follow the firehose; the channel closes when the feed ends
//!     let mut feed = client.stream().banners().await?;
//!     while let Some(line) = feed.recv().await {
//!         print!("{}", String::from_utf8_lossy(&line));
//!     }
//!     feed.finish().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/shodan/2.0.0")]

// Re-export core types
pub use shodan_core::*;

// Re-export client
pub use shodan_client::{
    api, ClientConfig, Endpoints, Json, Raw, ResponseDestination, ShodanClient,
    ShodanClientBuilder, Subscription,
};

// Re-export runtime for convenience
pub use bytes;
pub use serde;
pub use serde_json;
pub use tokio;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let client = ShodanClient::builder("k")
            .base_url("http://127.0.0.1:1")
            .build()
            .unwrap();

        let err = tokio_test::block_on(client.account().api_info()).unwrap_err();
        assert!(matches!(err, ShodanError::Transport(_)));
        assert!(err.is_retryable());
        assert!(!err.to_string().contains("key=k"));
    }
}
