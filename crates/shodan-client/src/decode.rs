//! Response body decoding.
//!
//! A [`ResponseDestination`] decides what happens to the body of a successful
//! response: [`Json`] decodes it into a typed value, [`Raw`] copies it
//! verbatim into an async writer without buffering the whole body.

use async_trait::async_trait;
use bytes::Bytes;
use crate::client::describe;
use futures_util::{Stream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shodan_core::{Result, ShodanError};
use std::marker::PhantomData;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Where the body of a 200 response goes
#[async_trait]
pub trait ResponseDestination: Send {
    /// What the destination yields once the body is consumed
    type Output: Send;

    /// Consume the response body
    async fn receive(self, response: reqwest::Response) -> Result<Self::Output>;
}

/// Decode the body as JSON into `T`
pub struct Json<T>(PhantomData<fn() -> T>);

impl<T> Json<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Json<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> ResponseDestination for Json<T>
where
    T: DeserializeOwned + Send,
{
    type Output = T;

    async fn receive(self, response: reqwest::Response) -> Result<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| ShodanError::BodyRead(describe(e)))?;
        decode_json(&body)
    }
}

/// Copy the body byte-for-byte into a writer; yields the number of bytes copied
pub struct Raw<'a, W: ?Sized>(pub &'a mut W);

#[async_trait]
impl<'a, W> ResponseDestination for Raw<'a, W>
where
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    type Output = u64;

    async fn receive(self, response: reqwest::Response) -> Result<u64> {
        copy_body(response.bytes_stream().map_err(describe), self.0).await
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Stream every chunk of `body` into `sink`, then flush it.
pub(crate) async fn copy_body<S, E, W>(body: S, sink: &mut W) -> Result<u64>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: std::fmt::Display,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut body = std::pin::pin!(body);
    let mut written = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| ShodanError::BodyRead(e.to_string()))?;
        sink.write_all(&chunk)
            .await
            .map_err(|e| ShodanError::Decode(format!("writing to sink failed: {e}")))?;
        written += chunk.len() as u64;
    }

    sink.flush()
        .await
        .map_err(|e| ShodanError::Decode(format!("flushing sink failed: {e}")))?;

    Ok(written)
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Extract the message from the body of a failed response.
///
/// A JSON object yields its `error` field; a missing or null field, or a bare
/// `null` body, yields an empty message. Anything else is returned as
/// whitespace-trimmed text.
pub(crate) fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<Option<ErrorBody>>(body) {
        Ok(parsed) => parsed.and_then(|b| b.error).unwrap_or_default(),
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::io;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Foo {
        foo: String,
    }

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = io::Result<Bytes>> {
        stream::iter(
            parts
                .iter()
                .copied()
                .map(|p| Ok(Bytes::from(p)))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_decode_json() {
        let foo: Foo = decode_json(br#"{"foo":"bar"}"#).unwrap();
        assert_eq!(foo, Foo { foo: "bar".into() });
    }

    #[test]
    fn test_decode_json_mismatch() {
        let err = decode_json::<Foo>(br#"{"bar":1}"#).unwrap_err();
        assert!(matches!(err, ShodanError::Decode(_)));

        let err = decode_json::<Foo>(b"<html>").unwrap_err();
        assert!(matches!(err, ShodanError::Decode(_)));
    }

    #[test]
    fn test_error_message_from_json() {
        assert_eq!(error_message(br#"{"error":"invalid key"}"#), "invalid key");
        assert_eq!(error_message(br#"{"detail":"x"}"#), "");
        assert_eq!(error_message(br#"{"error":null}"#), "");
        assert_eq!(error_message(b"null"), "");
        assert_eq!(error_message(b" null\n"), "");
    }

    #[test]
    fn test_error_message_from_text() {
        assert_eq!(error_message(b"internal failure\n"), "internal failure");
        assert_eq!(error_message(b"  \"quoted\"  "), "\"quoted\"");
        assert_eq!(error_message(b""), "");
    }

    #[tokio::test]
    async fn test_copy_is_verbatim() {
        let mut sink = Vec::new();
        let written = copy_body(chunks(&["not ", "json{", "\x00\n"]), &mut sink)
            .await
            .unwrap();
        assert_eq!(sink, b"not json{\x00\n");
        assert_eq!(written, 11);
    }

    #[tokio::test]
    async fn test_copy_writes_each_chunk_in_order() {
        let mut sink = tokio_test::io::Builder::new()
            .write(b"first,")
            .write(b"second")
            .build();
        let written = copy_body(chunks(&["first,", "second"]), &mut sink)
            .await
            .unwrap();
        assert_eq!(written, 12);
    }

    #[tokio::test]
    async fn test_sink_failure_is_decode_error() {
        let mut sink = tokio_test::io::Builder::new()
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            .build();
        let err = copy_body(chunks(&["data"]), &mut sink).await.unwrap_err();
        assert!(matches!(err, ShodanError::Decode(_)));
    }

    #[tokio::test]
    async fn test_read_failure_is_body_read_error() {
        let body = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let mut sink = Vec::new();
        let err = copy_body(body, &mut sink).await.unwrap_err();
        assert!(matches!(err, ShodanError::BodyRead(_)));
        assert_eq!(sink, b"partial");
    }
}
