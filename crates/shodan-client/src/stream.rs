//! Line-delimited streaming subscriptions.
//!
//! A [`Subscription`] owns the receiving half of a bounded channel fed by one
//! background task. The task reads the response body, cuts it into
//! newline-terminated chunks and sends them in wire order. When the
//! connection ends or a read fails, the task drops the body first and the
//! sender second, so the channel closes exactly once and nothing is
//! delivered after that.
//!
//! Read failures are never returned from the call that opened the stream.
//! They show up as the channel closing; [`Subscription::finish`] additionally
//! reports whether the stream ended cleanly.

use crate::decode::decode_json;
use bytes::{Bytes, BytesMut};
use futures_util::{future, Stream, StreamExt};
use serde::de::DeserializeOwned;
use shodan_core::{Result, ShodanError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

/// An open streaming request and its delivery task.
///
/// Chunks include their trailing `\n`. Dropping the subscription (or the
/// receiver obtained from [`into_parts`](Self::into_parts)) makes the reader
/// close the connection and exit.
#[derive(Debug)]
pub struct Subscription {
    chunks: mpsc::Receiver<Bytes>,
    reader: JoinHandle<Result<()>>,
}

impl Subscription {
    /// Start the reader task for `body`. `capacity` is clamped to at least one.
    pub(crate) fn spawn<S, E>(body: S, capacity: usize) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let reader = tokio::spawn(pump(body, tx));
        Self { chunks: rx, reader }
    }

    /// Wait for the next chunk; `None` once the stream has ended for any reason.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.chunks.recv().await
    }

    /// Raw chunks as a [`Stream`]. The reader keeps running detached.
    pub fn into_stream(self) -> ReceiverStream<Bytes> {
        ReceiverStream::new(self.chunks)
    }

    /// Decode every non-blank chunk as one JSON record.
    ///
    /// A line that fails to decode yields an `Err` item and the stream goes on.
    ///
    /// ```rust,ignore
    /// use futures_util::StreamExt;
    /// use shodan_core::Banner;
    ///
    /// let mut banners = client.stream().banners().await?.records::<Banner>();
    /// while let Some(banner) = banners.next().await {
    ///     let banner = banner?;
    ///     println!("{}:{}", banner.ip_str, banner.port);
    /// }
    /// ```
    pub fn records<T>(self) -> impl Stream<Item = Result<T>>
    where
        T: DeserializeOwned,
    {
        self.into_stream().filter_map(|chunk| {
            future::ready(if chunk.iter().all(u8::is_ascii_whitespace) {
                None
            } else {
                Some(decode_json(&chunk))
            })
        })
    }

    /// The channel and the reader task, for callers that want both
    pub fn into_parts(self) -> (mpsc::Receiver<Bytes>, JoinHandle<Result<()>>) {
        (self.chunks, self.reader)
    }

    /// Stop listening and wait for the reader to exit.
    ///
    /// Returns `Ok(())` if the feed ended normally (or was abandoned here),
    /// and the read error otherwise.
    pub async fn finish(self) -> Result<()> {
        drop(self.chunks);
        self.reader
            .await
            .map_err(|e| ShodanError::Internal(format!("stream reader task failed: {e}")))?
    }
}

/// Read `body` to the end, sending one chunk per line.
async fn pump<S, E>(body: S, tx: mpsc::Sender<Bytes>) -> Result<()>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut body = Box::pin(body);
    let mut lines = LineSplitter::default();
    let mut delivered: u64 = 0;

    let outcome = 'read: loop {
        let next = tokio::select! {
            next = body.next() => next,
            () = tx.closed() => break 'read Ok(()),
        };

        match next {
            Some(Ok(chunk)) => {
                lines.push(&chunk);
                while let Some(line) = lines.next_line() {
                    if tx.send(line).await.is_err() {
                        break 'read Ok(());
                    }
                    delivered += 1;
                }
            }
            Some(Err(e)) => break Err(ShodanError::Transport(format!("stream read failed: {e}"))),
            None => break Ok(()),
        }
    };

    if lines.pending() > 0 {
        debug!(bytes = lines.pending(), "discarding unterminated trailing line");
    }

    // Connection first, then the channel.
    drop(body);
    drop(tx);

    match &outcome {
        Ok(()) => debug!(delivered, "stream closed"),
        Err(e) => debug!(delivered, error = %e, "stream closed after read error"),
    }
    outcome
}

/// Reassembles newline-terminated lines from arbitrarily split chunks.
#[derive(Debug, Default)]
struct LineSplitter {
    buf: BytesMut,
    /// Prefix of `buf` already known to hold no newline
    scanned: usize,
}

impl LineSplitter {
    fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    fn next_line(&mut self) -> Option<Bytes> {
        match self.buf[self.scanned..].iter().position(|&b| b == b'\n') {
            Some(offset) => {
                let end = self.scanned + offset + 1;
                self.scanned = 0;
                Some(self.buf.split_to(end).freeze())
            }
            None => {
                self.scanned = self.buf.len();
                None
            }
        }
    }

    fn pending(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn body(parts: &[&'static str]) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
        stream::iter(
            parts
                .iter()
                .copied()
                .map(|p| Ok(Bytes::from(p)))
                .collect::<Vec<_>>(),
        )
    }

    async fn drain(sub: &mut Subscription) -> Vec<Bytes> {
        let mut out = Vec::new();
        while let Some(chunk) = sub.recv().await {
            out.push(chunk);
        }
        out
    }

    #[test]
    fn test_splitter_reassembles_across_chunks() {
        let mut lines = LineSplitter::default();
        lines.push(b"he");
        assert_eq!(lines.next_line(), None);
        lines.push(b"llo\nwor");
        assert_eq!(lines.next_line(), Some(Bytes::from_static(b"hello\n")));
        assert_eq!(lines.next_line(), None);
        lines.push(b"ld\n\n");
        assert_eq!(lines.next_line(), Some(Bytes::from_static(b"world\n")));
        assert_eq!(lines.next_line(), Some(Bytes::from_static(b"\n")));
        assert_eq!(lines.next_line(), None);
        assert_eq!(lines.pending(), 0);
    }

    #[tokio::test]
    async fn test_chunks_arrive_in_order_then_close() {
        let mut sub = Subscription::spawn(body(&["a\n", "b\n"]), 1);

        let got = drain(&mut sub).await;

        assert_eq!(got, vec![Bytes::from_static(b"a\n"), Bytes::from_static(b"b\n")]);
        assert!(sub.finish().await.is_ok());
    }

    #[tokio::test]
    async fn test_lines_split_out_of_one_read() {
        let mut sub = Subscription::spawn(body(&["x\ny\nz\n"]), 4);
        let got = drain(&mut sub).await;
        assert_eq!(got.len(), 3);
        assert_eq!(got[2], Bytes::from_static(b"z\n"));
    }

    #[tokio::test]
    async fn test_unterminated_tail_is_dropped() {
        let mut sub = Subscription::spawn(body(&["a\n", "partial"]), 1);
        assert_eq!(drain(&mut sub).await, vec![Bytes::from_static(b"a\n")]);
    }

    #[tokio::test]
    async fn test_read_error_closes_channel() {
        let failing = stream::iter(vec![
            Ok(Bytes::from_static(b"a\n")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")),
            Ok(Bytes::from_static(b"never\n")),
        ]);
        let mut sub = Subscription::spawn(failing, 1);

        assert_eq!(drain(&mut sub).await, vec![Bytes::from_static(b"a\n")]);

        let err = sub.finish().await.unwrap_err();
        assert!(matches!(err, ShodanError::Transport(_)));
        assert!(err.to_string().contains("reset by peer"));
    }

    #[tokio::test]
    async fn test_slow_consumer_gets_backpressure_not_loss() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);
        let lines: Vec<String> = (0..5).map(|i| format!("line-{i}\n")).collect();
        let source = stream::iter(lines.clone())
            .inspect(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .map(|line| Ok::<_, io::Error>(Bytes::from(line)));

        let mut sub = Subscription::spawn(source, 1);

        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        // One chunk in the channel slot, one held by the blocked sender.
        assert!(pulled.load(Ordering::SeqCst) <= 2);

        let got = drain(&mut sub).await;
        let expected: Vec<Bytes> = lines.into_iter().map(Bytes::from).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_dropping_receiver_stops_idle_reader() {
        let live = body(&["a\n"]).chain(stream::pending());
        let mut sub = Subscription::spawn(live, 1);

        assert_eq!(sub.recv().await, Some(Bytes::from_static(b"a\n")));
        assert!(sub.finish().await.is_ok());
    }

    #[tokio::test]
    async fn test_records_decode_and_skip_blank_lines() {
        #[derive(Debug, serde::Deserialize)]
        struct Rec {
            port: u16,
        }

        let lines = body(&["{\"port\":22}\n", "\n", "oops\n", "{\"port\":80}\n"]);
        let sub = Subscription::spawn(lines, 1);
        let records: Vec<Result<Rec>> = sub.records().collect().await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().port, 22);
        assert!(matches!(records[1], Err(ShodanError::Decode(_))));
        assert_eq!(records[2].as_ref().unwrap().port, 80);
    }
}
