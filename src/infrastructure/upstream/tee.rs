//! Stream decorator that hands every chunk to its consumer and keeps a copy

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use tokio::sync::oneshot;

use crate::domain::DomainError;

/// What a [`TeeStream`] observed by the time it finished
#[derive(Debug)]
pub enum Capture {
    /// The source ended normally; holds exactly the bytes that were forwarded
    Complete(Bytes),
    /// The source failed mid-body
    Failed(String),
    /// The consumer dropped the stream before the source ended
    Abandoned { bytes_seen: usize },
}

/// Forwards each chunk unchanged while appending it to a capture buffer.
///
/// Chunks reach the consumer as soon as the source yields them; nothing is held
/// back. Exactly one [`Capture`] is reported on the paired receiver: on end of
/// stream, on the first source error, or when the stream is dropped early.
pub struct TeeStream<S> {
    inner: S,
    buffer: BytesMut,
    report: Option<oneshot::Sender<Capture>>,
}

impl<S> TeeStream<S> {
    pub fn new(inner: S) -> (Self, oneshot::Receiver<Capture>) {
        let (tx, rx) = oneshot::channel();

        let stream = Self {
            inner,
            buffer: BytesMut::new(),
            report: Some(tx),
        };

        (stream, rx)
    }

    fn finish(&mut self, capture: Capture) {
        if let Some(tx) = self.report.take() {
            // Receiver gone means nobody wants the capture
            let _ = tx.send(capture);
        }
    }
}

impl<S> Stream for TeeStream<S>
where
    S: Stream<Item = Result<Bytes, DomainError>> + Unpin,
{
    type Item = Result<Bytes, DomainError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.buffer.extend_from_slice(&chunk);
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finish(Capture::Failed(e.to_string()));
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                let captured = std::mem::take(&mut this.buffer).freeze();
                this.finish(Capture::Complete(captured));
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<S> Drop for TeeStream<S> {
    fn drop(&mut self) {
        let bytes_seen = self.buffer.len();
        self.finish(Capture::Abandoned { bytes_seen });
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    fn chunks(parts: Vec<&'static str>) -> impl Stream<Item = Result<Bytes, DomainError>> + Unpin {
        stream::iter(
            parts
                .into_iter()
                .map(|p| Ok(Bytes::from_static(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_forwards_chunks_and_captures_all() {
        let (tee, rx) = TeeStream::new(chunks(vec!["data: a\n\n", "data: b\n\n", "data: [DONE]\n\n"]));

        let forwarded: Vec<Bytes> = tee.map(|c| c.unwrap()).collect().await;
        assert_eq!(forwarded.len(), 3);

        let joined: Vec<u8> = forwarded.iter().flat_map(|c| c.to_vec()).collect();

        match rx.await.unwrap() {
            Capture::Complete(captured) => assert_eq!(captured.to_vec(), joined),
            other => panic!("unexpected capture: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_stream_completes_empty() {
        let (tee, rx) = TeeStream::new(chunks(vec![]));

        let forwarded: Vec<_> = tee.collect().await;
        assert!(forwarded.is_empty());

        assert!(matches!(rx.await.unwrap(), Capture::Complete(b) if b.is_empty()));
    }

    #[tokio::test]
    async fn test_source_error_reports_failure() {
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(DomainError::upstream("connection reset")),
        ]);
        let (tee, rx) = TeeStream::new(source);

        let items: Vec<_> = tee.collect().await;
        assert!(items[0].is_ok());
        assert!(items[1].is_err());

        assert!(matches!(rx.await.unwrap(), Capture::Failed(msg) if msg.contains("connection reset")));
    }

    #[tokio::test]
    async fn test_early_drop_reports_abandoned() {
        let (mut tee, rx) = TeeStream::new(chunks(vec!["one", "two", "three"]));

        let first = tee.next().await.unwrap().unwrap();
        assert_eq!(first, Bytes::from_static(b"one"));
        drop(tee);

        assert!(matches!(rx.await.unwrap(), Capture::Abandoned { bytes_seen: 3 }));
    }
}
