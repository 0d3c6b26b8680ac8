//! Lazy streaming response body.
//!
//! [`SpreadsheetBody`] holds a [`BodyProducer`], a one-shot closure that writes the whole
//! payload into a [`ResponseOutput`]. Nothing runs when the body is created. The first
//! `poll_frame` call, made by the server once it is ready to send the body, moves the
//! producer onto tokio's blocking pool and from then on yields the chunks it writes.
//!
//! # Lifecycle
//!
//! ```text
//! Pending --first poll--> Streaming --producer returned--> Done
//!    |                        |
//!    +--no runtime--> Done    +--error / panic--> Err frame, Done
//! ```
//!
//! The producer and the poller are connected by a bounded channel of
//! [`StreamConfig::channel_capacity`] chunks, which gives natural backpressure.
//! Dropping the body closes the channel and the producer's next write fails with
//! [`std::io::ErrorKind::BrokenPipe`].

use crate::BoxError;
use crate::error::StreamError;
use crate::output::ResponseOutput;
use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};
use std::fmt;
use std::io::Write;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info};

/// The deferred "write the payload to the output stream" action.
pub type BodyProducer = Box<dyn FnOnce(&mut ResponseOutput) -> Result<(), BoxError> + Send + 'static>;

const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;
const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Tuning for how a body moves bytes from its producer to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    chunk_size: usize,
    channel_capacity: usize,
}

impl StreamConfig {
    pub fn new() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, channel_capacity: DEFAULT_CHANNEL_CAPACITY }
    }

    /// Largest frame the body yields. Clamped to at least 1.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Number of chunks that may wait between producer and poller. Clamped to at least 1.
    #[must_use]
    pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SpreadsheetBody {
    state: State,
    config: StreamConfig,
}

enum State {
    Pending(BodyProducer),
    Streaming { receiver: mpsc::Receiver<Bytes>, handle: JoinHandle<Result<u64, StreamError>> },
    Done,
}

impl SpreadsheetBody {
    pub fn new<F>(producer: F) -> Self
    where
        F: FnOnce(&mut ResponseOutput) -> Result<(), BoxError> + Send + 'static,
    {
        Self::with_config(producer, StreamConfig::default())
    }

    pub fn with_config<F>(producer: F, config: StreamConfig) -> Self
    where
        F: FnOnce(&mut ResponseOutput) -> Result<(), BoxError> + Send + 'static,
    {
        Self { state: State::Pending(Box::new(producer)), config }
    }

    /// Whether the producer has been handed off, i.e. the body has been polled at least once.
    pub fn is_started(&self) -> bool {
        !matches!(self.state, State::Pending(_))
    }

    pub fn config(&self) -> StreamConfig {
        self.config
    }

    fn start(&self, producer: BodyProducer) -> Result<State, StreamError> {
        let runtime = Handle::try_current().map_err(|e| {
            error!(cause = %e, "can't start body producer outside of a tokio runtime");
            StreamError::NoRuntime
        })?;

        let (sender, receiver) = mpsc::channel(self.config.channel_capacity);
        let chunk_size = self.config.chunk_size;
        debug!(chunk_size, channel_capacity = self.config.channel_capacity, "start streaming response body");

        let handle = runtime.spawn_blocking(move || {
            let mut output = ResponseOutput::new(sender, chunk_size);
            producer(&mut output).map_err(StreamError::producer)?;
            output.flush()?;
            Ok(output.bytes_written())
        });

        Ok(State::Streaming { receiver, handle })
    }
}

fn finish(result: Result<Result<u64, StreamError>, JoinError>) -> Option<Result<Frame<Bytes>, StreamError>> {
    match result {
        Ok(Ok(written)) => {
            info!(bytes = written, "finished streaming response body");
            None
        }
        Ok(Err(e)) => {
            error!(cause = %e, "body producer failed, response body is incomplete");
            Some(Err(e))
        }
        Err(join_error) if join_error.is_panic() => {
            error!("body producer panicked, response body is incomplete");
            Some(Err(StreamError::Panicked))
        }
        Err(join_error) => {
            error!(cause = %join_error, "body producer was cancelled");
            Some(Err(StreamError::Cancelled))
        }
    }
}

impl Body for SpreadsheetBody {
    type Data = Bytes;
    type Error = StreamError;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();

        loop {
            match mem::replace(&mut this.state, State::Done) {
                State::Pending(producer) => match this.start(producer) {
                    Ok(streaming) => this.state = streaming,
                    Err(e) => return Poll::Ready(Some(Err(e))),
                },

                State::Streaming { mut receiver, mut handle } => match receiver.poll_recv(cx) {
                    Poll::Ready(Some(chunk)) => {
                        this.state = State::Streaming { receiver, handle };
                        return Poll::Ready(Some(Ok(Frame::data(chunk))));
                    }
                    // the sender lives inside the producer task, so a closed channel means it returned
                    Poll::Ready(None) => match Pin::new(&mut handle).poll(cx) {
                        Poll::Ready(result) => return Poll::Ready(finish(result)),
                        Poll::Pending => {
                            this.state = State::Streaming { receiver, handle };
                            return Poll::Pending;
                        }
                    },
                    Poll::Pending => {
                        this.state = State::Streaming { receiver, handle };
                        return Poll::Pending;
                    }
                },

                State::Done => return Poll::Ready(None),
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        matches!(self.state, State::Done)
    }

    fn size_hint(&self) -> SizeHint {
        match self.state {
            State::Done => SizeHint::with_exact(0),
            _ => SizeHint::new(),
        }
    }
}

impl fmt::Debug for SpreadsheetBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Pending(_) => "pending",
            State::Streaming { .. } => "streaming",
            State::Done => "done",
        };
        f.debug_struct("SpreadsheetBody").field("state", &state).field("config", &self.config).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::task::noop_waker_ref;
    use http_body_util::BodyExt;
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    fn check_send<T: Send>() {}

    #[test]
    fn is_send() {
        check_send::<SpreadsheetBody>();
    }

    #[test]
    fn test_config_clamps_zero() {
        let config = StreamConfig::new().with_chunk_size(0).with_channel_capacity(0);
        assert_eq!(config.chunk_size(), 1);
        assert_eq!(config.channel_capacity(), 1);

        let config = StreamConfig::default();
        assert_eq!(config.chunk_size(), 8 * 1024);
        assert_eq!(config.channel_capacity(), 8);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_producer_runs_on_first_poll_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut body = SpreadsheetBody::new(move |output| {
            counter.fetch_add(1, Ordering::SeqCst);
            output.write_all(b"hello")?;
            Ok(())
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!body.is_started());
        assert!(!body.is_end_stream());
        assert!(body.size_hint().exact().is_none());

        let bytes = body.frame().await.unwrap().unwrap().into_data().unwrap();
        assert_eq!(bytes, Bytes::from("hello"));
        assert!(body.is_started());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(body.frame().await.is_none());
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
        assert!(body.frame().await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_stream_in_order_across_chunks() {
        let config = StreamConfig::new().with_chunk_size(3).with_channel_capacity(1);
        let body = SpreadsheetBody::with_config(
            |output| {
                for i in 0..100u8 {
                    output.write_all(&[i])?;
                }
                Ok(())
            },
            config,
        );

        let bytes = body.collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), (0..100u8).collect::<Vec<_>>().as_slice());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_empty_producer() {
        let mut body = SpreadsheetBody::new(|_output| Ok(()));
        assert!(body.frame().await.is_none());
        assert!(body.is_end_stream());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_producer_error_is_last_frame() {
        let mut body = SpreadsheetBody::new(|output| {
            output.write_all(b"partial")?;
            output.flush()?;
            Err(io::Error::other("disk on fire").into())
        });

        let bytes = body.frame().await.unwrap().unwrap().into_data().unwrap();
        assert_eq!(bytes, Bytes::from("partial"));

        let err = body.frame().await.unwrap().unwrap_err();
        assert!(matches!(err, StreamError::Producer { .. }));
        assert!(err.to_string().contains("disk on fire"));

        assert!(body.frame().await.is_none());
        assert!(body.is_end_stream());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_producer_panic() {
        let mut body = SpreadsheetBody::new(|_output| panic!("writer bug"));

        let err = body.frame().await.unwrap().unwrap_err();
        assert!(matches!(err, StreamError::Panicked));
        assert!(body.frame().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_dropping_body_stops_producer() {
        let (tx, rx) = oneshot::channel();
        let config = StreamConfig::new().with_chunk_size(16).with_channel_capacity(1);

        let mut body = SpreadsheetBody::with_config(
            move |output| {
                let result = loop {
                    if let Err(e) = output.write_all(&[0; 16]) {
                        break e;
                    }
                };
                let _ = tx.send(result.kind());
                Err(result.into())
            },
            config,
        );

        assert!(body.frame().await.unwrap().is_ok());
        drop(body);

        assert_eq!(rx.await.unwrap(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_poll_without_runtime() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut body = SpreadsheetBody::new(move |_output| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let mut cx = Context::from_waker(noop_waker_ref());
        match Pin::new(&mut body).poll_frame(&mut cx) {
            Poll::Ready(Some(Err(StreamError::NoRuntime))) => {}
            other => panic!("unexpected poll result: {other:?}"),
        }
        assert!(matches!(Pin::new(&mut body).poll_frame(&mut cx), Poll::Ready(None)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
