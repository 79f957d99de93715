//! A scripted, in-memory [`Transport`].
//!
//! Responses are queued per method path and encoded with `prost` on the way in, then decoded on
//! the way out, so anything that round-trips through [`MockTransport`] also round-trips through
//! the real codec.
//!
//! ```ignore
//! let transport = MockTransport::new();
//! let feed = transport.feed::<PositionResponse>(SUBSCRIBE_POSITION);
//!
//! let telemetry = Telemetry::new(transport.clone(), SubscriptionOptions::default());
//! let mut positions = telemetry.position().attach();
//!
//! feed.send(PositionResponse { position: Some(fix) });
//! feed.complete();
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use futures::StreamExt;
use prost::Message;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tonic::Status;

use super::{RpcStream, Transport};

type Frame = Result<Bytes, Status>;

#[derive(Debug)]
enum ScriptedStream {
    Feed(UnboundedReceiver<Frame>),
    Refuse(Status),
}

#[derive(Debug, Default)]
struct MockState {
    unary: DashMap<&'static str, VecDeque<Frame>, ahash::RandomState>,
    streams: DashMap<&'static str, VecDeque<ScriptedStream>, ahash::RandomState>,
    unary_calls: DashMap<&'static str, usize, ahash::RandomState>,
    stream_opens: DashMap<&'static str, usize, ahash::RandomState>,
    requests: DashMap<&'static str, Vec<Bytes>, ahash::RandomState>,
}

/// In-memory transport driven by queued responses.
///
/// Unary calls pop the next queued response for their method, or fail with `Unimplemented` when
/// nothing is queued. Stream opens pop the next queued [`StreamFeed`] (or refusal); with nothing
/// queued the opened stream stays silent forever, like an idle backend.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next unary call to `method`.
    pub fn push_unary<Resp: Message>(&self, method: &'static str, response: Result<Resp, Status>) {
        let frame = response.map(|message| Bytes::from(message.encode_to_vec()));
        self.state.unary.entry(method).or_default().push_back(frame);
    }

    /// Queue a stream for the next open of `method` and return the handle that feeds it.
    pub fn feed<Resp: Message>(&self, method: &'static str) -> StreamFeed<Resp> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state
            .streams
            .entry(method)
            .or_default()
            .push_back(ScriptedStream::Feed(rx));
        StreamFeed {
            tx,
            _message: PhantomData,
        }
    }

    /// Make the next open of `method` fail with `status` before any item.
    pub fn refuse_stream(&self, method: &'static str, status: Status) {
        self.state
            .streams
            .entry(method)
            .or_default()
            .push_back(ScriptedStream::Refuse(status));
    }

    /// Number of unary calls made to `method`.
    pub fn unary_calls(&self, method: &str) -> usize {
        self.state.unary_calls.get(method).map_or(0, |count| *count)
    }

    /// Number of times a stream was opened on `method`.
    pub fn stream_opens(&self, method: &str) -> usize {
        self.state.stream_opens.get(method).map_or(0, |count| *count)
    }

    /// Requests sent to `method`, decoded, oldest first.
    pub fn requests<Req: Message + Default>(&self, method: &str) -> Vec<Req> {
        self.state
            .requests
            .get(method)
            .map(|requests| {
                requests
                    .iter()
                    .filter_map(|bytes| Req::decode(bytes.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn record<Req: Message>(&self, method: &'static str, request: &Req) {
        self.state
            .requests
            .entry(method)
            .or_default()
            .push(Bytes::from(request.encode_to_vec()));
    }
}

fn decode<Resp: Message + Default>(frame: Frame) -> Result<Resp, Status> {
    let bytes = frame?;
    Resp::decode(bytes).map_err(|e| Status::internal(format!("failed to decode response: {e}")))
}

impl Transport for MockTransport {
    fn unary<Req, Resp>(
        &self,
        method: &'static str,
        request: Req,
    ) -> impl Future<Output = Result<Resp, Status>> + Send
    where
        Req: Message + Send + 'static,
        Resp: Message + Default + Send + 'static,
    {
        let this = self.clone();
        async move {
            *this.state.unary_calls.entry(method).or_default() += 1;
            this.record(method, &request);

            let frame = this
                .state
                .unary
                .get_mut(method)
                .and_then(|mut queue| queue.pop_front())
                .unwrap_or_else(|| {
                    Err(Status::unimplemented(format!(
                        "no scripted response for {method}"
                    )))
                });
            decode(frame)
        }
    }

    fn server_streaming<Req, Resp>(
        &self,
        method: &'static str,
        request: Req,
    ) -> impl Future<Output = Result<RpcStream<Resp>, Status>> + Send
    where
        Req: Message + Send + 'static,
        Resp: Message + Default + Send + 'static,
    {
        let this = self.clone();
        async move {
            *this.state.stream_opens.entry(method).or_default() += 1;
            this.record(method, &request);

            let scripted = this
                .state
                .streams
                .get_mut(method)
                .and_then(|mut queue| queue.pop_front());

            match scripted {
                Some(ScriptedStream::Feed(rx)) => {
                    Ok(UnboundedReceiverStream::new(rx).map(decode::<Resp>).boxed())
                }
                Some(ScriptedStream::Refuse(status)) => Err(status),
                None => Ok(futures::stream::pending().boxed()),
            }
        }
    }
}

/// Sending half of a scripted stream.
///
/// Dropping the feed (or calling [`complete`](StreamFeed::complete)) ends the stream gracefully.
#[derive(Debug)]
pub struct StreamFeed<Resp> {
    tx: UnboundedSender<Frame>,
    _message: PhantomData<fn(Resp)>,
}

impl<Resp: Message> StreamFeed<Resp> {
    /// Deliver one message.
    pub fn send(&self, message: Resp) {
        let _ = self.tx.send(Ok(Bytes::from(message.encode_to_vec())));
    }

    /// Deliver raw bytes, e.g. to provoke a decode failure.
    pub fn send_raw(&self, bytes: impl Into<Bytes>) {
        let _ = self.tx.send(Ok(bytes.into()));
    }

    /// Terminate the stream with `status`.
    pub fn fail(self, status: Status) {
        let _ = self.tx.send(Err(status));
    }

    /// End the stream gracefully.
    pub fn complete(self) {}

    /// Whether the consuming side has dropped the opened stream.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
