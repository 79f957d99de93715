//! Shared, self-healing subscriptions to server-streamed topics.
//!
//! A [`SharedSubscription`] owns at most one underlying server stream and fans every item out to
//! all attached [`Subscription`] listeners:
//!
//! - The stream is opened when the first listener attaches and cancelled when the last one
//!   detaches.
//! - The most recent item is replayed to every new listener before live items.
//! - Transient transport failures reopen the stream according to the [`RetryPolicy`] without the
//!   listeners noticing.
//! - Graceful completion ends every listener's stream. Any other failure is delivered once to
//!   every listener and leaves the subscription terminated.
//!
//! ```ignore
//! let positions = telemetry.position();
//!
//! let mut map_view = positions.attach();
//! let mut status_bar = positions.attach(); // same underlying stream
//!
//! while let Some(position) = map_view.next().await {
//!     let position = position?;
//!     println!("{:.6} {:.6}", position.latitude_deg, position.longitude_deg);
//! }
//! ```

mod retry;
mod slot;
mod status;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use bon::Builder;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::{FutureExt, Stream, StreamExt};
use prost::Message;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tonic::Status;
use tracing::{debug, warn};

use crate::error::SubscriptionError;
use crate::transport::{RpcStream, Transport};

pub use retry::RetryPolicy;
pub(crate) use slot::TopicSlot;
pub use status::{StreamFault, TerminalStatus, is_transient};

/// Translated items from one underlying stream.
pub type ItemStream<T> = BoxStream<'static, Result<T, StreamFault>>;

type Opener<T> = Box<dyn Fn() -> BoxFuture<'static, Result<ItemStream<T>, Status>> + Send + Sync>;
type Delivery<T> = Result<T, SubscriptionError>;

/// Construction parameters shared by every subscription of a façade.
#[derive(Debug, Clone, Default, Builder)]
pub struct SubscriptionOptions {
    #[builder(default)]
    pub retry: RetryPolicy,

    /// Runtime the stream pump runs on. When unset, the runtime `attach` is called from.
    pub runtime: Option<Handle>,
}

struct Inner<T> {
    topic: &'static str,
    opener: Opener<T>,
    options: SubscriptionOptions,
    state: Mutex<State<T>>,
    /// Held by a pump for its whole lifetime, so an aborted generation's stream is dropped before
    /// the next generation opens.
    turn: tokio::sync::Mutex<()>,
}

struct State<T> {
    listeners: BTreeMap<u64, UnboundedSender<Delivery<T>>>,
    next_listener: u64,
    latest: Option<T>,
    /// Bumped for every pump spawned; a pump only acts while its generation is current.
    generation: u64,
    pump: Option<JoinHandle<()>>,
    terminated: Option<SubscriptionError>,
}

impl<T> State<T> {
    fn is_current(&self, generation: u64) -> bool {
        self.pump.is_some() && self.generation == generation
    }
}

impl<T> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn detach(&self, id: u64) {
        let mut state = self.lock();
        state.listeners.remove(&id);

        if state.listeners.is_empty() {
            if let Some(pump) = state.pump.take() {
                pump.abort();
                debug!(topic = self.topic, "Last listener detached, closing stream");
            }
        }
    }
}

impl<T: Clone + Send + 'static> Inner<T> {
    /// Fan `item` out to every listener. Returns `false` once this pump has been superseded.
    fn deliver(&self, generation: u64, item: T) -> bool {
        let mut state = self.lock();
        if !state.is_current(generation) {
            return false;
        }

        for listener in state.listeners.values() {
            let _ = listener.send(Ok(item.clone()));
        }
        state.latest = Some(item);
        true
    }

    /// End the current stream for every listener, with `error` if it failed.
    fn finish(&self, generation: u64, error: Option<SubscriptionError>) {
        let mut state = self.lock();
        if !state.is_current(generation) {
            return;
        }

        state.pump = None;
        let listeners = std::mem::take(&mut state.listeners);

        match error {
            Some(error) => {
                warn!(
                    topic = self.topic,
                    listeners = listeners.len(),
                    error = %error,
                    "Stream failed, terminating subscription"
                );
                for listener in listeners.values() {
                    let _ = listener.send(Err(error.clone()));
                }
                state.terminated = Some(error);
            }
            None => {
                debug!(topic = self.topic, listeners = listeners.len(), "Stream completed");
            }
        }
    }
}

/// Drive one generation of the underlying stream until it completes, fails for good, or is
/// superseded.
async fn pump<T: Clone + Send + 'static>(inner: Arc<Inner<T>>, generation: u64) {
    let topic = inner.topic;
    let _turn = inner.turn.lock().await;
    if !inner.lock().is_current(generation) {
        return;
    }

    let mut attempt: u32 = 0;
    loop {
        let status = match (inner.opener)().await {
            Ok(mut stream) => {
                debug!(topic, generation, "Stream opened");
                loop {
                    match stream.next().await {
                        Some(Ok(item)) => {
                            attempt = 0;
                            if !inner.deliver(generation, item) {
                                return;
                            }
                        }
                        Some(Err(fault)) => break TerminalStatus::classify(topic, fault),
                        None => break TerminalStatus::Completed,
                    }
                }
            }
            Err(status) => TerminalStatus::from_status(topic, status),
        };

        match status {
            TerminalStatus::Completed | TerminalStatus::Cancelled => {
                inner.finish(generation, None);
                return;
            }
            TerminalStatus::Unrecoverable(error) => {
                inner.finish(generation, Some(error));
                return;
            }
            TerminalStatus::Transient(status) => {
                attempt = attempt.saturating_add(1);
                let Some(delay) = inner.options.retry.delay_for(attempt) else {
                    let error = SubscriptionError::RetriesExhausted {
                        topic,
                        attempts: attempt - 1,
                        message: status.message().to_string(),
                    };
                    inner.finish(generation, Some(error));
                    return;
                };

                debug!(
                    topic,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %status,
                    "Transient stream failure, reopening"
                );

                if delay.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(delay).await;
                }

                if !inner.lock().is_current(generation) {
                    return;
                }
            }
        }
    }
}

/// A multicast, restartable live feed for one topic.
///
/// Cloning yields another handle to the same feed.
pub struct SharedSubscription<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Clone + Send + 'static> SharedSubscription<T> {
    /// Build a subscription from a function that opens the underlying stream.
    ///
    /// `opener` is called once per (re)open. It is never called while an earlier stream of the
    /// same subscription, or an earlier open still in flight, is alive.
    pub fn new<F>(topic: &'static str, options: SubscriptionOptions, opener: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<ItemStream<T>, Status>> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                topic,
                opener: Box::new(opener),
                options,
                state: Mutex::new(State {
                    listeners: BTreeMap::new(),
                    next_listener: 0,
                    latest: None,
                    generation: 0,
                    pump: None,
                    terminated: None,
                }),
                turn: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Bind a subscription to a server-streaming RPC.
    ///
    /// `translate` extracts the topic's payload from each response; a `None` terminates the
    /// subscription with [`SubscriptionError::Translate`].
    pub fn from_rpc<Tr, Req, Resp, F>(
        transport: Tr,
        method: &'static str,
        request: Req,
        options: SubscriptionOptions,
        translate: F,
    ) -> Self
    where
        Tr: Transport,
        Req: Message + Clone + Send + Sync + 'static,
        Resp: Message + Default + Send + 'static,
        F: Fn(Resp) -> Option<T> + Send + Sync + 'static,
    {
        let translate = Arc::new(translate);

        Self::new(method, options, move || {
            let transport = transport.clone();
            let request = request.clone();
            let translate = Arc::clone(&translate);

            async move {
                let stream: RpcStream<Resp> = transport.server_streaming(method, request).await?;
                let items = stream.map(move |response| match response {
                    Ok(response) => (*translate)(response).ok_or_else(|| {
                        StreamFault::Translate("response carried no payload".to_string())
                    }),
                    Err(status) => Err(StreamFault::Rpc(status)),
                });
                Ok::<_, Status>(items.boxed())
            }
            .boxed()
        })
    }

    /// Register a listener, opening the underlying stream if none is open.
    ///
    /// Never fails; failures arrive on the returned stream. Outside a Tokio runtime a runtime
    /// handle must be configured in [`SubscriptionOptions`].
    pub fn attach(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.inner.lock();

        if let Some(error) = &state.terminated {
            let _ = tx.send(Err(error.clone()));
            return Subscription {
                inner: Arc::clone(&self.inner),
                id: None,
                rx,
            };
        }

        if let Some(latest) = &state.latest {
            let _ = tx.send(Ok(latest.clone()));
        }

        let id = state.next_listener;
        state.next_listener += 1;
        state.listeners.insert(id, tx);

        if state.pump.is_none() {
            state.generation += 1;
            let generation = state.generation;
            debug!(topic = self.inner.topic, generation, "First listener attached, opening stream");
            state.pump = Some(self.spawn(pump(Arc::clone(&self.inner), generation)));
        }

        Subscription {
            inner: Arc::clone(&self.inner),
            id: Some(id),
            rx,
        }
    }

    /// The first item to arrive, or the replayed latest one, within `within`.
    pub async fn first(&self, within: Duration) -> Result<T, SubscriptionError> {
        let mut listener = self.attach();
        match tokio::time::timeout(within, listener.next()).await {
            Ok(Some(item)) => item,
            Ok(None) => Err(SubscriptionError::Ended {
                topic: self.inner.topic,
            }),
            Err(_) => Err(SubscriptionError::Timeout {
                topic: self.inner.topic,
                after: within,
            }),
        }
    }

    /// The most recently delivered item, if any.
    pub fn latest(&self) -> Option<T> {
        self.inner.lock().latest.clone()
    }

    fn spawn<F>(&self, future: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match &self.inner.options.runtime {
            Some(runtime) => runtime.spawn(future),
            None => tokio::spawn(future),
        }
    }
}

impl<T> SharedSubscription<T> {
    pub fn topic(&self) -> &'static str {
        self.inner.topic
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    /// Whether an underlying stream is currently open (or being reopened).
    pub fn is_streaming(&self) -> bool {
        self.inner.lock().pump.is_some()
    }

    /// Whether an unrecoverable failure ended this subscription for good.
    pub fn is_terminated(&self) -> bool {
        self.inner.lock().terminated.is_some()
    }
}

impl<T> Clone for SharedSubscription<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for SharedSubscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("SharedSubscription")
            .field("topic", &self.inner.topic)
            .field("listeners", &state.listeners.len())
            .field("streaming", &state.pump.is_some())
            .field("terminated", &state.terminated)
            .finish()
    }
}

/// One listener of a [`SharedSubscription`].
///
/// Yields `Ok` items in transport order, at most one `Err` (after which the stream ends), and
/// ends without error on graceful completion. Dropping it detaches the listener.
pub struct Subscription<T> {
    inner: Arc<Inner<T>>,
    id: Option<u64>,
    rx: UnboundedReceiver<Delivery<T>>,
}

impl<T> Subscription<T> {
    pub fn topic(&self) -> &'static str {
        self.inner.topic
    }
}

impl<T> Stream for Subscription<T> {
    type Item = Result<T, SubscriptionError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.inner.detach(id);
        }
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.inner.topic)
            .field("id", &self.id)
            .finish()
    }
}
