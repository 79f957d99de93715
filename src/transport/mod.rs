//! The RPC seam between plugin façades and the wire.
//!
//! [`Transport`] is the only thing façades and subscriptions talk to. [`GrpcTransport`] drives a
//! real `tonic` channel; [`mock::MockTransport`] scripts responses in memory.
//!
//! Calls are addressed by method path rather than through the generated service clients so that
//! one shared subscription engine can drive any server stream. The generated clients remain
//! available over the same channel through [`GrpcTransport::channel`].

mod config;
pub mod mock;

use std::future::Future;

use futures::StreamExt;
use futures::stream::BoxStream;
use prost::Message;
use tonic::client::Grpc;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Request, Status};
use tonic_prost::ProstCodec;
use tracing::{debug, info};

use crate::endpoint::{Endpoint, EndpointError};

pub use config::TransportConfig;

/// Server-streamed responses, ending with `None` on graceful completion or with an `Err` status.
pub type RpcStream<T> = BoxStream<'static, Result<T, Status>>;

/// A connection to a single backend endpoint.
///
/// Methods are identified by their full gRPC path, e.g.
/// `/mavsdk.rpc.telemetry.TelemetryService/SubscribePosition`. Cloning must be cheap and every
/// clone shares the same underlying connection.
pub trait Transport: Clone + Send + Sync + 'static {
    /// Perform a request/response call.
    fn unary<Req, Resp>(
        &self,
        method: &'static str,
        request: Req,
    ) -> impl Future<Output = Result<Resp, Status>> + Send
    where
        Req: Message + Send + 'static,
        Resp: Message + Default + Send + 'static;

    /// Open a server-streaming call.
    fn server_streaming<Req, Resp>(
        &self,
        method: &'static str,
        request: Req,
    ) -> impl Future<Output = Result<RpcStream<Resp>, Status>> + Send
    where
        Req: Message + Send + 'static,
        Resp: Message + Default + Send + 'static;
}

/// [`Transport`] over a lazily connected `tonic` channel.
///
/// The channel is created once and shared read-only by every clone; it connects on first use and
/// reconnects on its own after the backend goes away.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    endpoint: Endpoint,
    channel: Channel,
}

impl GrpcTransport {
    /// Configure a channel to `endpoint` without connecting yet.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect_lazy(endpoint: Endpoint, config: &TransportConfig) -> Result<Self, EndpointError> {
        let mut builder = tonic::transport::Endpoint::from_shared(endpoint.uri())?
            .connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if config.tcp_keepalive.is_some() {
            builder = builder.tcp_keepalive(config.tcp_keepalive);
        }

        let channel = builder.connect_lazy();

        info!(endpoint = %endpoint, "Configured gRPC channel");

        Ok(Self { endpoint, channel })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The shared channel, e.g. for a generated client such as
    /// `proto::action::action_service_client::ActionServiceClient::new(transport.channel())`.
    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }
}

impl Transport for GrpcTransport {
    fn unary<Req, Resp>(
        &self,
        method: &'static str,
        request: Req,
    ) -> impl Future<Output = Result<Resp, Status>> + Send
    where
        Req: Message + Send + 'static,
        Resp: Message + Default + Send + 'static,
    {
        let mut grpc = Grpc::new(self.channel.clone());
        async move {
            grpc.ready()
                .await
                .map_err(|e| Status::unavailable(format!("service was not ready: {e}")))?;

            debug!(method, "Unary call");
            let codec = ProstCodec::<Req, Resp>::default();
            let response = grpc
                .unary(Request::new(request), PathAndQuery::from_static(method), codec)
                .await?;
            Ok(response.into_inner())
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
        let mut grpc = Grpc::new(self.channel.clone());
        async move {
            grpc.ready()
                .await
                .map_err(|e| Status::unavailable(format!("service was not ready: {e}")))?;

            debug!(method, "Opening server stream");
            let codec = ProstCodec::<Req, Resp>::default();
            let response = grpc
                .server_streaming(Request::new(request), PathAndQuery::from_static(method), codec)
                .await?;
            Ok(response.into_inner().boxed())
        }
    }
}
