//! One façade per `mavsdk.rpc.*` service.
//!
//! Every façade is built from a [`Transport`] and [`SubscriptionOptions`]. Unary methods are
//! `async` and return `Result<_, <Plugin>Error>`; streamed topics are exposed as
//! [`SharedSubscription`] handles that are created on first access and shared afterwards.

pub mod action;
pub mod calibration;
pub mod camera;
pub mod core;
pub mod mission;
pub mod param;
pub mod shell;
pub mod telemetry;

use prost::Message;
use tonic::Status;

use crate::error::CallError;
use crate::subscription::{SharedSubscription, SubscriptionOptions, TopicSlot};
use crate::transport::Transport;
use crate::unary::{self, CarriesResult, CodeOf};

pub use self::action::Action;
pub use self::calibration::Calibration;
pub use self::camera::Camera;
pub use self::core::Core;
pub use self::mission::Mission;
pub use self::param::Param;
pub use self::shell::Shell;
pub use self::telemetry::Telemetry;

/// Transport and subscription settings shared by the methods of one façade.
#[derive(Debug, Clone)]
pub(crate) struct PluginContext<Tr> {
    transport: Tr,
    options: SubscriptionOptions,
}

impl<Tr: Transport> PluginContext<Tr> {
    pub(crate) fn new(transport: Tr, options: SubscriptionOptions) -> Self {
        Self { transport, options }
    }

    pub(crate) fn transport(&self) -> &Tr {
        &self.transport
    }

    /// A unary call whose response embeds a result code.
    pub(crate) async fn call<Req, Resp>(
        &self,
        method: &'static str,
        request: Req,
    ) -> Result<Resp, CallError<CodeOf<Resp>>>
    where
        Req: Message + Send + 'static,
        Resp: CarriesResult + Message + Default + Send + 'static,
    {
        unary::call(&self.transport, method, request).await
    }

    /// A unary call without a result block; only the transport can fail it.
    pub(crate) async fn call_plain<Req, Resp>(
        &self,
        method: &'static str,
        request: Req,
    ) -> Result<Resp, Status>
    where
        Req: Message + Send + 'static,
        Resp: Message + Default + Send + 'static,
    {
        self.transport.unary(method, request).await
    }

    /// The shared subscription held in `slot`, opening a fresh one if it is missing or
    /// terminated.
    pub(crate) fn topic<T, Req, Resp, F>(
        &self,
        slot: &TopicSlot<T>,
        method: &'static str,
        request: Req,
        translate: F,
    ) -> SharedSubscription<T>
    where
        T: Clone + Send + 'static,
        Req: Message + Clone + Sync + 'static,
        Resp: Message + Default + Send + 'static,
        F: Fn(Resp) -> Option<T> + Send + Sync + 'static,
    {
        slot.get_or_open(|| {
            SharedSubscription::from_rpc(
                self.transport.clone(),
                method,
                request,
                self.options.clone(),
                translate,
            )
        })
    }
}
