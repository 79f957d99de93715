use std::time::Duration;

use tonic::Status;

use super::PluginContext;
use crate::proto::core as wire;
use crate::subscription::{SharedSubscription, SubscriptionOptions, TopicSlot};
use crate::transport::{GrpcTransport, Transport};

/// Link state between the backend and the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionState {
    pub is_connected: bool,
}

impl From<wire::ConnectionState> for ConnectionState {
    fn from(state: wire::ConnectionState) -> Self {
        Self {
            is_connected: state.is_connected,
        }
    }
}

#[derive(Debug)]
pub struct Core<Tr = GrpcTransport> {
    ctx: PluginContext<Tr>,
    connection_state: TopicSlot<ConnectionState>,
}

impl<Tr: Transport> Core<Tr> {
    pub fn new(transport: Tr, options: SubscriptionOptions) -> Self {
        Self {
            ctx: PluginContext::new(transport, options),
            connection_state: TopicSlot::default(),
        }
    }

    pub fn connection_state(&self) -> SharedSubscription<ConnectionState> {
        self.ctx.topic(
            &self.connection_state,
            wire::SUBSCRIBE_CONNECTION_STATE,
            wire::SubscribeConnectionStateRequest {},
            |response: wire::ConnectionStateResponse| {
                response.connection_state.map(ConnectionState::from)
            },
        )
    }

    /// How long the backend waits for MAVLink traffic before declaring the vehicle lost.
    pub async fn set_mavlink_timeout(&self, timeout: Duration) -> Result<(), Status> {
        let request = wire::SetMavlinkTimeoutRequest {
            timeout_s: timeout.as_secs_f64(),
        };
        let _: wire::SetMavlinkTimeoutResponse =
            self.ctx.call_plain(wire::SET_MAVLINK_TIMEOUT, request).await?;
        Ok(())
    }
}
