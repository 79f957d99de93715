use bon::Builder;
use tokio::runtime::Handle;
use tracing::info;

use crate::endpoint::{DEFAULT_ADDRESS, DEFAULT_PORT, Endpoint, EndpointError};
use crate::plugins::{Action, Calibration, Camera, Core, Mission, Param, Shell, Telemetry};
use crate::subscription::{RetryPolicy, SubscriptionOptions};
use crate::transport::{GrpcTransport, Transport, TransportConfig};

/// Where the backend listens and how to talk to it.
#[derive(Debug, Clone, Builder)]
pub struct DroneConfig {
    #[builder(default = DEFAULT_ADDRESS.to_string(), into)]
    pub address: String,

    #[builder(default = DEFAULT_PORT)]
    pub port: u16,

    #[builder(default)]
    pub retry: RetryPolicy,

    /// Runtime the subscription pumps are spawned on; the caller's runtime when unset.
    pub runtime: Option<Handle>,

    #[builder(default)]
    pub transport: TransportConfig,
}

impl DroneConfig {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.address.as_str(), self.port)
    }

    pub fn subscription_options(&self) -> SubscriptionOptions {
        SubscriptionOptions {
            retry: self.retry,
            runtime: self.runtime.clone(),
        }
    }
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Every plugin façade, bound to one backend.
///
/// The façades share the transport; each keeps its own topics.
#[derive(Debug)]
pub struct Drone<Tr = GrpcTransport> {
    pub action: Action<Tr>,
    pub calibration: Calibration<Tr>,
    pub camera: Camera<Tr>,
    pub core: Core<Tr>,
    pub mission: Mission<Tr>,
    pub param: Param<Tr>,
    pub shell: Shell<Tr>,
    pub telemetry: Telemetry<Tr>,
}

impl Drone<GrpcTransport> {
    /// Configure a channel to the backend in `config`. Connects lazily, on the first call or
    /// subscription; must be called from within a Tokio runtime.
    pub fn connect(config: &DroneConfig) -> Result<Self, EndpointError> {
        Self::connect_to(config.endpoint(), config)
    }

    /// Like [`connect`](Self::connect), ignoring the address and port in `config`.
    pub fn connect_to(endpoint: Endpoint, config: &DroneConfig) -> Result<Self, EndpointError> {
        let transport = GrpcTransport::connect_lazy(endpoint, &config.transport)?;
        info!(endpoint = %transport.endpoint(), "Drone client ready");
        Ok(Self::with_transport(transport, config.subscription_options()))
    }
}

impl<Tr: Transport> Drone<Tr> {
    pub fn with_transport(transport: Tr, options: SubscriptionOptions) -> Self {
        Self {
            action: Action::new(transport.clone(), options.clone()),
            calibration: Calibration::new(transport.clone(), options.clone()),
            camera: Camera::new(transport.clone(), options.clone()),
            core: Core::new(transport.clone(), options.clone()),
            mission: Mission::new(transport.clone(), options.clone()),
            param: Param::new(transport.clone(), options.clone()),
            shell: Shell::new(transport.clone(), options.clone()),
            telemetry: Telemetry::new(transport, options),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;

    use super::*;
    use crate::proto::{action, telemetry};
    use crate::transport::mock::MockTransport;

    #[test]
    fn test_config_defaults() {
        let config = DroneConfig::default();
        assert_eq!(config.address, "localhost");
        assert_eq!(config.port, 50051);
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(config.runtime.is_none());
        assert_eq!(config.endpoint(), Endpoint::default());
    }

    #[test]
    fn test_config_builder() {
        let config = DroneConfig::builder()
            .address("10.0.0.7")
            .port(50052)
            .retry(RetryPolicy::immediate())
            .build();
        assert_eq!(config.endpoint().to_string(), "10.0.0.7:50052");
        assert_eq!(config.subscription_options().retry, RetryPolicy::immediate());
    }

    #[tokio::test]
    async fn test_connect_is_lazy() {
        let config = DroneConfig::builder()
            .port(1)
            .transport(
                TransportConfig::builder()
                    .connect_timeout(Duration::from_millis(100))
                    .build(),
            )
            .build();
        let drone = Drone::connect(&config).unwrap();
        assert!(!drone.telemetry.position().is_streaming());
    }

    #[tokio::test]
    async fn test_facades_share_one_transport() {
        let transport = MockTransport::new();
        transport.push_unary(
            action::ARM,
            Ok(action::ArmResponse {
                action_result: Some(action::ActionResult {
                    result: action::ActionResultCode::Success.into(),
                    result_str: String::new(),
                }),
            }),
        );
        let feed = transport.feed::<telemetry::ArmedResponse>(telemetry::SUBSCRIBE_ARMED);
        let drone = Drone::with_transport(transport.clone(), SubscriptionOptions::default());

        let mut armed = drone.telemetry.armed().attach();
        drone.action.arm().await.unwrap();
        feed.send(telemetry::ArmedResponse { is_armed: true });

        assert!(armed.next().await.unwrap().unwrap());
        assert_eq!(transport.unary_calls(action::ARM), 1);
    }
}
