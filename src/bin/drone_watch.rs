use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use drone_client::endpoint::{DEFAULT_ADDRESS, DEFAULT_PORT};
use drone_client::{Drone, DroneConfig, Endpoint, SubscriptionError, Transport};
use futures::StreamExt;
use tracing::{debug, info, warn};

const RESUBSCRIBE_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let address = std::env::var("DRONE_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());
    let port = match std::env::var("DRONE_PORT") {
        Ok(port) => port.parse().context("DRONE_PORT is not a port number")?,
        Err(_) => DEFAULT_PORT,
    };

    let config = DroneConfig::builder().address(address).port(port).build();
    let endpoint = match std::env::args().nth(1) {
        Some(url) => Endpoint::parse(&url)?,
        None => config.endpoint(),
    };

    info!(endpoint = %endpoint, "Watching drone");

    let drone = Drone::connect_to(endpoint, &config)?;
    watch(&drone, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;

    info!("Shutting down");
    Ok(())
}

/// Log connection state, position, flight mode and battery until `shutdown` resolves.
///
/// A topic that fails or ends is attached again; the façade hands out a fresh subscription once
/// the old one has terminated.
async fn watch<Tr: Transport>(drone: &Drone<Tr>, shutdown: impl Future<Output = ()>) {
    tokio::pin!(shutdown);

    let mut connection = drone.core.connection_state().attach();
    let mut positions = drone.telemetry.position().attach();
    let mut flight_modes = drone.telemetry.flight_mode().attach();
    let mut batteries = drone.telemetry.battery().attach();

    loop {
        tokio::select! {
            state = connection.next() => match state {
                Some(Ok(state)) => info!(connected = state.is_connected, "Connection state"),
                ended => {
                    lost("Connection state", ended).await;
                    connection = drone.core.connection_state().attach();
                }
            },

            position = positions.next() => match position {
                Some(Ok(position)) => debug!(
                    lat = position.latitude_deg,
                    lon = position.longitude_deg,
                    alt = position.relative_altitude_m,
                    "Position"
                ),
                ended => {
                    lost("Position", ended).await;
                    positions = drone.telemetry.position().attach();
                }
            },

            mode = flight_modes.next() => match mode {
                Some(Ok(mode)) => info!(mode = ?mode, "Flight mode"),
                ended => {
                    lost("Flight mode", ended).await;
                    flight_modes = drone.telemetry.flight_mode().attach();
                }
            },

            battery = batteries.next() => match battery {
                Some(Ok(battery)) => info!(
                    voltage = battery.voltage_v,
                    remaining = battery.remaining_percent,
                    "Battery"
                ),
                ended => {
                    lost("Battery", ended).await;
                    batteries = drone.telemetry.battery().attach();
                }
            },

            _ = &mut shutdown => break,
        }
    }
}

/// Log why a topic stopped and pause before it is attached again.
async fn lost<T>(topic: &str, ended: Option<Result<T, SubscriptionError>>) {
    match ended {
        Some(Err(e)) => warn!(topic, error = %e, "Topic failed, resubscribing"),
        _ => info!(topic, "Topic ended, resubscribing"),
    }
    tokio::time::sleep(RESUBSCRIBE_DELAY).await;
}

#[cfg(test)]
mod tests {
    use drone_client::SubscriptionOptions;
    use drone_client::proto::telemetry;
    use drone_client::transport::mock::MockTransport;
    use tonic::Status;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_failed_topic_is_attached_again() {
        let transport = MockTransport::new();
        transport
            .feed::<telemetry::PositionResponse>(telemetry::SUBSCRIBE_POSITION)
            .fail(Status::permission_denied("estimator not ready"));
        let _recovered = transport.feed::<telemetry::PositionResponse>(telemetry::SUBSCRIBE_POSITION);
        let drone = Drone::with_transport(transport.clone(), SubscriptionOptions::default());

        watch(&drone, tokio::time::sleep(RESUBSCRIBE_DELAY * 3)).await;

        assert_eq!(transport.stream_opens(telemetry::SUBSCRIBE_POSITION), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_topic_is_attached_again() {
        let transport = MockTransport::new();
        transport
            .feed::<telemetry::BatteryResponse>(telemetry::SUBSCRIBE_BATTERY)
            .complete();
        let _live = transport.feed::<telemetry::BatteryResponse>(telemetry::SUBSCRIBE_BATTERY);
        let drone = Drone::with_transport(transport.clone(), SubscriptionOptions::default());

        watch(&drone, tokio::time::sleep(RESUBSCRIBE_DELAY * 3)).await;

        assert_eq!(transport.stream_opens(telemetry::SUBSCRIBE_BATTERY), 2);
    }
}
