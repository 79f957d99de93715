//! Async client bindings for the `mavsdk.rpc.*` drone-control gRPC API.
//!
//! Unary RPCs are `async` methods returning `Result<_, CallError<Code>>`. Server-streamed
//! topics are [`SharedSubscription`]s: one backend stream per topic, fanned out to any number of
//! listeners, reopened transparently when the link drops.
//!
//! ```ignore
//! let drone = Drone::connect(&DroneConfig::default())?;
//!
//! drone.action.arm().await?;
//! drone.action.takeoff().await?;
//!
//! let mut positions = drone.telemetry.position().attach();
//! while let Some(position) = positions.next().await {
//!     let position = position?;
//!     println!("{:.6} {:.6}", position.latitude_deg, position.longitude_deg);
//! }
//! ```

pub mod drone;
pub mod endpoint;
pub mod error;
pub mod plugins;
pub mod proto;
pub mod subscription;
pub mod transport;
pub mod unary;

pub use drone::{Drone, DroneConfig};
pub use endpoint::{Endpoint, EndpointError};
pub use error::{CallError, SubscriptionError};
pub use subscription::{RetryPolicy, SharedSubscription, Subscription, SubscriptionOptions};
pub use transport::{GrpcTransport, Transport, TransportConfig};
