//! Vehicle commands: arming, takeoff and landing, flight termination, and the few settings that
//! shape them.

use super::PluginContext;
use crate::error::CallError;
use crate::proto::action as wire;
use crate::subscription::SubscriptionOptions;
use crate::transport::{GrpcTransport, Transport};

pub use crate::proto::action::ActionResultCode;

pub type ActionError = CallError<ActionResultCode>;

/// A global position to fly to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub absolute_altitude_m: f32,
    pub yaw_deg: f32,
}

impl From<Location> for wire::GotoLocationRequest {
    fn from(location: Location) -> Self {
        Self {
            latitude_deg: location.latitude_deg,
            longitude_deg: location.longitude_deg,
            absolute_altitude_m: location.absolute_altitude_m,
            yaw_deg: location.yaw_deg,
        }
    }
}

#[derive(Debug)]
pub struct Action<Tr = GrpcTransport> {
    ctx: PluginContext<Tr>,
}

impl<Tr: Transport> Action<Tr> {
    pub fn new(transport: Tr, options: SubscriptionOptions) -> Self {
        Self {
            ctx: PluginContext::new(transport, options),
        }
    }

    pub async fn arm(&self) -> Result<(), ActionError> {
        let _: wire::ArmResponse = self.ctx.call(wire::ARM, wire::ArmRequest {}).await?;
        Ok(())
    }

    pub async fn disarm(&self) -> Result<(), ActionError> {
        let _: wire::DisarmResponse = self.ctx.call(wire::DISARM, wire::DisarmRequest {}).await?;
        Ok(())
    }

    /// Take off to the configured takeoff altitude.
    pub async fn takeoff(&self) -> Result<(), ActionError> {
        let _: wire::TakeoffResponse =
            self.ctx.call(wire::TAKEOFF, wire::TakeoffRequest {}).await?;
        Ok(())
    }

    pub async fn land(&self) -> Result<(), ActionError> {
        let _: wire::LandResponse = self.ctx.call(wire::LAND, wire::LandRequest {}).await?;
        Ok(())
    }

    pub async fn reboot(&self) -> Result<(), ActionError> {
        let _: wire::RebootResponse = self.ctx.call(wire::REBOOT, wire::RebootRequest {}).await?;
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<(), ActionError> {
        let _: wire::ShutdownResponse =
            self.ctx.call(wire::SHUTDOWN, wire::ShutdownRequest {}).await?;
        Ok(())
    }

    /// Stop the motors immediately, in the air or not.
    pub async fn kill(&self) -> Result<(), ActionError> {
        let _: wire::KillResponse = self.ctx.call(wire::KILL, wire::KillRequest {}).await?;
        Ok(())
    }

    pub async fn return_to_launch(&self) -> Result<(), ActionError> {
        let _: wire::ReturnToLaunchResponse = self
            .ctx
            .call(wire::RETURN_TO_LAUNCH, wire::ReturnToLaunchRequest {})
            .await?;
        Ok(())
    }

    pub async fn goto_location(&self, location: Location) -> Result<(), ActionError> {
        let request = wire::GotoLocationRequest::from(location);
        let _: wire::GotoLocationResponse = self.ctx.call(wire::GOTO_LOCATION, request).await?;
        Ok(())
    }

    /// VTOL only.
    pub async fn transition_to_fixedwing(&self) -> Result<(), ActionError> {
        let _: wire::TransitionToFixedwingResponse = self
            .ctx
            .call(
                wire::TRANSITION_TO_FIXEDWING,
                wire::TransitionToFixedwingRequest {},
            )
            .await?;
        Ok(())
    }

    /// VTOL only.
    pub async fn transition_to_multicopter(&self) -> Result<(), ActionError> {
        let _: wire::TransitionToMulticopterResponse = self
            .ctx
            .call(
                wire::TRANSITION_TO_MULTICOPTER,
                wire::TransitionToMulticopterRequest {},
            )
            .await?;
        Ok(())
    }

    /// Takeoff altitude in metres above ground.
    pub async fn get_takeoff_altitude(&self) -> Result<f32, ActionError> {
        let response: wire::GetTakeoffAltitudeResponse = self
            .ctx
            .call(wire::GET_TAKEOFF_ALTITUDE, wire::GetTakeoffAltitudeRequest {})
            .await?;
        Ok(response.altitude)
    }

    pub async fn set_takeoff_altitude(&self, altitude_m: f32) -> Result<(), ActionError> {
        let request = wire::SetTakeoffAltitudeRequest {
            altitude: altitude_m,
        };
        let _: wire::SetTakeoffAltitudeResponse =
            self.ctx.call(wire::SET_TAKEOFF_ALTITUDE, request).await?;
        Ok(())
    }

    /// Horizontal speed limit in m/s.
    pub async fn get_maximum_speed(&self) -> Result<f32, ActionError> {
        let response: wire::GetMaximumSpeedResponse = self
            .ctx
            .call(wire::GET_MAXIMUM_SPEED, wire::GetMaximumSpeedRequest {})
            .await?;
        Ok(response.speed)
    }

    pub async fn set_maximum_speed(&self, speed_m_s: f32) -> Result<(), ActionError> {
        let request = wire::SetMaximumSpeedRequest { speed: speed_m_s };
        let _: wire::SetMaximumSpeedResponse =
            self.ctx.call(wire::SET_MAXIMUM_SPEED, request).await?;
        Ok(())
    }

    /// Altitude above home the vehicle climbs to before returning.
    pub async fn get_return_to_launch_altitude(&self) -> Result<f32, ActionError> {
        let response: wire::GetReturnToLaunchAltitudeResponse = self
            .ctx
            .call(
                wire::GET_RETURN_TO_LAUNCH_ALTITUDE,
                wire::GetReturnToLaunchAltitudeRequest {},
            )
            .await?;
        Ok(response.relative_altitude_m)
    }

    pub async fn set_return_to_launch_altitude(
        &self,
        relative_altitude_m: f32,
    ) -> Result<(), ActionError> {
        let request = wire::SetReturnToLaunchAltitudeRequest {
            relative_altitude_m,
        };
        let _: wire::SetReturnToLaunchAltitudeResponse = self
            .ctx
            .call(wire::SET_RETURN_TO_LAUNCH_ALTITUDE, request)
            .await?;
        Ok(())
    }
}
