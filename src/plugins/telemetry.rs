//! Vehicle state as live topics.
//!
//! Every topic is a [`SharedSubscription`]: the first [`attach`](SharedSubscription::attach)
//! opens the backend stream, later ones share it and start with the most recent value.

use super::PluginContext;
use crate::error::CallError;
use crate::proto::telemetry as wire;
use crate::subscription::{SharedSubscription, SubscriptionOptions, TopicSlot};
use crate::transport::{GrpcTransport, Transport};

pub use crate::proto::telemetry::{FixType, FlightMode, TelemetryResultCode};

pub type TelemetryError = CallError<TelemetryResultCode>;

/// A global position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Above mean sea level.
    pub absolute_altitude_m: f32,
    /// Above the takeoff point.
    pub relative_altitude_m: f32,
}

impl From<wire::Position> for Position {
    fn from(position: wire::Position) -> Self {
        Self {
            latitude_deg: position.latitude_deg,
            longitude_deg: position.longitude_deg,
            absolute_altitude_m: position.absolute_altitude_m,
            relative_altitude_m: position.relative_altitude_m,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Battery {
    pub voltage_v: f32,
    /// `0.0..=1.0`.
    pub remaining_percent: f32,
}

impl From<wire::Battery> for Battery {
    fn from(battery: wire::Battery) -> Self {
        Self {
            voltage_v: battery.voltage_v,
            remaining_percent: battery.remaining_percent,
        }
    }
}

/// Pre-flight checks as reported by the autopilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub is_gyrometer_calibration_ok: bool,
    pub is_accelerometer_calibration_ok: bool,
    pub is_magnetometer_calibration_ok: bool,
    pub is_local_position_ok: bool,
    pub is_global_position_ok: bool,
    pub is_home_position_ok: bool,
    pub is_armable: bool,
}

impl From<wire::Health> for Health {
    fn from(health: wire::Health) -> Self {
        Self {
            is_gyrometer_calibration_ok: health.is_gyrometer_calibration_ok,
            is_accelerometer_calibration_ok: health.is_accelerometer_calibration_ok,
            is_magnetometer_calibration_ok: health.is_magnetometer_calibration_ok,
            is_local_position_ok: health.is_local_position_ok,
            is_global_position_ok: health.is_global_position_ok,
            is_home_position_ok: health.is_home_position_ok,
            is_armable: health.is_armable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngle {
    pub roll_deg: f32,
    pub pitch_deg: f32,
    pub yaw_deg: f32,
    pub timestamp_us: u64,
}

impl From<wire::EulerAngle> for EulerAngle {
    fn from(angle: wire::EulerAngle) -> Self {
        Self {
            roll_deg: angle.roll_deg,
            pitch_deg: angle.pitch_deg,
            yaw_deg: angle.yaw_deg,
            timestamp_us: angle.timestamp_us,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsInfo {
    pub num_satellites: i32,
    pub fix_type: FixType,
}

impl From<wire::GpsInfo> for GpsInfo {
    fn from(info: wire::GpsInfo) -> Self {
        Self {
            num_satellites: info.num_satellites,
            fix_type: info.fix_type(),
        }
    }
}

#[derive(Debug)]
pub struct Telemetry<Tr = GrpcTransport> {
    ctx: PluginContext<Tr>,
    position: TopicSlot<Position>,
    home: TopicSlot<Position>,
    in_air: TopicSlot<bool>,
    armed: TopicSlot<bool>,
    battery: TopicSlot<Battery>,
    flight_mode: TopicSlot<FlightMode>,
    health: TopicSlot<Health>,
    attitude_euler: TopicSlot<EulerAngle>,
    gps_info: TopicSlot<GpsInfo>,
}

impl<Tr: Transport> Telemetry<Tr> {
    pub fn new(transport: Tr, options: SubscriptionOptions) -> Self {
        Self {
            ctx: PluginContext::new(transport, options),
            position: TopicSlot::default(),
            home: TopicSlot::default(),
            in_air: TopicSlot::default(),
            armed: TopicSlot::default(),
            battery: TopicSlot::default(),
            flight_mode: TopicSlot::default(),
            health: TopicSlot::default(),
            attitude_euler: TopicSlot::default(),
            gps_info: TopicSlot::default(),
        }
    }

    pub fn position(&self) -> SharedSubscription<Position> {
        self.ctx.topic(
            &self.position,
            wire::SUBSCRIBE_POSITION,
            wire::SubscribePositionRequest {},
            |response: wire::PositionResponse| response.position.map(Position::from),
        )
    }

    /// Where the vehicle took off, or will return to.
    pub fn home(&self) -> SharedSubscription<Position> {
        self.ctx.topic(
            &self.home,
            wire::SUBSCRIBE_HOME,
            wire::SubscribeHomeRequest {},
            |response: wire::HomeResponse| response.home.map(Position::from),
        )
    }

    pub fn in_air(&self) -> SharedSubscription<bool> {
        self.ctx.topic(
            &self.in_air,
            wire::SUBSCRIBE_IN_AIR,
            wire::SubscribeInAirRequest {},
            |response: wire::InAirResponse| Some(response.is_in_air),
        )
    }

    pub fn armed(&self) -> SharedSubscription<bool> {
        self.ctx.topic(
            &self.armed,
            wire::SUBSCRIBE_ARMED,
            wire::SubscribeArmedRequest {},
            |response: wire::ArmedResponse| Some(response.is_armed),
        )
    }

    pub fn battery(&self) -> SharedSubscription<Battery> {
        self.ctx.topic(
            &self.battery,
            wire::SUBSCRIBE_BATTERY,
            wire::SubscribeBatteryRequest {},
            |response: wire::BatteryResponse| response.battery.map(Battery::from),
        )
    }

    /// Unrecognised modes arrive as [`FlightMode::Unknown`].
    pub fn flight_mode(&self) -> SharedSubscription<FlightMode> {
        self.ctx.topic(
            &self.flight_mode,
            wire::SUBSCRIBE_FLIGHT_MODE,
            wire::SubscribeFlightModeRequest {},
            |response: wire::FlightModeResponse| Some(response.flight_mode()),
        )
    }

    pub fn health(&self) -> SharedSubscription<Health> {
        self.ctx.topic(
            &self.health,
            wire::SUBSCRIBE_HEALTH,
            wire::SubscribeHealthRequest {},
            |response: wire::HealthResponse| response.health.map(Health::from),
        )
    }

    pub fn attitude_euler(&self) -> SharedSubscription<EulerAngle> {
        self.ctx.topic(
            &self.attitude_euler,
            wire::SUBSCRIBE_ATTITUDE_EULER,
            wire::SubscribeAttitudeEulerRequest {},
            |response: wire::AttitudeEulerResponse| response.attitude_euler.map(EulerAngle::from),
        )
    }

    pub fn gps_info(&self) -> SharedSubscription<GpsInfo> {
        self.ctx.topic(
            &self.gps_info,
            wire::SUBSCRIBE_GPS_INFO,
            wire::SubscribeGpsInfoRequest {},
            |response: wire::GpsInfoResponse| response.gps_info.map(GpsInfo::from),
        )
    }

    /// Ask the autopilot to publish position updates at `rate_hz`.
    pub async fn set_rate_position(&self, rate_hz: f64) -> Result<(), TelemetryError> {
        let request = wire::SetRatePositionRequest { rate_hz };
        let _: wire::SetRatePositionResponse =
            self.ctx.call(wire::SET_RATE_POSITION, request).await?;
        Ok(())
    }

    pub async fn set_rate_battery(&self, rate_hz: f64) -> Result<(), TelemetryError> {
        let request = wire::SetRateBatteryRequest { rate_hz };
        let _: wire::SetRateBatteryResponse =
            self.ctx.call(wire::SET_RATE_BATTERY, request).await?;
        Ok(())
    }
}
