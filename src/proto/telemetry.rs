include!(concat!(env!("OUT_DIR"), "/mavsdk.rpc.telemetry.rs"));

pub use telemetry_result::Result as TelemetryResultCode;

pub const SUBSCRIBE_POSITION: &str = "/mavsdk.rpc.telemetry.TelemetryService/SubscribePosition";
pub const SUBSCRIBE_HOME: &str = "/mavsdk.rpc.telemetry.TelemetryService/SubscribeHome";
pub const SUBSCRIBE_IN_AIR: &str = "/mavsdk.rpc.telemetry.TelemetryService/SubscribeInAir";
pub const SUBSCRIBE_ARMED: &str = "/mavsdk.rpc.telemetry.TelemetryService/SubscribeArmed";
pub const SUBSCRIBE_BATTERY: &str = "/mavsdk.rpc.telemetry.TelemetryService/SubscribeBattery";
pub const SUBSCRIBE_FLIGHT_MODE: &str =
    "/mavsdk.rpc.telemetry.TelemetryService/SubscribeFlightMode";
pub const SUBSCRIBE_HEALTH: &str = "/mavsdk.rpc.telemetry.TelemetryService/SubscribeHealth";
pub const SUBSCRIBE_ATTITUDE_EULER: &str =
    "/mavsdk.rpc.telemetry.TelemetryService/SubscribeAttitudeEuler";
pub const SUBSCRIBE_GPS_INFO: &str = "/mavsdk.rpc.telemetry.TelemetryService/SubscribeGpsInfo";
pub const SET_RATE_POSITION: &str = "/mavsdk.rpc.telemetry.TelemetryService/SetRatePosition";
pub const SET_RATE_BATTERY: &str = "/mavsdk.rpc.telemetry.TelemetryService/SetRateBattery";

result_code!(TelemetryResult, TelemetryResultCode);

carries_result!(TelemetryResult, telemetry_result =>
    SetRatePositionResponse,
    SetRateBatteryResponse,
);
