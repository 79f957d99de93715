include!(concat!(env!("OUT_DIR"), "/mavsdk.rpc.action.rs"));

pub use action_result::Result as ActionResultCode;

pub const ARM: &str = "/mavsdk.rpc.action.ActionService/Arm";
pub const DISARM: &str = "/mavsdk.rpc.action.ActionService/Disarm";
pub const TAKEOFF: &str = "/mavsdk.rpc.action.ActionService/Takeoff";
pub const LAND: &str = "/mavsdk.rpc.action.ActionService/Land";
pub const REBOOT: &str = "/mavsdk.rpc.action.ActionService/Reboot";
pub const SHUTDOWN: &str = "/mavsdk.rpc.action.ActionService/Shutdown";
pub const KILL: &str = "/mavsdk.rpc.action.ActionService/Kill";
pub const RETURN_TO_LAUNCH: &str = "/mavsdk.rpc.action.ActionService/ReturnToLaunch";
pub const GOTO_LOCATION: &str = "/mavsdk.rpc.action.ActionService/GotoLocation";
pub const TRANSITION_TO_FIXEDWING: &str = "/mavsdk.rpc.action.ActionService/TransitionToFixedwing";
pub const TRANSITION_TO_MULTICOPTER: &str =
    "/mavsdk.rpc.action.ActionService/TransitionToMulticopter";
pub const GET_TAKEOFF_ALTITUDE: &str = "/mavsdk.rpc.action.ActionService/GetTakeoffAltitude";
pub const SET_TAKEOFF_ALTITUDE: &str = "/mavsdk.rpc.action.ActionService/SetTakeoffAltitude";
pub const GET_MAXIMUM_SPEED: &str = "/mavsdk.rpc.action.ActionService/GetMaximumSpeed";
pub const SET_MAXIMUM_SPEED: &str = "/mavsdk.rpc.action.ActionService/SetMaximumSpeed";
pub const GET_RETURN_TO_LAUNCH_ALTITUDE: &str =
    "/mavsdk.rpc.action.ActionService/GetReturnToLaunchAltitude";
pub const SET_RETURN_TO_LAUNCH_ALTITUDE: &str =
    "/mavsdk.rpc.action.ActionService/SetReturnToLaunchAltitude";

result_code!(ActionResult, ActionResultCode);

carries_result!(ActionResult, action_result =>
    ArmResponse,
    DisarmResponse,
    TakeoffResponse,
    LandResponse,
    RebootResponse,
    ShutdownResponse,
    KillResponse,
    ReturnToLaunchResponse,
    GotoLocationResponse,
    TransitionToFixedwingResponse,
    TransitionToMulticopterResponse,
    GetTakeoffAltitudeResponse,
    SetTakeoffAltitudeResponse,
    GetMaximumSpeedResponse,
    SetMaximumSpeedResponse,
    GetReturnToLaunchAltitudeResponse,
    SetReturnToLaunchAltitudeResponse,
);
