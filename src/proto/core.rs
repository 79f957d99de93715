include!(concat!(env!("OUT_DIR"), "/mavsdk.rpc.core.rs"));

pub const SUBSCRIBE_CONNECTION_STATE: &str =
    "/mavsdk.rpc.core.CoreService/SubscribeConnectionState";
pub const SET_MAVLINK_TIMEOUT: &str = "/mavsdk.rpc.core.CoreService/SetMavlinkTimeout";
