include!(concat!(env!("OUT_DIR"), "/mavsdk.rpc.param.rs"));

pub use param_result::Result as ParamResultCode;

pub const GET_PARAM_INT: &str = "/mavsdk.rpc.param.ParamService/GetParamInt";
pub const SET_PARAM_INT: &str = "/mavsdk.rpc.param.ParamService/SetParamInt";
pub const GET_PARAM_FLOAT: &str = "/mavsdk.rpc.param.ParamService/GetParamFloat";
pub const SET_PARAM_FLOAT: &str = "/mavsdk.rpc.param.ParamService/SetParamFloat";
pub const GET_ALL_PARAMS: &str = "/mavsdk.rpc.param.ParamService/GetAllParams";

result_code!(ParamResult, ParamResultCode);

carries_result!(ParamResult, param_result =>
    GetParamIntResponse,
    SetParamIntResponse,
    GetParamFloatResponse,
    SetParamFloatResponse,
);
