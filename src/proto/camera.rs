include!(concat!(env!("OUT_DIR"), "/mavsdk.rpc.camera.rs"));

pub use camera_result::Result as CameraResultCode;
pub use status::StorageStatus;

pub const TAKE_PHOTO: &str = "/mavsdk.rpc.camera.CameraService/TakePhoto";
pub const START_PHOTO_INTERVAL: &str = "/mavsdk.rpc.camera.CameraService/StartPhotoInterval";
pub const STOP_PHOTO_INTERVAL: &str = "/mavsdk.rpc.camera.CameraService/StopPhotoInterval";
pub const START_VIDEO: &str = "/mavsdk.rpc.camera.CameraService/StartVideo";
pub const STOP_VIDEO: &str = "/mavsdk.rpc.camera.CameraService/StopVideo";
pub const SET_MODE: &str = "/mavsdk.rpc.camera.CameraService/SetMode";
pub const FORMAT_STORAGE: &str = "/mavsdk.rpc.camera.CameraService/FormatStorage";
pub const SUBSCRIBE_MODE: &str = "/mavsdk.rpc.camera.CameraService/SubscribeMode";
pub const SUBSCRIBE_CAPTURE_INFO: &str = "/mavsdk.rpc.camera.CameraService/SubscribeCaptureInfo";
pub const SUBSCRIBE_STATUS: &str = "/mavsdk.rpc.camera.CameraService/SubscribeStatus";

result_code!(CameraResult, CameraResultCode);

carries_result!(CameraResult, camera_result =>
    TakePhotoResponse,
    StartPhotoIntervalResponse,
    StopPhotoIntervalResponse,
    StartVideoResponse,
    StopVideoResponse,
    SetModeResponse,
    FormatStorageResponse,
);
