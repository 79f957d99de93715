include!(concat!(env!("OUT_DIR"), "/mavsdk.rpc.calibration.rs"));

pub use calibration_result::Result as CalibrationResultCode;

pub const CALIBRATE_GYRO: &str = "/mavsdk.rpc.calibration.CalibrationService/SubscribeCalibrateGyro";
pub const CALIBRATE_ACCELEROMETER: &str =
    "/mavsdk.rpc.calibration.CalibrationService/SubscribeCalibrateAccelerometer";
pub const CALIBRATE_MAGNETOMETER: &str =
    "/mavsdk.rpc.calibration.CalibrationService/SubscribeCalibrateMagnetometer";
pub const CALIBRATE_LEVEL_HORIZON: &str =
    "/mavsdk.rpc.calibration.CalibrationService/SubscribeCalibrateLevelHorizon";
pub const CALIBRATE_GIMBAL_ACCELEROMETER: &str =
    "/mavsdk.rpc.calibration.CalibrationService/SubscribeCalibrateGimbalAccelerometer";
pub const CANCEL: &str = "/mavsdk.rpc.calibration.CalibrationService/Cancel";

/// Every calibration stream shares the gyro stream's request and response layout.
pub type SubscribeCalibrateRequest = SubscribeCalibrateGyroRequest;
pub type CalibrateResponse = CalibrateGyroResponse;

result_code!(CalibrationResult, CalibrationResultCode);

carries_result!(CalibrationResult, calibration_result =>
    CancelResponse,
    CalibrateGyroResponse,
    CalibrateAccelerometerResponse,
    CalibrateMagnetometerResponse,
    CalibrateLevelHorizonResponse,
    CalibrateGimbalAccelerometerResponse,
);
