use std::time::Duration;

use super::PluginContext;
use crate::error::CallError;
use crate::proto::camera as wire;
use crate::subscription::{SharedSubscription, SubscriptionOptions, TopicSlot};
use crate::transport::{GrpcTransport, Transport};

pub use crate::proto::camera::{CameraResultCode, Mode, StorageStatus};

pub type CameraError = CallError<CameraResultCode>;

/// A photo the camera has taken, successfully or not.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureInfo {
    /// Where the vehicle was when the photo was taken, if the camera knew.
    pub position: Option<CapturePosition>,
    pub time_utc_us: u64,
    pub is_success: bool,
    /// Zero-based count of photos taken since the camera started.
    pub index: i32,
    pub file_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapturePosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub absolute_altitude_m: f32,
    pub relative_altitude_m: f32,
}

impl From<wire::CaptureInfo> for CaptureInfo {
    fn from(info: wire::CaptureInfo) -> Self {
        Self {
            position: info.position.map(|position| CapturePosition {
                latitude_deg: position.latitude_deg,
                longitude_deg: position.longitude_deg,
                absolute_altitude_m: position.absolute_altitude_m,
                relative_altitude_m: position.relative_altitude_m,
            }),
            time_utc_us: info.time_utc_us,
            is_success: info.is_success,
            index: info.index,
            file_url: info.file_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraStatus {
    pub video_on: bool,
    pub photo_interval_on: bool,
    pub used_storage_mib: f32,
    pub available_storage_mib: f32,
    pub total_storage_mib: f32,
    pub recording_time: Duration,
    pub storage_status: StorageStatus,
}

impl From<wire::Status> for CameraStatus {
    fn from(status: wire::Status) -> Self {
        Self {
            video_on: status.video_on,
            photo_interval_on: status.photo_interval_on,
            used_storage_mib: status.used_storage_mib,
            available_storage_mib: status.available_storage_mib,
            total_storage_mib: status.total_storage_mib,
            recording_time: Duration::try_from_secs_f32(status.recording_time_s)
                .unwrap_or_default(),
            storage_status: status.storage_status(),
        }
    }
}

#[derive(Debug)]
pub struct Camera<Tr = GrpcTransport> {
    ctx: PluginContext<Tr>,
    mode: TopicSlot<Mode>,
    capture_info: TopicSlot<CaptureInfo>,
    status: TopicSlot<CameraStatus>,
}

impl<Tr: Transport> Camera<Tr> {
    pub fn new(transport: Tr, options: SubscriptionOptions) -> Self {
        Self {
            ctx: PluginContext::new(transport, options),
            mode: TopicSlot::default(),
            capture_info: TopicSlot::default(),
            status: TopicSlot::default(),
        }
    }

    pub async fn take_photo(&self) -> Result<(), CameraError> {
        let _: wire::TakePhotoResponse =
            self.ctx.call(wire::TAKE_PHOTO, wire::TakePhotoRequest {}).await?;
        Ok(())
    }

    /// Take a photo every `interval` until [`stop_photo_interval`](Self::stop_photo_interval).
    pub async fn start_photo_interval(&self, interval: Duration) -> Result<(), CameraError> {
        let request = wire::StartPhotoIntervalRequest {
            interval_s: interval.as_secs_f32(),
        };
        let _: wire::StartPhotoIntervalResponse =
            self.ctx.call(wire::START_PHOTO_INTERVAL, request).await?;
        Ok(())
    }

    pub async fn stop_photo_interval(&self) -> Result<(), CameraError> {
        let _: wire::StopPhotoIntervalResponse = self
            .ctx
            .call(wire::STOP_PHOTO_INTERVAL, wire::StopPhotoIntervalRequest {})
            .await?;
        Ok(())
    }

    pub async fn start_video(&self) -> Result<(), CameraError> {
        let _: wire::StartVideoResponse =
            self.ctx.call(wire::START_VIDEO, wire::StartVideoRequest {}).await?;
        Ok(())
    }

    pub async fn stop_video(&self) -> Result<(), CameraError> {
        let _: wire::StopVideoResponse =
            self.ctx.call(wire::STOP_VIDEO, wire::StopVideoRequest {}).await?;
        Ok(())
    }

    pub async fn set_mode(&self, mode: Mode) -> Result<(), CameraError> {
        let request = wire::SetModeRequest { mode: mode.into() };
        let _: wire::SetModeResponse = self.ctx.call(wire::SET_MODE, request).await?;
        Ok(())
    }

    /// Erase the camera's storage.
    pub async fn format_storage(&self) -> Result<(), CameraError> {
        let _: wire::FormatStorageResponse = self
            .ctx
            .call(wire::FORMAT_STORAGE, wire::FormatStorageRequest {})
            .await?;
        Ok(())
    }

    pub fn mode(&self) -> SharedSubscription<Mode> {
        self.ctx.topic(
            &self.mode,
            wire::SUBSCRIBE_MODE,
            wire::SubscribeModeRequest {},
            |response: wire::ModeResponse| Some(response.mode()),
        )
    }

    pub fn capture_info(&self) -> SharedSubscription<CaptureInfo> {
        self.ctx.topic(
            &self.capture_info,
            wire::SUBSCRIBE_CAPTURE_INFO,
            wire::SubscribeCaptureInfoRequest {},
            |response: wire::CaptureInfoResponse| response.capture_info.map(CaptureInfo::from),
        )
    }

    pub fn status(&self) -> SharedSubscription<CameraStatus> {
        self.ctx.topic(
            &self.status,
            wire::SUBSCRIBE_STATUS,
            wire::SubscribeStatusRequest {},
            |response: wire::StatusResponse| response.camera_status.map(CameraStatus::from),
        )
    }
}
