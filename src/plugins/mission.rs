use super::PluginContext;
use crate::error::CallError;
use crate::proto::mission as wire;
use crate::subscription::{SharedSubscription, SubscriptionOptions, TopicSlot};
use crate::transport::{GrpcTransport, Transport};

pub use crate::proto::mission::{CameraAction, MissionResultCode};

pub type MissionError = CallError<MissionResultCode>;

/// One waypoint of a mission.
///
/// `NaN` in the gimbal and camera interval fields leaves those untouched at the waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionItem {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub relative_altitude_m: f32,
    pub speed_m_s: f32,
    /// Fly past instead of stopping at the waypoint.
    pub is_fly_through: bool,
    pub gimbal_pitch_deg: f32,
    pub gimbal_yaw_deg: f32,
    pub camera_action: CameraAction,
    pub loiter_time_s: f32,
    pub camera_photo_interval_s: f64,
}

impl From<wire::MissionItem> for MissionItem {
    fn from(item: wire::MissionItem) -> Self {
        Self {
            latitude_deg: item.latitude_deg,
            longitude_deg: item.longitude_deg,
            relative_altitude_m: item.relative_altitude_m,
            speed_m_s: item.speed_m_s,
            is_fly_through: item.is_fly_through,
            gimbal_pitch_deg: item.gimbal_pitch_deg,
            gimbal_yaw_deg: item.gimbal_yaw_deg,
            camera_action: item.camera_action(),
            loiter_time_s: item.loiter_time_s,
            camera_photo_interval_s: item.camera_photo_interval_s,
        }
    }
}

impl From<&MissionItem> for wire::MissionItem {
    fn from(item: &MissionItem) -> Self {
        Self {
            latitude_deg: item.latitude_deg,
            longitude_deg: item.longitude_deg,
            relative_altitude_m: item.relative_altitude_m,
            speed_m_s: item.speed_m_s,
            is_fly_through: item.is_fly_through,
            gimbal_pitch_deg: item.gimbal_pitch_deg,
            gimbal_yaw_deg: item.gimbal_yaw_deg,
            camera_action: item.camera_action.into(),
            loiter_time_s: item.loiter_time_s,
            camera_photo_interval_s: item.camera_photo_interval_s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionProgress {
    /// Index of the item being flown.
    pub current: i32,
    pub total: i32,
}

#[derive(Debug)]
pub struct Mission<Tr = GrpcTransport> {
    ctx: PluginContext<Tr>,
    mission_progress: TopicSlot<MissionProgress>,
}

impl<Tr: Transport> Mission<Tr> {
    pub fn new(transport: Tr, options: SubscriptionOptions) -> Self {
        Self {
            ctx: PluginContext::new(transport, options),
            mission_progress: TopicSlot::default(),
        }
    }

    /// Replace the mission stored on the vehicle.
    pub async fn upload_mission(&self, items: &[MissionItem]) -> Result<(), MissionError> {
        let request = wire::UploadMissionRequest {
            mission_plan: Some(wire::MissionPlan {
                mission_items: items.iter().map(wire::MissionItem::from).collect(),
            }),
        };
        let _: wire::UploadMissionResponse = self.ctx.call(wire::UPLOAD_MISSION, request).await?;
        Ok(())
    }

    pub async fn download_mission(&self) -> Result<Vec<MissionItem>, MissionError> {
        let response: wire::DownloadMissionResponse = self
            .ctx
            .call(wire::DOWNLOAD_MISSION, wire::DownloadMissionRequest {})
            .await?;
        Ok(response
            .mission_plan
            .map(|plan| plan.mission_items.into_iter().map(MissionItem::from).collect())
            .unwrap_or_default())
    }

    pub async fn start_mission(&self) -> Result<(), MissionError> {
        let _: wire::StartMissionResponse = self
            .ctx
            .call(wire::START_MISSION, wire::StartMissionRequest {})
            .await?;
        Ok(())
    }

    pub async fn pause_mission(&self) -> Result<(), MissionError> {
        let _: wire::PauseMissionResponse = self
            .ctx
            .call(wire::PAUSE_MISSION, wire::PauseMissionRequest {})
            .await?;
        Ok(())
    }

    pub async fn clear_mission(&self) -> Result<(), MissionError> {
        let _: wire::ClearMissionResponse = self
            .ctx
            .call(wire::CLEAR_MISSION, wire::ClearMissionRequest {})
            .await?;
        Ok(())
    }

    /// Jump to item `index`; takes effect immediately while a mission is running.
    pub async fn set_current_mission_item(&self, index: i32) -> Result<(), MissionError> {
        let request = wire::SetCurrentMissionItemRequest { index };
        let _: wire::SetCurrentMissionItemResponse =
            self.ctx.call(wire::SET_CURRENT_MISSION_ITEM, request).await?;
        Ok(())
    }

    pub async fn is_mission_finished(&self) -> Result<bool, MissionError> {
        let response: wire::IsMissionFinishedResponse = self
            .ctx
            .call(wire::IS_MISSION_FINISHED, wire::IsMissionFinishedRequest {})
            .await?;
        Ok(response.is_finished)
    }

    pub async fn set_return_to_launch_after_mission(&self, enable: bool) -> Result<(), MissionError> {
        let request = wire::SetReturnToLaunchAfterMissionRequest { enable };
        let _: wire::SetReturnToLaunchAfterMissionResponse = self
            .ctx
            .call(wire::SET_RETURN_TO_LAUNCH_AFTER_MISSION, request)
            .await?;
        Ok(())
    }

    pub fn mission_progress(&self) -> SharedSubscription<MissionProgress> {
        self.ctx.topic(
            &self.mission_progress,
            wire::SUBSCRIBE_MISSION_PROGRESS,
            wire::SubscribeMissionProgressRequest {},
            |response: wire::MissionProgressResponse| {
                response.mission_progress.map(|progress| MissionProgress {
                    current: progress.current,
                    total: progress.total,
                })
            },
        )
    }
}
