include!(concat!(env!("OUT_DIR"), "/mavsdk.rpc.mission.rs"));

pub use mission_result::Result as MissionResultCode;
pub use mission_item::CameraAction;

pub const UPLOAD_MISSION: &str = "/mavsdk.rpc.mission.MissionService/UploadMission";
pub const DOWNLOAD_MISSION: &str = "/mavsdk.rpc.mission.MissionService/DownloadMission";
pub const START_MISSION: &str = "/mavsdk.rpc.mission.MissionService/StartMission";
pub const PAUSE_MISSION: &str = "/mavsdk.rpc.mission.MissionService/PauseMission";
pub const CLEAR_MISSION: &str = "/mavsdk.rpc.mission.MissionService/ClearMission";
pub const SET_CURRENT_MISSION_ITEM: &str =
    "/mavsdk.rpc.mission.MissionService/SetCurrentMissionItem";
pub const IS_MISSION_FINISHED: &str = "/mavsdk.rpc.mission.MissionService/IsMissionFinished";
pub const SET_RETURN_TO_LAUNCH_AFTER_MISSION: &str =
    "/mavsdk.rpc.mission.MissionService/SetReturnToLaunchAfterMission";
pub const SUBSCRIBE_MISSION_PROGRESS: &str =
    "/mavsdk.rpc.mission.MissionService/SubscribeMissionProgress";

result_code!(MissionResult, MissionResultCode);

carries_result!(MissionResult, mission_result =>
    UploadMissionResponse,
    DownloadMissionResponse,
    StartMissionResponse,
    PauseMissionResponse,
    ClearMissionResponse,
    SetCurrentMissionItemResponse,
    IsMissionFinishedResponse,
    SetReturnToLaunchAfterMissionResponse,
);
