//! Sensor calibration.
//!
//! Unlike telemetry topics, each calibration is its own stream: starting one sends the command
//! to the vehicle, and the stream reports progress until the calibration succeeds or fails.

use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::debug;

use super::PluginContext;
use crate::error::CallError;
use crate::proto::calibration as wire;
use crate::subscription::SubscriptionOptions;
use crate::transport::{GrpcTransport, RpcStream, Transport};
use crate::unary::{self, CarriesResult, WireResult};

pub use crate::proto::calibration::CalibrationResultCode;

pub type CalibrationError = CallError<CalibrationResultCode>;

/// Progress of a running calibration.
pub type ProgressStream = BoxStream<'static, Result<Progress, CalibrationError>>;

/// One progress report. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    /// `0.0..=1.0`.
    pub progress: Option<f32>,
    /// Instruction for the operator, e.g. which side to turn the vehicle to.
    pub status_text: Option<String>,
}

impl From<wire::ProgressData> for Progress {
    fn from(data: wire::ProgressData) -> Self {
        Self {
            progress: data.has_progress.then_some(data.progress),
            status_text: data.has_status_text.then_some(data.status_text),
        }
    }
}

#[derive(Debug)]
pub struct Calibration<Tr = GrpcTransport> {
    ctx: PluginContext<Tr>,
}

impl<Tr: Transport> Calibration<Tr> {
    pub fn new(transport: Tr, options: SubscriptionOptions) -> Self {
        Self {
            ctx: PluginContext::new(transport, options),
        }
    }

    pub fn calibrate_gyro(&self) -> ProgressStream {
        self.run(wire::CALIBRATE_GYRO)
    }

    pub fn calibrate_accelerometer(&self) -> ProgressStream {
        self.run(wire::CALIBRATE_ACCELEROMETER)
    }

    pub fn calibrate_magnetometer(&self) -> ProgressStream {
        self.run(wire::CALIBRATE_MAGNETOMETER)
    }

    pub fn calibrate_level_horizon(&self) -> ProgressStream {
        self.run(wire::CALIBRATE_LEVEL_HORIZON)
    }

    pub fn calibrate_gimbal_accelerometer(&self) -> ProgressStream {
        self.run(wire::CALIBRATE_GIMBAL_ACCELEROMETER)
    }

    /// Abort whichever calibration is running.
    pub async fn cancel(&self) -> Result<(), CalibrationError> {
        let _: wire::CancelResponse = self.ctx.call(wire::CANCEL, wire::CancelRequest {}).await?;
        Ok(())
    }

    /// Nothing is sent until the returned stream is first polled.
    fn run(&self, method: &'static str) -> ProgressStream {
        let transport = self.ctx.transport().clone();

        async_stream::stream! {
            let opened: Result<RpcStream<wire::CalibrateResponse>, _> =
                transport.server_streaming(method, wire::SubscribeCalibrateRequest {}).await;
            let mut responses = match opened {
                Ok(responses) => responses,
                Err(status) => {
                    yield Err(CallError::Transport(status));
                    return;
                }
            };

            while let Some(response) = responses.next().await {
                let response = match response {
                    Ok(response) => response,
                    Err(status) => {
                        yield Err(CallError::Transport(status));
                        return;
                    }
                };

                let code = response.wire_result().map(|result| result.code());
                if code == Some(CalibrationResultCode::Next) {
                    yield Ok(response.progress_data.map(Progress::from).unwrap_or_default());
                    continue;
                }

                debug!(method, ?code, "Calibration finished");
                if let Err(error) = unary::check(response.wire_result()) {
                    yield Err(error);
                }
                return;
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use tonic::Status;

    use super::*;
    use crate::transport::mock::MockTransport;

    fn report(code: CalibrationResultCode, progress: Option<f32>) -> wire::CalibrateResponse {
        wire::CalibrateResponse {
            calibration_result: Some(wire::CalibrationResult {
                result: code.into(),
                result_str: String::new(),
            }),
            progress_data: Some(wire::ProgressData {
                has_progress: progress.is_some(),
                progress: progress.unwrap_or_default(),
                has_status_text: false,
                status_text: String::new(),
            }),
        }
    }

    #[tokio::test]
    async fn test_progress_until_success() {
        let transport = MockTransport::new();
        let feed = transport.feed::<wire::CalibrateResponse>(wire::CALIBRATE_GYRO);
        feed.send(report(CalibrationResultCode::Next, Some(0.25)));
        feed.send(report(CalibrationResultCode::Next, Some(0.75)));
        feed.send(report(CalibrationResultCode::Success, None));
        feed.send(report(CalibrationResultCode::Next, Some(0.99)));
        let calibration = Calibration::new(transport, SubscriptionOptions::default());

        let steps: Vec<_> = calibration.calibrate_gyro().collect().await;
        let progress: Vec<Option<f32>> = steps
            .into_iter()
            .map(|step| step.unwrap().progress)
            .collect();
        assert_eq!(progress, vec![Some(0.25), Some(0.75)]);
    }

    #[tokio::test]
    async fn test_status_text_is_forwarded() {
        let transport = MockTransport::new();
        let feed = transport.feed::<wire::CalibrateResponse>(wire::CALIBRATE_MAGNETOMETER);
        feed.send(wire::CalibrateResponse {
            calibration_result: Some(wire::CalibrationResult {
                result: CalibrationResultCode::Next.into(),
                result_str: String::new(),
            }),
            progress_data: Some(wire::ProgressData {
                has_progress: false,
                progress: 0.0,
                has_status_text: true,
                status_text: "Rotate vehicle nose down".to_string(),
            }),
        });
        let calibration = Calibration::new(transport, SubscriptionOptions::default());

        let mut steps = calibration.calibrate_magnetometer();
        let step = steps.next().await.unwrap().unwrap();
        assert_eq!(step.progress, None);
        assert_eq!(step.status_text.as_deref(), Some("Rotate vehicle nose down"));
    }

    #[tokio::test]
    async fn test_failure_code_ends_stream_with_rejection() {
        let transport = MockTransport::new();
        let feed = transport.feed::<wire::CalibrateResponse>(wire::CALIBRATE_ACCELEROMETER);
        feed.send(report(CalibrationResultCode::Next, Some(0.1)));
        feed.send(report(CalibrationResultCode::FailedArmed, None));
        let calibration = Calibration::new(transport, SubscriptionOptions::default());

        let mut steps = calibration.calibrate_accelerometer();
        assert!(steps.next().await.unwrap().is_ok());
        let error = steps.next().await.unwrap().unwrap_err();
        assert_eq!(error.code(), Some(CalibrationResultCode::FailedArmed));
        assert!(steps.next().await.is_none());
    }

    #[tokio::test]
    async fn test_open_failure_is_transport_error() {
        let transport = MockTransport::new();
        transport.refuse_stream(wire::CALIBRATE_LEVEL_HORIZON, Status::unavailable("down"));
        let calibration = Calibration::new(transport, SubscriptionOptions::default());

        let mut steps = calibration.calibrate_level_horizon();
        assert!(steps.next().await.unwrap().unwrap_err().is_transport());
        assert!(steps.next().await.is_none());
    }

    #[tokio::test]
    async fn test_each_call_opens_its_own_stream() {
        let transport = MockTransport::new();
        transport
            .feed::<wire::CalibrateResponse>(wire::CALIBRATE_GIMBAL_ACCELEROMETER)
            .complete();
        transport
            .feed::<wire::CalibrateResponse>(wire::CALIBRATE_GIMBAL_ACCELEROMETER)
            .complete();
        let calibration = Calibration::new(transport.clone(), SubscriptionOptions::default());

        let unpolled = calibration.calibrate_gimbal_accelerometer();
        assert_eq!(transport.stream_opens(wire::CALIBRATE_GIMBAL_ACCELEROMETER), 0);
        drop(unpolled);

        for _ in 0..2 {
            let steps: Vec<_> = calibration.calibrate_gimbal_accelerometer().collect().await;
            assert!(steps.is_empty());
        }
        assert_eq!(transport.stream_opens(wire::CALIBRATE_GIMBAL_ACCELEROMETER), 2);
    }

    #[tokio::test]
    async fn test_cancel() {
        let transport = MockTransport::new();
        transport.push_unary(
            wire::CANCEL,
            Ok(wire::CancelResponse {
                calibration_result: Some(wire::CalibrationResult {
                    result: CalibrationResultCode::Success.into(),
                    result_str: String::new(),
                }),
            }),
        );
        let calibration = Calibration::new(transport.clone(), SubscriptionOptions::default());

        calibration.cancel().await.unwrap();
        assert_eq!(transport.unary_calls(wire::CANCEL), 1);
    }
}
