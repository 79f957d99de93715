//! Request/response calls whose responses embed a `<Domain>Result { result, result_str }` block.
//!
//! The wire enums implement [`ResultCode`], the result blocks implement [`WireResult`] and the
//! response messages carrying them implement [`CarriesResult`]. [`call`] ties the three together:
//! a success code resolves to the response, anything else becomes [`CallError::Rejected`].

use std::fmt;

use prost::Message;

use crate::error::CallError;
use crate::transport::Transport;

/// A plugin's enumerated outcome. `Default` is the wire's zero value, `Unknown`.
pub trait ResultCode: Copy + fmt::Debug + Default + PartialEq + Send + Sync + 'static {
    fn is_success(self) -> bool;
}

/// The `<Domain>Result` message embedded in responses.
pub trait WireResult {
    type Code: ResultCode;

    fn code(&self) -> Self::Code;

    fn message(&self) -> &str;
}

/// A response message that embeds a [`WireResult`].
pub trait CarriesResult {
    type Result: WireResult;

    fn wire_result(&self) -> Option<&Self::Result>;
}

/// The result code type embedded in response `R`.
pub type CodeOf<R> = <<R as CarriesResult>::Result as WireResult>::Code;

/// Map a result block onto success or a typed rejection.
///
/// A missing block is a rejection with the `Unknown` code.
pub fn check<R: WireResult>(result: Option<&R>) -> Result<(), CallError<R::Code>> {
    match result {
        Some(result) if result.code().is_success() => Ok(()),
        Some(result) => Err(CallError::Rejected {
            code: result.code(),
            message: result.message().to_string(),
        }),
        None => Err(CallError::Rejected {
            code: R::Code::default(),
            message: "response carried no result".to_string(),
        }),
    }
}

/// Invoke `method` and check the embedded result code.
pub async fn call<T, Req, Resp>(
    transport: &T,
    method: &'static str,
    request: Req,
) -> Result<Resp, CallError<CodeOf<Resp>>>
where
    T: Transport,
    Req: Message + Send + 'static,
    Resp: CarriesResult + Message + Default + Send + 'static,
{
    let response: Resp = transport.unary(method, request).await?;
    check(response.wire_result())?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::action::{ActionResult, ActionResultCode, ArmRequest, ArmResponse, ARM};
    use crate::transport::mock::MockTransport;
    use tonic::Status;

    fn arm_response(code: ActionResultCode, message: &str) -> ArmResponse {
        ArmResponse {
            action_result: Some(ActionResult {
                result: code.into(),
                result_str: message.to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_success_resolves_to_response() {
        let transport = MockTransport::new();
        transport.push_unary(ARM, Ok(arm_response(ActionResultCode::Success, "")));

        let response: ArmResponse = call(&transport, ARM, ArmRequest {}).await.unwrap();
        assert!(response.action_result.is_some());
        assert_eq!(transport.unary_calls(ARM), 1);
    }

    #[tokio::test]
    async fn test_every_failure_code_is_rejected() {
        let failures = [
            ActionResultCode::Unknown,
            ActionResultCode::NoSystem,
            ActionResultCode::ConnectionError,
            ActionResultCode::Busy,
            ActionResultCode::CommandDenied,
            ActionResultCode::CommandDeniedLandedStateUnknown,
            ActionResultCode::CommandDeniedNotLanded,
            ActionResultCode::Timeout,
            ActionResultCode::VtolTransitionSupportUnknown,
            ActionResultCode::NoVtolTransitionSupport,
            ActionResultCode::ParameterError,
            ActionResultCode::Unsupported,
            ActionResultCode::Failed,
        ];

        let transport = MockTransport::new();
        for code in failures {
            transport.push_unary(ARM, Ok(arm_response(code, "nope")));
            let err = call::<_, _, ArmResponse>(&transport, ARM, ArmRequest {})
                .await
                .unwrap_err();
            assert_eq!(err.code(), Some(code));
            assert!(matches!(err, CallError::Rejected { ref message, .. } if message == "nope"));
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_distinct_from_rejection() {
        let transport = MockTransport::new();
        transport.push_unary::<ArmResponse>(ARM, Err(Status::unavailable("connection refused")));

        let err = call::<_, _, ArmResponse>(&transport, ARM, ArmRequest {})
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.code(), None);
    }

    #[tokio::test]
    async fn test_missing_result_is_unknown_rejection() {
        let transport = MockTransport::new();
        transport.push_unary(ARM, Ok(ArmResponse { action_result: None }));

        let err = call::<_, _, ArmResponse>(&transport, ARM, ArmRequest {})
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ActionResultCode::Unknown));
    }

    #[test]
    fn test_out_of_range_code_reads_as_unknown() {
        let result = ActionResult {
            result: 9999,
            result_str: String::new(),
        };
        assert_eq!(result.code(), ActionResultCode::Unknown);
        assert!(check(Some(&result)).is_err());
    }
}
