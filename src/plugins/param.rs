use tonic::Status;

use super::PluginContext;
use crate::error::CallError;
use crate::proto::param as wire;
use crate::subscription::SubscriptionOptions;
use crate::transport::{GrpcTransport, Transport};

pub use crate::proto::param::ParamResultCode;

pub type ParamError = CallError<ParamResultCode>;

/// Every parameter the autopilot exposes, by type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllParams {
    pub int_params: Vec<(String, i32)>,
    pub float_params: Vec<(String, f32)>,
}

impl AllParams {
    pub fn int(&self, name: &str) -> Option<i32> {
        self.int_params
            .iter()
            .find_map(|(param, value)| (param == name).then_some(*value))
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.float_params
            .iter()
            .find_map(|(param, value)| (param == name).then_some(*value))
    }
}

impl From<wire::AllParams> for AllParams {
    fn from(params: wire::AllParams) -> Self {
        Self {
            int_params: params
                .int_params
                .into_iter()
                .map(|param| (param.name, param.value))
                .collect(),
            float_params: params
                .float_params
                .into_iter()
                .map(|param| (param.name, param.value))
                .collect(),
        }
    }
}

/// Raw autopilot parameters.
#[derive(Debug)]
pub struct Param<Tr = GrpcTransport> {
    ctx: PluginContext<Tr>,
}

impl<Tr: Transport> Param<Tr> {
    pub fn new(transport: Tr, options: SubscriptionOptions) -> Self {
        Self {
            ctx: PluginContext::new(transport, options),
        }
    }

    pub async fn get_param_int(&self, name: &str) -> Result<i32, ParamError> {
        let request = wire::GetParamIntRequest {
            name: name.to_string(),
        };
        let response: wire::GetParamIntResponse =
            self.ctx.call(wire::GET_PARAM_INT, request).await?;
        Ok(response.value)
    }

    pub async fn set_param_int(&self, name: &str, value: i32) -> Result<(), ParamError> {
        let request = wire::SetParamIntRequest {
            name: name.to_string(),
            value,
        };
        let _: wire::SetParamIntResponse = self.ctx.call(wire::SET_PARAM_INT, request).await?;
        Ok(())
    }

    pub async fn get_param_float(&self, name: &str) -> Result<f32, ParamError> {
        let request = wire::GetParamFloatRequest {
            name: name.to_string(),
        };
        let response: wire::GetParamFloatResponse =
            self.ctx.call(wire::GET_PARAM_FLOAT, request).await?;
        Ok(response.value)
    }

    pub async fn set_param_float(&self, name: &str, value: f32) -> Result<(), ParamError> {
        let request = wire::SetParamFloatRequest {
            name: name.to_string(),
            value,
        };
        let _: wire::SetParamFloatResponse =
            self.ctx.call(wire::SET_PARAM_FLOAT, request).await?;
        Ok(())
    }

    /// The response carries no result code, so only the transport can fail this.
    pub async fn get_all_params(&self) -> Result<AllParams, Status> {
        let response: wire::GetAllParamsResponse = self
            .ctx
            .call_plain(wire::GET_ALL_PARAMS, wire::GetAllParamsRequest {})
            .await?;
        Ok(response.params.map(AllParams::from).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    fn result(code: ParamResultCode, message: &str) -> Option<wire::ParamResult> {
        Some(wire::ParamResult {
            result: code.into(),
            result_str: message.to_string(),
        })
    }

    #[tokio::test]
    async fn test_get_param_int() {
        let transport = MockTransport::new();
        transport.push_unary(
            wire::GET_PARAM_INT,
            Ok(wire::GetParamIntResponse {
                param_result: result(ParamResultCode::Success, ""),
                value: 2,
            }),
        );
        let param = Param::new(transport.clone(), SubscriptionOptions::default());

        assert_eq!(param.get_param_int("SYS_AUTOSTART").await.unwrap(), 2);
        let requests: Vec<wire::GetParamIntRequest> = transport.requests(wire::GET_PARAM_INT);
        assert_eq!(requests[0].name, "SYS_AUTOSTART");
    }

    #[tokio::test]
    async fn test_wrong_type_is_rejected() {
        let transport = MockTransport::new();
        transport.push_unary(
            wire::GET_PARAM_FLOAT,
            Ok(wire::GetParamFloatResponse {
                param_result: result(ParamResultCode::WrongType, "param is int32"),
                value: 0.0,
            }),
        );
        let param = Param::new(transport, SubscriptionOptions::default());

        let error = param.get_param_float("SYS_AUTOSTART").await.unwrap_err();
        assert_eq!(error.code(), Some(ParamResultCode::WrongType));
    }

    #[tokio::test]
    async fn test_setters() {
        let transport = MockTransport::new();
        for method in [wire::SET_PARAM_INT, wire::SET_PARAM_FLOAT] {
            transport.push_unary(
                method,
                Ok(wire::SetParamIntResponse {
                    param_result: result(ParamResultCode::Success, ""),
                }),
            );
        }
        let param = Param::new(transport.clone(), SubscriptionOptions::default());

        param.set_param_int("COM_RC_IN_MODE", 1).await.unwrap();
        param.set_param_float("MPC_XY_VEL_MAX", 12.0).await.unwrap();

        let floats: Vec<wire::SetParamFloatRequest> = transport.requests(wire::SET_PARAM_FLOAT);
        assert_eq!(floats[0].name, "MPC_XY_VEL_MAX");
        assert_eq!(floats[0].value, 12.0);
    }

    #[tokio::test]
    async fn test_get_all_params() {
        let transport = MockTransport::new();
        transport.push_unary(
            wire::GET_ALL_PARAMS,
            Ok(wire::GetAllParamsResponse {
                params: Some(wire::AllParams {
                    int_params: vec![wire::IntParam {
                        name: "SYS_AUTOSTART".to_string(),
                        value: 4001,
                    }],
                    float_params: vec![wire::FloatParam {
                        name: "MIS_TAKEOFF_ALT".to_string(),
                        value: 2.5,
                    }],
                }),
            }),
        );
        let param = Param::new(transport, SubscriptionOptions::default());

        let params = param.get_all_params().await.unwrap();
        assert_eq!(params.int("SYS_AUTOSTART"), Some(4001));
        assert_eq!(params.float("MIS_TAKEOFF_ALT"), Some(2.5));
        assert_eq!(params.int("MIS_TAKEOFF_ALT"), None);
    }
}
