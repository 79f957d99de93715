//! Wire messages and client stubs of the `mavsdk.rpc.*` services.
//!
//! Generated at build time from the definitions under `proto/`. Each module adds the full gRPC
//! method paths of its service, which is how [`Transport`](crate::transport::Transport)
//! addresses calls, and the result-code plumbing used by [`unary`](crate::unary).

/// Implement [`ResultCode`](crate::unary::ResultCode) for a wire enum and
/// [`WireResult`](crate::unary::WireResult) for the `<Domain>Result` message embedding it.
macro_rules! result_code {
    ($result:ident, $code:ident) => {
        impl $crate::unary::ResultCode for $code {
            fn is_success(self) -> bool {
                self == $code::Success
            }
        }

        impl $crate::unary::WireResult for $result {
            type Code = $code;

            fn code(&self) -> $code {
                self.result()
            }

            fn message(&self) -> &str {
                &self.result_str
            }
        }
    };
}

/// Implement [`CarriesResult`](crate::unary::CarriesResult) for responses embedding `$result`
/// in field `$field`.
macro_rules! carries_result {
    ($result:ty, $field:ident => $($response:ty),+ $(,)?) => {
        $(
            impl $crate::unary::CarriesResult for $response {
                type Result = $result;

                fn wire_result(&self) -> Option<&$result> {
                    self.$field.as_ref()
                }
            }
        )+
    };
}

pub mod action;
pub mod calibration;
pub mod camera;
pub mod core;
pub mod mission;
pub mod param;
pub mod shell;
pub mod telemetry;
