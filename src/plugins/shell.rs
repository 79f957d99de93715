use super::PluginContext;
use crate::error::CallError;
use crate::proto::shell as wire;
use crate::subscription::{SharedSubscription, SubscriptionOptions, TopicSlot};
use crate::transport::{GrpcTransport, Transport};

pub use crate::proto::shell::ShellResultCode;

pub type ShellError = CallError<ShellResultCode>;

/// The autopilot's interactive shell.
///
/// Commands go out through [`send`](Shell::send); everything the shell prints arrives on
/// [`receive`](Shell::receive).
#[derive(Debug)]
pub struct Shell<Tr = GrpcTransport> {
    ctx: PluginContext<Tr>,
    receive: TopicSlot<String>,
}

impl<Tr: Transport> Shell<Tr> {
    pub fn new(transport: Tr, options: SubscriptionOptions) -> Self {
        Self {
            ctx: PluginContext::new(transport, options),
            receive: TopicSlot::default(),
        }
    }

    pub async fn send(&self, command: &str) -> Result<(), ShellError> {
        let request = wire::SendRequest {
            command: command.to_string(),
        };
        let _: wire::SendResponse = self.ctx.call(wire::SEND, request).await?;
        Ok(())
    }

    pub fn receive(&self) -> SharedSubscription<String> {
        self.ctx.topic(
            &self.receive,
            wire::RECEIVE,
            wire::SubscribeReceiveRequest {},
            |response: wire::ReceiveResponse| Some(response.data),
        )
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::transport::mock::MockTransport;

    #[tokio::test]
    async fn test_command_and_output() {
        let transport = MockTransport::new();
        let output = transport.feed::<wire::ReceiveResponse>(wire::RECEIVE);
        transport.push_unary(
            wire::SEND,
            Ok(wire::SendResponse {
                shell_result: Some(wire::ShellResult {
                    result: ShellResultCode::Success.into(),
                    result_str: String::new(),
                }),
            }),
        );
        let shell = Shell::new(transport.clone(), SubscriptionOptions::default());

        let mut lines = shell.receive().attach();
        shell.send("ver all").await.unwrap();
        output.send(wire::ReceiveResponse {
            data: "HW arch: PX4_SITL\n".to_string(),
        });

        assert_eq!(lines.next().await.unwrap().unwrap(), "HW arch: PX4_SITL\n");
        let sent: Vec<wire::SendRequest> = transport.requests(wire::SEND);
        assert_eq!(sent[0].command, "ver all");
    }

    #[tokio::test]
    async fn test_missing_result_is_unknown_rejection() {
        let transport = MockTransport::new();
        transport.push_unary(wire::SEND, Ok(wire::SendResponse { shell_result: None }));
        let shell = Shell::new(transport, SubscriptionOptions::default());

        let error = shell.send("reboot").await.unwrap_err();
        assert_eq!(error.code(), Some(ShellResultCode::Unknown));
    }
}
