include!(concat!(env!("OUT_DIR"), "/mavsdk.rpc.shell.rs"));

pub use shell_result::Result as ShellResultCode;

pub const SEND: &str = "/mavsdk.rpc.shell.ShellService/Send";
pub const RECEIVE: &str = "/mavsdk.rpc.shell.ShellService/SubscribeReceive";

result_code!(ShellResult, ShellResultCode);

carries_result!(ShellResult, shell_result => SendResponse);
