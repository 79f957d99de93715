use std::time::Duration;

use bon::Builder;

/// Tuning for the gRPC channel.
#[derive(Debug, Clone, Builder)]
pub struct TransportConfig {
    /// Timeout for establishing the TCP connection.
    #[builder(default = Duration::from_secs(5))]
    pub connect_timeout: Duration,

    /// Deadline applied to every request. Streams are long lived, so leave this unset unless
    /// every call on the channel is unary.
    pub request_timeout: Option<Duration>,

    /// TCP keepalive interval for the underlying connection.
    pub tcp_keepalive: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
