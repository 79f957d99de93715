use std::fmt::Display;
use std::sync::Arc;

use url::Url;

pub const DEFAULT_ADDRESS: &str = "localhost";
pub const DEFAULT_PORT: u16 = 50051;

/// Errors raised while turning an address into a connectable [`Endpoint`].
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// The address could not be parsed as a URL.
    #[error("invalid endpoint address '{address}'")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// The address parsed but carried no host.
    #[error("endpoint address '{0}' has no host")]
    MissingHost(String),

    /// Only plaintext gRPC is supported.
    #[error("unsupported endpoint scheme '{0}'")]
    UnsupportedScheme(String),

    /// The channel rejected the endpoint URI.
    #[error("failed to configure gRPC channel")]
    Channel(#[from] tonic::transport::Error),
}

/// The backend process to connect to, identified by host and TCP port.
///
/// Cheap to clone; the host is shared.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Endpoint {
    host: Arc<str>,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<Arc<str>>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse `host:port`, `grpc://host[:port]` or `http://host[:port]`.
    ///
    /// A missing port falls back to [`DEFAULT_PORT`] whatever the scheme.
    pub fn parse(address: &str) -> Result<Self, EndpointError> {
        let (scheme, rest) = address.split_once("://").unwrap_or(("grpc", address));
        let scheme = scheme.to_ascii_lowercase();
        if scheme != "grpc" && scheme != "http" {
            return Err(EndpointError::UnsupportedScheme(scheme));
        }

        // Always parsed as `grpc`, which has no well-known port for the url crate to fill in.
        let url = Url::parse(&format!("grpc://{rest}")).map_err(|source| {
            EndpointError::InvalidAddress {
                address: address.to_string(),
                source,
            }
        })?;

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| EndpointError::MissingHost(address.to_string()))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let port = url.port().unwrap_or(DEFAULT_PORT);

        Ok(Self::new(host, port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The `http://` URI handed to the gRPC channel.
    pub fn uri(&self) -> String {
        format!("http://{self}")
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS, DEFAULT_PORT)
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let endpoint = Endpoint::default();
        assert_eq!(endpoint.host(), "localhost");
        assert_eq!(endpoint.port(), 50051);
        assert_eq!(endpoint.uri(), "http://localhost:50051");
    }

    #[test]
    fn test_parse_bare_host_and_port() {
        let endpoint = Endpoint::parse("192.168.1.12:50052").unwrap();
        assert_eq!(endpoint, Endpoint::new("192.168.1.12", 50052));
    }

    #[test]
    fn test_parse_without_port_uses_default() {
        let endpoint = Endpoint::parse("grpc://drone.local").unwrap();
        assert_eq!(endpoint.host(), "drone.local");
        assert_eq!(endpoint.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_parse_http_without_port_uses_default() {
        let endpoint = Endpoint::parse("http://drone.local").unwrap();
        assert_eq!(endpoint, Endpoint::new("drone.local", DEFAULT_PORT));

        let endpoint = Endpoint::parse("http://drone.local:80").unwrap();
        assert_eq!(endpoint.port(), 80);
    }

    #[test]
    fn test_parse_ipv6_is_bracketed_in_uri() {
        let endpoint = Endpoint::parse("http://[::1]:50051").unwrap();
        assert_eq!(endpoint.host(), "::1");
        assert_eq!(endpoint.uri(), "http://[::1]:50051");
    }

    #[test]
    fn test_parse_rejects_tls_scheme() {
        let result = Endpoint::parse("https://drone.local:443");
        assert!(matches!(result, Err(EndpointError::UnsupportedScheme(s)) if s == "https"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Endpoint::parse("grpc://host:notaport").is_err());
    }
}
