use tonic::{Code, Status};

use crate::error::SubscriptionError;

/// Why an item could not be produced from the underlying stream.
#[derive(Debug)]
pub enum StreamFault {
    /// The transport ended the stream with a status.
    Rpc(Status),
    /// A message decoded but could not be translated into the topic's type.
    Translate(String),
}

impl From<Status> for StreamFault {
    fn from(status: Status) -> Self {
        StreamFault::Rpc(status)
    }
}

/// Classification of a stream's closure.
#[derive(Debug)]
pub enum TerminalStatus {
    Completed,
    Cancelled,
    /// Worth reopening; never shown to listeners while the retry budget lasts.
    Transient(Status),
    Unrecoverable(SubscriptionError),
}

impl TerminalStatus {
    pub fn classify(topic: &'static str, fault: StreamFault) -> Self {
        match fault {
            StreamFault::Rpc(status) => Self::from_status(topic, status),
            StreamFault::Translate(reason) => {
                TerminalStatus::Unrecoverable(SubscriptionError::Translate { topic, reason })
            }
        }
    }

    pub fn from_status(topic: &'static str, status: Status) -> Self {
        match status.code() {
            Code::Ok => TerminalStatus::Completed,
            Code::Cancelled => TerminalStatus::Cancelled,
            code if is_transient(code) => TerminalStatus::Transient(status),
            _ => TerminalStatus::Unrecoverable(SubscriptionError::rejected(topic, &status)),
        }
    }
}

/// Status codes that describe the channel rather than the request.
///
/// `Internal` is deliberately absent: tonic reports undecodable messages with it.
pub fn is_transient(code: Code) -> bool {
    matches!(
        code,
        Code::Unavailable
            | Code::Unknown
            | Code::Aborted
            | Code::ResourceExhausted
            | Code::DeadlineExceeded
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let topic = "test";
        assert!(matches!(
            TerminalStatus::from_status(topic, Status::ok("")),
            TerminalStatus::Completed
        ));
        assert!(matches!(
            TerminalStatus::from_status(topic, Status::cancelled("bye")),
            TerminalStatus::Cancelled
        ));
        assert!(matches!(
            TerminalStatus::from_status(topic, Status::unavailable("plugin not ready")),
            TerminalStatus::Transient(_)
        ));
        assert!(matches!(
            TerminalStatus::from_status(topic, Status::unimplemented("no such method")),
            TerminalStatus::Unrecoverable(SubscriptionError::Rejected {
                code: Code::Unimplemented,
                ..
            })
        ));
        assert!(matches!(
            TerminalStatus::from_status(topic, Status::internal("decode")),
            TerminalStatus::Unrecoverable(_)
        ));
    }

    #[test]
    fn test_translate_fault_is_unrecoverable() {
        let status = TerminalStatus::classify("position", StreamFault::Translate("empty".into()));
        assert!(matches!(
            status,
            TerminalStatus::Unrecoverable(SubscriptionError::Translate { topic: "position", .. })
        ));
    }
}
