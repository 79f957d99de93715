use std::time::Duration;

use tonic::{Code, Status};

use crate::unary::ResultCode;

/// Failure of a unary call.
///
/// Keeps "the drone said no" ([`Rejected`](CallError::Rejected)) apart from "we could not talk
/// to the drone" ([`Transport`](CallError::Transport)).
#[derive(Debug, thiserror::Error)]
pub enum CallError<C: ResultCode> {
    /// The call completed but the backend answered with a non-success result code.
    #[error("request rejected with {code:?}: {message}")]
    Rejected { code: C, message: String },

    /// The RPC itself failed: connection refused, timeout, undecodable response.
    #[error("transport failure: {0}")]
    Transport(#[from] Status),
}

impl<C: ResultCode> CallError<C> {
    /// The domain result code, if the backend produced one.
    pub fn code(&self) -> Option<C> {
        match self {
            CallError::Rejected { code, .. } => Some(*code),
            CallError::Transport(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, CallError::Transport(_))
    }
}

/// Terminal failure of a shared subscription, delivered once to every attached listener.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubscriptionError {
    /// The backend closed the stream with a status that is not worth retrying.
    #[error("stream '{topic}' failed with {code:?}: {message}")]
    Rejected {
        topic: &'static str,
        code: Code,
        message: String,
    },

    /// A message arrived that could not be translated into the topic's type.
    #[error("stream '{topic}' delivered an untranslatable message: {reason}")]
    Translate { topic: &'static str, reason: String },

    /// The retry policy's attempt budget ran out while the backend stayed unreachable.
    #[error("stream '{topic}' gave up after {attempts} reconnect attempts: {message}")]
    RetriesExhausted {
        topic: &'static str,
        attempts: u32,
        message: String,
    },

    /// No item arrived within the caller's deadline.
    #[error("no item on stream '{topic}' within {after:?}")]
    Timeout { topic: &'static str, after: Duration },

    /// The stream completed before producing an item.
    #[error("stream '{topic}' completed without an item")]
    Ended { topic: &'static str },
}

impl SubscriptionError {
    pub(crate) fn rejected(topic: &'static str, status: &Status) -> Self {
        SubscriptionError::Rejected {
            topic,
            code: status.code(),
            message: status.message().to_string(),
        }
    }

    pub fn topic(&self) -> &'static str {
        match self {
            SubscriptionError::Rejected { topic, .. }
            | SubscriptionError::Translate { topic, .. }
            | SubscriptionError::RetriesExhausted { topic, .. }
            | SubscriptionError::Timeout { topic, .. }
            | SubscriptionError::Ended { topic } => topic,
        }
    }
}
