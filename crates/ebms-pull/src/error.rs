//! Typed outcomes of a rejected pull exchange
//!
//! Every variant maps to exactly one ebMS3 error code. The transport boundary
//! renders the code into a SOAP fault or error signal; the core never throws
//! for control flow.

use ebms_core::{EbmsErrorCode, ErrorSeverity};
use std::time::Duration;

/// Why a pull request produced no message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PullError {
    /// The pull request named no channel
    #[error("Pull request carries no partition channel")]
    MissingMpc,

    /// The key is well-formed but names no registered or declared channel
    #[error("Partition channel '{mpc}' is not recognized")]
    UnknownMpc {
        /// Requested key
        mpc: String,
    },

    /// The key cannot be a channel key at all
    #[error("Partition channel key '{mpc}' is invalid: {reason}")]
    InvalidMpc {
        /// Requested key, verbatim
        mpc: String,
        /// What is wrong with it
        reason: String,
    },

    /// The channel exists but no producer has anything to deliver
    #[error("Partition channel '{mpc}' is empty")]
    EmptyChannel {
        /// Pulled channel
        mpc: String,
    },

    /// More than one producer answered the same pull
    #[error("Partition channel '{mpc}' has {} competing producers: {}", .producers.len(), .producers.join(", "))]
    AmbiguousProducers {
        /// Pulled channel
        mpc: String,
        /// Names of every producer that returned a message, sorted
        producers: Vec<String>,
    },

    /// The caller abandoned the exchange before reduction completed
    #[error("Pull on {mpc:?} aborted by the caller after {elapsed:?}")]
    Aborted {
        /// Pulled channel, as requested
        mpc: Option<String>,
        /// Time spent before the abort
        elapsed: Duration,
    },
}

impl PullError {
    /// ebMS3 error code for this outcome
    pub fn code(&self) -> EbmsErrorCode {
        match self {
            PullError::MissingMpc | PullError::UnknownMpc { .. } => {
                EbmsErrorCode::ValueNotRecognized
            }
            PullError::InvalidMpc { .. } | PullError::AmbiguousProducers { .. } => {
                EbmsErrorCode::ValueInconsistent
            }
            PullError::EmptyChannel { .. } => EbmsErrorCode::EmptyMessagePartitionChannel,
            PullError::Aborted { .. } => EbmsErrorCode::Other,
        }
    }

    /// Severity reported to the peer
    pub fn severity(&self) -> ErrorSeverity {
        self.code().severity()
    }

    /// Whether the request itself was malformed and must not be retried as is
    pub fn is_malformed_request(&self) -> bool {
        matches!(
            self,
            PullError::MissingMpc | PullError::UnknownMpc { .. } | PullError::InvalidMpc { .. }
        )
    }

    /// Whether the outcome points at a deployment defect an operator must fix
    pub fn needs_operator(&self) -> bool {
        matches!(self, PullError::AmbiguousProducers { .. })
    }

    /// Requested channel key, when there was one
    pub fn mpc(&self) -> Option<&str> {
        match self {
            PullError::MissingMpc => None,
            PullError::UnknownMpc { mpc }
            | PullError::InvalidMpc { mpc, .. }
            | PullError::EmptyChannel { mpc }
            | PullError::AmbiguousProducers { mpc, .. } => Some(mpc),
            PullError::Aborted { mpc, .. } => mpc.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(PullError::MissingMpc.code(), EbmsErrorCode::ValueNotRecognized);
        assert_eq!(
            PullError::UnknownMpc { mpc: "urn:x".into() }.code(),
            EbmsErrorCode::ValueNotRecognized
        );
        assert_eq!(
            PullError::InvalidMpc {
                mpc: "a b".into(),
                reason: "whitespace".into()
            }
            .code(),
            EbmsErrorCode::ValueInconsistent
        );
        assert_eq!(
            PullError::EmptyChannel { mpc: "urn:x".into() }.code(),
            EbmsErrorCode::EmptyMessagePartitionChannel
        );
        assert_eq!(
            PullError::AmbiguousProducers {
                mpc: "urn:x".into(),
                producers: vec!["a".into(), "b".into()]
            }
            .code(),
            EbmsErrorCode::ValueInconsistent
        );
        assert_eq!(
            PullError::Aborted {
                mpc: Some("urn:x".into()),
                elapsed: Duration::from_millis(3)
            }
            .code(),
            EbmsErrorCode::Other
        );
    }

    #[test]
    fn test_empty_channel_is_not_fatal() {
        let err = PullError::EmptyChannel { mpc: "urn:x".into() };
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(!err.is_malformed_request());
        assert!(!err.needs_operator());
    }

    #[test]
    fn test_ambiguity_message_lists_producers() {
        let err = PullError::AmbiguousProducers {
            mpc: "TWO-SPI".into(),
            producers: vec!["first".into(), "second".into()],
        };
        assert_eq!(
            err.to_string(),
            "Partition channel 'TWO-SPI' has 2 competing producers: first, second"
        );
        assert!(err.needs_operator());
        assert_eq!(err.mpc(), Some("TWO-SPI"));
        assert_eq!(PullError::MissingMpc.mpc(), None);
    }
}
