//! ebMS3 error codes surfaced by the processing core
//!
//! These are the stable, namespaced identifiers the transport boundary renders
//! into SOAP faults or ebMS error signals. Only the codes the core can produce
//! are listed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of an ebMS error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Processing of the message failed
    Failure,
    /// Processing completed with a condition worth reporting
    Warning,
}

/// Category of an ebMS error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Problem with the content of the header
    Content,
    /// Problem with the exchange itself
    Communication,
}

/// ebMS3 error codes produced by pull arbitration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EbmsErrorCode {
    /// `EBMS:0001` a header element value is not recognized
    ValueNotRecognized,
    /// `EBMS:0003` a header element value is inconsistent with other values
    ValueInconsistent,
    /// `EBMS:0004` an unclassified error
    Other,
    /// `EBMS:0006` the pulled partition channel has no message to deliver
    EmptyMessagePartitionChannel,
}

impl EbmsErrorCode {
    /// All codes, in identifier order
    pub const ALL: [EbmsErrorCode; 4] = [
        EbmsErrorCode::ValueNotRecognized,
        EbmsErrorCode::ValueInconsistent,
        EbmsErrorCode::Other,
        EbmsErrorCode::EmptyMessagePartitionChannel,
    ];

    /// Namespaced identifier, e.g. `EBMS:0006`
    pub fn error_code(self) -> &'static str {
        match self {
            EbmsErrorCode::ValueNotRecognized => "EBMS:0001",
            EbmsErrorCode::ValueInconsistent => "EBMS:0003",
            EbmsErrorCode::Other => "EBMS:0004",
            EbmsErrorCode::EmptyMessagePartitionChannel => "EBMS:0006",
        }
    }

    /// Short description as defined by ebMS3
    pub fn short_description(self) -> &'static str {
        match self {
            EbmsErrorCode::ValueNotRecognized => "ValueNotRecognized",
            EbmsErrorCode::ValueInconsistent => "ValueInconsistent",
            EbmsErrorCode::Other => "Other",
            EbmsErrorCode::EmptyMessagePartitionChannel => "EmptyMessagePartitionChannel",
        }
    }

    /// Severity reported alongside the code
    pub fn severity(self) -> ErrorSeverity {
        match self {
            EbmsErrorCode::EmptyMessagePartitionChannel => ErrorSeverity::Warning,
            _ => ErrorSeverity::Failure,
        }
    }

    /// Category reported alongside the code
    pub fn category(self) -> ErrorCategory {
        match self {
            EbmsErrorCode::EmptyMessagePartitionChannel => ErrorCategory::Communication,
            _ => ErrorCategory::Content,
        }
    }

    /// Look up a code by its namespaced identifier
    pub fn from_error_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.error_code() == code)
    }
}

impl fmt::Display for EbmsErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error_code(), self.short_description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert_eq!(EbmsErrorCode::ValueNotRecognized.error_code(), "EBMS:0001");
        assert_eq!(EbmsErrorCode::ValueInconsistent.error_code(), "EBMS:0003");
        assert_eq!(EbmsErrorCode::Other.error_code(), "EBMS:0004");
        assert_eq!(
            EbmsErrorCode::EmptyMessagePartitionChannel.error_code(),
            "EBMS:0006"
        );
    }

    #[test]
    fn test_empty_channel_is_only_a_warning() {
        for code in EbmsErrorCode::ALL {
            let expected = if code == EbmsErrorCode::EmptyMessagePartitionChannel {
                ErrorSeverity::Warning
            } else {
                ErrorSeverity::Failure
            };
            assert_eq!(code.severity(), expected, "{code}");
        }
    }

    #[test]
    fn test_lookup_by_identifier() {
        for code in EbmsErrorCode::ALL {
            assert_eq!(EbmsErrorCode::from_error_code(code.error_code()), Some(code));
        }
        assert_eq!(EbmsErrorCode::from_error_code("EBMS:0999"), None);
    }
}
