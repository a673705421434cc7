//! Pull responder
//!
//! Hands the engine's outcome to the transport in renderable form. A selected
//! user message is serialized with the [`WireCodec`] and signed with the
//! [`EnvelopeSigner`]; a typed pull error becomes an [`ErrorSignal`] the
//! transport renders as an ebMS error or SOAP fault.

use crate::binding::ExchangeContext;
use crate::engine::PullEngine;
use crate::error::PullError;
use ebms_core::{
    CoreError, EbmsErrorCode, EnvelopeSigner, ErrorCategory, ErrorSeverity, KeyingMaterial,
    PullRequest, WireCodec,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// ebMS error to report back to the pulling party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSignal {
    /// ebMS3 error code
    pub code: EbmsErrorCode,
    /// Severity
    pub severity: ErrorSeverity,
    /// Category
    pub category: ErrorCategory,
    /// Id of the pull request the error refers to
    pub ref_to_message_id: String,
    /// Human readable detail
    pub detail: String,
}

impl ErrorSignal {
    /// Error signal for `error`, referring to the pull request `ref_to_message_id`
    pub fn from_pull_error(error: &PullError, ref_to_message_id: impl Into<String>) -> Self {
        let code = error.code();
        Self {
            code,
            severity: code.severity(),
            category: code.category(),
            ref_to_message_id: ref_to_message_id.into(),
            detail: error.to_string(),
        }
    }
}

/// What the transport sends back for a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PullResponse {
    /// A signed user message
    Message {
        /// Id of the pulled user message
        message_id: String,
        /// Content type reported by the codec
        content_type: String,
        /// Signed wire payload
        payload: Vec<u8>,
    },
    /// An ebMS error
    Error(ErrorSignal),
}

impl PullResponse {
    /// Whether a message is being returned
    pub fn is_message(&self) -> bool {
        matches!(self, PullResponse::Message { .. })
    }
}

/// Composes the engine with the serialization and signing collaborators
pub struct PullResponder {
    engine: Arc<PullEngine>,
    codec: Arc<dyn WireCodec>,
    signer: Arc<dyn EnvelopeSigner>,
    keying: KeyingMaterial,
}

impl PullResponder {
    /// Create a responder
    pub fn new(
        engine: Arc<PullEngine>,
        codec: Arc<dyn WireCodec>,
        signer: Arc<dyn EnvelopeSigner>,
        keying: KeyingMaterial,
    ) -> Self {
        Self {
            engine,
            codec,
            signer,
            keying,
        }
    }

    /// Underlying engine
    pub fn engine(&self) -> &Arc<PullEngine> {
        &self.engine
    }

    /// Answer a decoded pull request
    ///
    /// Protocol errors are returned as [`PullResponse::Error`]; `Err` means a
    /// collaborator failed and the transport should answer with a fault.
    pub async fn respond(
        &self,
        request: &PullRequest,
        exchange: &ExchangeContext,
    ) -> Result<PullResponse, CoreError> {
        let message = match self
            .engine
            .handle_pull_request(request.mpc.as_deref(), exchange)
            .await
        {
            Ok(message) => message,
            Err(error) => {
                return Ok(PullResponse::Error(ErrorSignal::from_pull_error(
                    &error,
                    request.message_id(),
                )))
            }
        };

        let document = self.codec.to_wire(&message)?;
        let payload = self.signer.sign(document, &self.keying).await?;
        tracing::debug!(
            message_id = message.message_id(),
            bytes = payload.len(),
            "signed pull response"
        );
        Ok(PullResponse::Message {
            message_id: message.message_id().to_string(),
            content_type: self.codec.content_type().to_string(),
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_signal_from_empty_channel() {
        let signal = ErrorSignal::from_pull_error(
            &PullError::EmptyChannel { mpc: "urn:x".into() },
            "pull-1@ebms",
        );
        assert_eq!(signal.code.error_code(), "EBMS:0006");
        assert_eq!(signal.severity, ErrorSeverity::Warning);
        assert_eq!(signal.category, ErrorCategory::Communication);
        assert_eq!(signal.ref_to_message_id, "pull-1@ebms");
    }

    #[test]
    fn test_error_signal_from_missing_channel() {
        let signal = ErrorSignal::from_pull_error(&PullError::MissingMpc, "pull-2@ebms");
        assert_eq!(signal.code, EbmsErrorCode::ValueNotRecognized);
        assert_eq!(signal.severity, ErrorSeverity::Failure);
        assert!(!PullResponse::Error(signal).is_message());
    }
}
