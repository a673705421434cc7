//! Pull exchange signals
//!
//! Producer failures, timeouts and arbitration outcomes are reported through
//! a callback rather than aborting the exchange. The embedding layer decides
//! whether to surface them (e.g. as ebMS error signals or operator alerts).
//!
//! ```rust,ignore
//! use ebms_pull::signals::{FnPullSignalCallback, PullSignal};
//!
//! let callback = FnPullSignalCallback::new(|signal| {
//!     if let PullSignal::ProducerFailed { producer, .. } = signal {
//!         eprintln!("producer {producer} failed");
//!     }
//! });
//! ```

use crate::error::PullError;
use ebms_core::EbmsErrorCode;
use std::time::Duration;

// =============================================================================
// Pull Signals
// =============================================================================

/// Signals emitted while a pull request is arbitrated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullSignal {
    /// A producer raised a failure; it counts as "no message"
    ProducerFailed {
        /// Pulled channel
        mpc: String,
        /// Failing producer
        producer: String,
        /// Failure description
        reason: String,
        /// Error code reported for the failure
        code: EbmsErrorCode,
    },

    /// A producer did not answer in time; it counts as "no message"
    ProducerTimedOut {
        /// Pulled channel
        mpc: String,
        /// Slow producer
        producer: String,
        /// Configured bound
        timeout: Duration,
    },

    /// Several producers answered the same pull
    AmbiguousProducers {
        /// Pulled channel
        mpc: String,
        /// Every producer that answered, sorted
        producers: Vec<String>,
    },

    /// A message was selected for delivery
    Delivered {
        /// Pulled channel
        mpc: String,
        /// Producer that supplied it
        producer: String,
        /// Id of the delivered user message
        message_id: String,
    },

    /// The pull was answered with an error
    Rejected {
        /// Requested channel, if any
        mpc: Option<String>,
        /// Reported error code
        code: EbmsErrorCode,
        /// Description
        detail: String,
    },
}

impl PullSignal {
    /// Signal for a pull rejected with `error`
    pub fn rejected(error: &PullError) -> Self {
        PullSignal::Rejected {
            mpc: error.mpc().map(str::to_string),
            code: error.code(),
            detail: error.to_string(),
        }
    }

    /// Channel the signal concerns
    pub fn mpc(&self) -> Option<&str> {
        match self {
            PullSignal::ProducerFailed { mpc, .. }
            | PullSignal::ProducerTimedOut { mpc, .. }
            | PullSignal::AmbiguousProducers { mpc, .. }
            | PullSignal::Delivered { mpc, .. } => Some(mpc),
            PullSignal::Rejected { mpc, .. } => mpc.as_deref(),
        }
    }
}

// =============================================================================
// Pull Signal Callback
// =============================================================================

/// Callback trait for receiving pull signals
pub trait PullSignalCallback: Send + Sync {
    /// Called when a pull signal is emitted
    fn on_pull_signal(&self, signal: PullSignal);
}

/// No-op implementation
pub struct NoOpPullSignalCallback;

impl PullSignalCallback for NoOpPullSignalCallback {
    fn on_pull_signal(&self, _signal: PullSignal) {}
}

/// Logging implementation
pub struct LoggingPullSignalCallback;

impl PullSignalCallback for LoggingPullSignalCallback {
    fn on_pull_signal(&self, signal: PullSignal) {
        match &signal {
            PullSignal::ProducerFailed {
                mpc,
                producer,
                reason,
                code,
            } => {
                tracing::warn!(%mpc, %producer, %code, "Producer failed: {}", reason);
            }
            PullSignal::ProducerTimedOut {
                mpc,
                producer,
                timeout,
            } => {
                tracing::warn!(%mpc, %producer, "Producer timed out after {:?}", timeout);
            }
            PullSignal::AmbiguousProducers { mpc, producers } => {
                tracing::error!(%mpc, "Competing producers: {}", producers.join(", "));
            }
            PullSignal::Delivered {
                mpc,
                producer,
                message_id,
            } => {
                tracing::info!(%mpc, %producer, %message_id, "Pulled message delivered");
            }
            PullSignal::Rejected { mpc, code, detail } => {
                tracing::debug!(mpc = ?mpc, %code, "Pull rejected: {}", detail);
            }
        }
    }
}

/// Function-based callback wrapper
pub struct FnPullSignalCallback<F>(F);

impl<F> FnPullSignalCallback<F>
where
    F: Fn(PullSignal) + Send + Sync,
{
    /// Create a new function-based callback
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> PullSignalCallback for FnPullSignalCallback<F>
where
    F: Fn(PullSignal) + Send + Sync,
{
    fn on_pull_signal(&self, signal: PullSignal) {
        (self.0)(signal);
    }
}
