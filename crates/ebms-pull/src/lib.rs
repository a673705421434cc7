//! ebMS Pull - arbitration of pull requests among message producers
//!
//! Given a pull request on a Message Partition Channel, the [`PullEngine`]
//! asks every registered [`MessageProducer`] whether it has a message and
//! reduces their answers to exactly one message or one typed [`PullError`].
//! The binding resolver tells producers what the pull owes under the
//! exchange's MEP binding, and the [`PullResponder`] hands the outcome to the
//! serialization and signing collaborators.
//!
//! ```rust,ignore
//! let engine = PullEngine::from_config(EngineConfig::default())?;
//! engine.producers().register_for_all(Arc::new(MyOutbox::new()));
//!
//! match engine.handle_pull_request(Some(DEFAULT_MPC), &exchange).await {
//!     Ok(message) => send(message),
//!     Err(error) => reply_with(error.code()),
//! }
//! ```

#![forbid(unsafe_code)]

/// MEP binding resolution and exchange context
pub mod binding;

/// Engine configuration
pub mod config;

/// The arbitration engine
pub mod engine;

/// Pull outcomes
pub mod error;

/// Producer trait and registry
pub mod producer;

/// Engine to codec and signer composition
pub mod responder;

/// Error-reporting signals
pub mod signals;

pub use binding::{
    resolve_obligation, ExchangeContext, ExchangeHistory, PullContext, ResponseObligation,
};
pub use config::EngineConfig;
pub use engine::{reduce_answers, ProducerAnswer, PullEngine};
pub use error::PullError;
pub use producer::{MessageProducer, ProducerRegistry, ProducerResponse, ProducerScope};
pub use responder::{ErrorSignal, PullResponder, PullResponse};
pub use signals::{
    FnPullSignalCallback, LoggingPullSignalCallback, NoOpPullSignalCallback, PullSignal,
    PullSignalCallback,
};
