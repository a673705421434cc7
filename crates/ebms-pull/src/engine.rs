//! Pull request arbitration
//!
//! # Architecture
//!
//! ```text
//!  mpc key ──► resolve ──► per-channel lock ──► fan-out ──► reduce ──► outcome
//!               │                                 │            │
//!     Missing / Invalid / Unknown        timeout = no message  0 ⇒ EmptyChannel
//!     declared ⇒ lazy + EmptyChannel     failure = no message  1 ⇒ message
//!                                        (signalled)           n ⇒ Ambiguous
//! ```
//!
//! Steps before the fan-out are read-only lookups, apart from the lazy
//! creation of a declared channel. The fan-out is all-or-nothing: only the
//! reduced outcome ever leaves the engine. Reductions on the same channel are
//! serialized; different channels proceed independently.

use crate::binding::{ExchangeContext, PullContext};
use crate::config::EngineConfig;
use crate::error::PullError;
use crate::producer::{MessageProducer, ProducerRegistry, ProducerResponse};
use crate::signals::{LoggingPullSignalCallback, PullSignal, PullSignalCallback};
use ebms_core::{CoreError, EbmsErrorCode, MpcId, UserMessage};
use ebms_mpc::{Mpc, MpcRegistry, Resolution};
use futures::future::join_all;
use futures::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::Instant;

/// Answer of a named producer, after timeouts have been folded in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerAnswer {
    /// Producer name
    pub producer: String,
    /// What it answered
    pub response: ProducerResponse,
}

/// Reduce the answers of every producer consulted for `mpc` to one outcome
///
/// Failures count as "no message". The result does not depend on the order
/// of `answers`.
pub fn reduce_answers(
    mpc: &MpcId,
    answers: Vec<ProducerAnswer>,
) -> Result<(String, UserMessage), PullError> {
    let mut messages: Vec<(String, UserMessage)> = answers
        .into_iter()
        .filter_map(|answer| match answer.response {
            ProducerResponse::Message(message) => Some((answer.producer, *message)),
            ProducerResponse::NoMessage | ProducerResponse::Failed { .. } => None,
        })
        .collect();

    match messages.len() {
        0 => Err(PullError::EmptyChannel {
            mpc: mpc.to_string(),
        }),
        1 => Ok(messages.remove(0)),
        _ => {
            let mut producers: Vec<String> = messages.into_iter().map(|(name, _)| name).collect();
            producers.sort();
            Err(PullError::AmbiguousProducers {
                mpc: mpc.to_string(),
                producers,
            })
        }
    }
}

/// Arbitrates pull requests among registered message producers
pub struct PullEngine {
    channels: Arc<MpcRegistry>,
    producers: Arc<ProducerRegistry>,
    config: EngineConfig,
    signals: Arc<dyn PullSignalCallback>,
    channel_locks: parking_lot::Mutex<HashMap<MpcId, Arc<tokio::sync::Mutex<()>>>>,
}

impl PullEngine {
    /// Create an engine over explicitly constructed registries
    pub fn new(
        channels: Arc<MpcRegistry>,
        producers: Arc<ProducerRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            channels,
            producers,
            config,
            signals: Arc::new(LoggingPullSignalCallback),
            channel_locks: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    /// Validate `config`, build its channel registry and an empty producer registry
    pub fn from_config(config: EngineConfig) -> Result<Self, CoreError> {
        let channels = Arc::new(config.build_registry()?);
        Ok(Self::new(channels, Arc::new(ProducerRegistry::new()), config))
    }

    /// Replace the signal callback
    pub fn with_signals(mut self, callback: impl PullSignalCallback + 'static) -> Self {
        self.signals = Arc::new(callback);
        self
    }

    /// Channel registry
    pub fn channels(&self) -> &Arc<MpcRegistry> {
        &self.channels
    }

    /// Producer registry
    pub fn producers(&self) -> &Arc<ProducerRegistry> {
        &self.producers
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a channel
    pub fn register_channel(&self, key: &str) -> Result<Mpc, CoreError> {
        self.channels.register(key)
    }

    /// Look a channel up
    pub fn lookup_channel(&self, key: &str) -> Result<Mpc, CoreError> {
        self.channels.lookup(key)
    }

    /// Answer a pull request with exactly one message or one typed error
    ///
    /// Dropping the returned future stops waiting on producers; anything a
    /// producer already committed stays committed.
    pub async fn handle_pull_request(
        &self,
        mpc: Option<&str>,
        exchange: &ExchangeContext,
    ) -> Result<UserMessage, PullError> {
        let result = self.evaluate(mpc, exchange).await;
        if let Err(error) = &result {
            self.signals.on_pull_signal(PullSignal::rejected(error));
        }
        result
    }

    /// Like [`Self::handle_pull_request`], giving up once `abort` completes
    pub async fn handle_pull_request_until<A>(
        &self,
        mpc: Option<&str>,
        exchange: &ExchangeContext,
        abort: A,
    ) -> Result<UserMessage, PullError>
    where
        A: Future<Output = ()>,
    {
        let started = Instant::now();
        tokio::select! {
            biased;
            () = abort => {
                let error = PullError::Aborted {
                    mpc: mpc.map(str::to_string),
                    elapsed: started.elapsed(),
                };
                tracing::debug!(mpc = ?mpc, "pull aborted by caller");
                self.signals.on_pull_signal(PullSignal::rejected(&error));
                Err(error)
            }
            result = self.handle_pull_request(mpc, exchange) => result,
        }
    }

    async fn evaluate(
        &self,
        mpc: Option<&str>,
        exchange: &ExchangeContext,
    ) -> Result<UserMessage, PullError> {
        let id = self.resolve_channel(mpc)?;

        let lock = self.channel_lock(&id);
        let _serialized = lock.lock().await;

        let context = PullContext::new(id.clone(), exchange.clone());
        let producers = self.producers.producers_for(&id);
        tracing::debug!(
            mpc = %id,
            producers = producers.len(),
            obligation = ?context.obligation,
            "dispatching pull request"
        );

        let answers = self.dispatch(&producers, &context).await;
        match reduce_answers(&id, answers) {
            Ok((producer, message)) => {
                self.signals.on_pull_signal(PullSignal::Delivered {
                    mpc: id.to_string(),
                    producer,
                    message_id: message.message_id().to_string(),
                });
                Ok(message)
            }
            Err(error) => {
                if let PullError::AmbiguousProducers { mpc, producers } = &error {
                    tracing::error!(%mpc, ?producers, "several producers answered one pull request");
                    self.signals.on_pull_signal(PullSignal::AmbiguousProducers {
                        mpc: mpc.clone(),
                        producers: producers.clone(),
                    });
                }
                Err(error)
            }
        }
    }

    fn resolve_channel(&self, mpc: Option<&str>) -> Result<MpcId, PullError> {
        let key = match mpc {
            None | Some("") => return Err(PullError::MissingMpc),
            Some(key) => key,
        };
        let id = MpcId::new(key).map_err(|e| PullError::InvalidMpc {
            mpc: key.to_string(),
            reason: e.to_string(),
        })?;
        match self.channels.resolve(&id) {
            Resolution::Registered(_) => Ok(id),
            Resolution::Created(_) => {
                tracing::info!(mpc = %id, "created declared channel on first pull");
                Err(PullError::EmptyChannel { mpc: id.to_string() })
            }
            Resolution::Unknown => Err(PullError::UnknownMpc { mpc: id.to_string() }),
        }
    }

    fn channel_lock(&self, id: &MpcId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.channel_locks.lock();
        Arc::clone(locks.entry(id.clone()).or_default())
    }

    async fn dispatch(
        &self,
        producers: &[Arc<dyn MessageProducer>],
        context: &PullContext,
    ) -> Vec<ProducerAnswer> {
        let timeout = self.config.producer_timeout();
        let calls = producers.iter().map(|producer| async move {
            let call = AssertUnwindSafe(producer.try_produce(&context.mpc, context)).catch_unwind();
            let response = match tokio::time::timeout(timeout, call).await {
                Ok(Ok(response)) => response,
                Ok(Err(_)) => ProducerResponse::failed("producer panicked"),
                Err(_) => {
                    self.signals.on_pull_signal(PullSignal::ProducerTimedOut {
                        mpc: context.mpc.to_string(),
                        producer: producer.name().to_string(),
                        timeout,
                    });
                    ProducerResponse::NoMessage
                }
            };
            if let ProducerResponse::Failed { reason } = &response {
                self.signals.on_pull_signal(PullSignal::ProducerFailed {
                    mpc: context.mpc.to_string(),
                    producer: producer.name().to_string(),
                    reason: reason.clone(),
                    code: EbmsErrorCode::Other,
                });
            }
            ProducerAnswer {
                producer: producer.name().to_string(),
                response,
            }
        });
        join_all(calls).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ebms_core::MessageInfo;
    use ebms_testkit::fixtures::test_user_message;

    fn id(key: &str) -> MpcId {
        MpcId::new(key).unwrap()
    }

    fn answer(producer: &str, response: ProducerResponse) -> ProducerAnswer {
        ProducerAnswer {
            producer: producer.to_string(),
            response,
        }
    }

    #[test]
    fn test_reduce_no_answers_is_empty() {
        assert_matches!(
            reduce_answers(&id("urn:x"), Vec::new()),
            Err(PullError::EmptyChannel { .. })
        );
    }

    #[test]
    fn test_reduce_single_message_wins_over_failures() {
        let message = test_user_message("m1@ebms");
        let (producer, selected) = reduce_answers(
            &id("urn:x"),
            vec![
                answer("broken", ProducerResponse::failed("db down")),
                answer("good", ProducerResponse::message(message.clone())),
                answer("idle", ProducerResponse::NoMessage),
            ],
        )
        .unwrap();
        assert_eq!(producer, "good");
        assert_eq!(selected, message);
    }

    #[test]
    fn test_reduce_sole_failure_is_empty() {
        assert_matches!(
            reduce_answers(&id("urn:x"), vec![answer("broken", ProducerResponse::failed("x"))]),
            Err(PullError::EmptyChannel { .. })
        );
    }

    #[test]
    fn test_reduce_two_messages_is_ambiguous() {
        let result = reduce_answers(
            &id("urn:x"),
            vec![
                answer("zeta", ProducerResponse::message(test_user_message("a@ebms"))),
                answer("alpha", ProducerResponse::message(test_user_message("b@ebms"))),
            ],
        );
        assert_matches!(result, Err(PullError::AmbiguousProducers { producers, .. }) if producers == vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_missing_key_rejected_before_lookup() {
        let engine = PullEngine::from_config(EngineConfig::testing()).unwrap();
        let exchange = ExchangeContext::new(MessageInfo::new());
        assert_eq!(
            engine.handle_pull_request(None, &exchange).await,
            Err(PullError::MissingMpc)
        );
        assert_eq!(
            engine.handle_pull_request(Some(""), &exchange).await,
            Err(PullError::MissingMpc)
        );
    }

    #[tokio::test]
    async fn test_channel_locks_are_per_key() {
        let engine = PullEngine::from_config(EngineConfig::testing()).unwrap();
        let a = engine.channel_lock(&id("urn:a"));
        let again = engine.channel_lock(&id("urn:a"));
        let b = engine.channel_lock(&id("urn:b"));
        assert!(Arc::ptr_eq(&a, &again));
        assert!(!Arc::ptr_eq(&a, &b));

        let _held = a.lock().await;
        assert!(b.try_lock().is_ok());
        assert!(again.try_lock().is_err());
    }

    #[test]
    fn test_register_and_lookup_through_engine() {
        let engine = PullEngine::from_config(EngineConfig::testing()).unwrap();
        engine.register_channel("urn:mpc:orders").unwrap();
        assert!(engine.lookup_channel("urn:mpc:orders").is_ok());
        assert_matches!(
            engine.register_channel("urn:mpc:orders"),
            Err(CoreError::AlreadyExists { .. })
        );
    }
}
