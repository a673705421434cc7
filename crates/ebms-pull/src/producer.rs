//! Message producers and their registry
//!
//! A producer is an application hook that, asked about a channel, answers
//! with at most one user message. Producers are registered explicitly at
//! startup, either for a single channel or for every channel. A producer that
//! cannot answer reports [`ProducerResponse::Failed`] instead of panicking or
//! erroring out of the exchange.

use crate::binding::PullContext;
use async_trait::async_trait;
use ebms_core::{MpcId, UserMessage};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Answer of a single producer to a pull
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerResponse {
    /// Nothing to deliver on this channel
    NoMessage,
    /// A message to deliver
    Message(Box<UserMessage>),
    /// The producer could not answer
    Failed {
        /// Failure description
        reason: String,
    },
}

impl ProducerResponse {
    /// Wrap a message
    pub fn message(message: UserMessage) -> Self {
        ProducerResponse::Message(Box::new(message))
    }

    /// Report a failure
    pub fn failed(reason: impl Into<String>) -> Self {
        ProducerResponse::Failed {
            reason: reason.into(),
        }
    }
}

/// Application hook supplying messages for pulled channels
#[async_trait]
pub trait MessageProducer: Send + Sync {
    /// Name used in logs, signals and ambiguity reports
    fn name(&self) -> &str;

    /// Offer at most one message for `mpc`
    async fn try_produce(&self, mpc: &MpcId, context: &PullContext) -> ProducerResponse;
}

/// Channels a producer is consulted for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerScope {
    /// Consulted on every pull
    AllChannels,
    /// Consulted only for one channel
    Channel(MpcId),
}

impl ProducerScope {
    /// Whether the scope covers `mpc`
    pub fn covers(&self, mpc: &MpcId) -> bool {
        match self {
            ProducerScope::AllChannels => true,
            ProducerScope::Channel(scoped) => scoped == mpc,
        }
    }
}

impl fmt::Display for ProducerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProducerScope::AllChannels => f.write_str("*"),
            ProducerScope::Channel(mpc) => write!(f, "{mpc}"),
        }
    }
}

struct Registration {
    scope: ProducerScope,
    producer: Arc<dyn MessageProducer>,
}

/// Registered producers, in registration order
#[derive(Default)]
pub struct ProducerRegistry {
    registrations: RwLock<Vec<Registration>>,
}

impl ProducerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer for `scope`
    pub fn register(&self, scope: ProducerScope, producer: Arc<dyn MessageProducer>) {
        tracing::info!(producer = producer.name(), %scope, "registered message producer");
        self.registrations
            .write()
            .push(Registration { scope, producer });
    }

    /// Register a producer for every channel
    pub fn register_for_all(&self, producer: Arc<dyn MessageProducer>) {
        self.register(ProducerScope::AllChannels, producer);
    }

    /// Register a producer for one channel
    pub fn register_for_channel(&self, mpc: MpcId, producer: Arc<dyn MessageProducer>) {
        self.register(ProducerScope::Channel(mpc), producer);
    }

    /// Producers consulted for `mpc`, in registration order
    pub fn producers_for(&self, mpc: &MpcId) -> Vec<Arc<dyn MessageProducer>> {
        self.registrations
            .read()
            .iter()
            .filter(|registration| registration.scope.covers(mpc))
            .map(|registration| Arc::clone(&registration.producer))
            .collect()
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ProducerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registrations = self.registrations.read();
        f.debug_list()
            .entries(
                registrations
                    .iter()
                    .map(|r| format!("{} @ {}", r.producer.name(), r.scope)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl MessageProducer for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn try_produce(&self, _mpc: &MpcId, _context: &PullContext) -> ProducerResponse {
            ProducerResponse::NoMessage
        }
    }

    fn id(key: &str) -> MpcId {
        MpcId::new(key).unwrap()
    }

    #[test]
    fn test_scoped_producers_only_see_their_channel() {
        let registry = ProducerRegistry::new();
        registry.register_for_all(Arc::new(Named("everywhere")));
        registry.register_for_channel(id("urn:mpc:a"), Arc::new(Named("only-a")));

        let names = |mpc: &str| -> Vec<String> {
            registry
                .producers_for(&id(mpc))
                .iter()
                .map(|p| p.name().to_string())
                .collect()
        };
        assert_eq!(names("urn:mpc:a"), vec!["everywhere", "only-a"]);
        assert_eq!(names("urn:mpc:b"), vec!["everywhere"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_debug_lists_scopes() {
        let registry = ProducerRegistry::new();
        assert!(registry.is_empty());
        registry.register_for_channel(id("urn:mpc:a"), Arc::new(Named("p")));
        assert_eq!(format!("{registry:?}"), "[\"p @ urn:mpc:a\"]");
    }
}
