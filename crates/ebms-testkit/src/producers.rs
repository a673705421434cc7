//! Mock message producers

use async_trait::async_trait;
use ebms_core::{MessageInfo, MpcId, UserMessage};
use ebms_pull::{MessageProducer, ProducerResponse, ProducerScope, PullContext, ResponseObligation};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Registration of `producer` for every channel
pub fn scoped_all(
    producer: impl MessageProducer + 'static,
) -> (ProducerScope, Arc<dyn MessageProducer>) {
    (ProducerScope::AllChannels, Arc::new(producer))
}

/// Registration of `producer` for one channel
pub fn scoped_to(
    mpc: &MpcId,
    producer: impl MessageProducer + 'static,
) -> (ProducerScope, Arc<dyn MessageProducer>) {
    (ProducerScope::Channel(mpc.clone()), Arc::new(producer))
}

/// Always offers the same message
pub struct StaticProducer {
    name: String,
    message: UserMessage,
}

impl StaticProducer {
    /// Producer offering `message`
    pub fn new(name: impl Into<String>, message: UserMessage) -> Self {
        Self {
            name: name.into(),
            message,
        }
    }
}

#[async_trait]
impl MessageProducer for StaticProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_produce(&self, _mpc: &MpcId, _context: &PullContext) -> ProducerResponse {
        ProducerResponse::message(self.message.clone())
    }
}

/// Never has anything
pub struct EmptyProducer {
    name: String,
}

impl EmptyProducer {
    /// Producer with nothing to offer
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl MessageProducer for EmptyProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_produce(&self, _mpc: &MpcId, _context: &PullContext) -> ProducerResponse {
        ProducerResponse::NoMessage
    }
}

/// Always reports an internal failure
pub struct FailingProducer {
    name: String,
    reason: String,
}

impl FailingProducer {
    /// Producer failing with `reason`
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl MessageProducer for FailingProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_produce(&self, _mpc: &MpcId, _context: &PullContext) -> ProducerResponse {
        ProducerResponse::failed(self.reason.clone())
    }
}

/// Panics when asked
pub struct PanickingProducer {
    name: String,
}

impl PanickingProducer {
    /// Producer that panics
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl MessageProducer for PanickingProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_produce(&self, mpc: &MpcId, _context: &PullContext) -> ProducerResponse {
        panic!("producer {} cannot serve {mpc}", self.name)
    }
}

/// Never answers
pub struct StallingProducer {
    name: String,
}

impl StallingProducer {
    /// Producer that never completes
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl MessageProducer for StallingProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_produce(&self, _mpc: &MpcId, _context: &PullContext) -> ProducerResponse {
        std::future::pending::<()>().await;
        ProducerResponse::NoMessage
    }
}

/// Answers after a delay
pub struct DelayedProducer {
    name: String,
    delay: Duration,
    message: UserMessage,
}

impl DelayedProducer {
    /// Producer offering `message` after `delay`
    pub fn new(name: impl Into<String>, delay: Duration, message: UserMessage) -> Self {
        Self {
            name: name.into(),
            delay,
            message,
        }
    }
}

#[async_trait]
impl MessageProducer for DelayedProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_produce(&self, _mpc: &MpcId, _context: &PullContext) -> ProducerResponse {
        tokio::time::sleep(self.delay).await;
        ProducerResponse::message(self.message.clone())
    }
}

/// Counts invocations of a wrapped producer
pub struct CountingProducer {
    inner: Arc<dyn MessageProducer>,
    calls: Arc<AtomicUsize>,
}

impl CountingProducer {
    /// Wrap `inner`
    pub fn new(inner: impl MessageProducer + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared invocation counter
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl MessageProducer for CountingProducer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn try_produce(&self, mpc: &MpcId, context: &PullContext) -> ProducerResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.try_produce(mpc, context).await
    }
}

/// Answers according to the resolved MEP obligation
///
/// Offers `initiating` for a pull that initiates the exchange and a reply
/// referring to the pushed message for the pull leg of push-and-pull.
pub struct BindingAwareProducer {
    name: String,
    initiating: UserMessage,
    reply: UserMessage,
}

impl BindingAwareProducer {
    /// Producer with one message per obligation
    pub fn new(name: impl Into<String>, initiating: UserMessage, reply: UserMessage) -> Self {
        Self {
            name: name.into(),
            initiating,
            reply,
        }
    }
}

#[async_trait]
impl MessageProducer for BindingAwareProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_produce(&self, _mpc: &MpcId, context: &PullContext) -> ProducerResponse {
        match &context.obligation {
            ResponseObligation::InitiatingMessage => {
                ProducerResponse::message(self.initiating.clone())
            }
            ResponseObligation::ReplyToPush { ref_to_message_id } => {
                let mut reply = self.reply.clone();
                if let Some(pushed) = ref_to_message_id {
                    reply.message_info =
                        MessageInfo::with_id(reply.message_info.message_id.clone())
                            .referring_to(pushed.clone());
                }
                ProducerResponse::message(reply)
            }
            ResponseObligation::Unspecified
            | ResponseObligation::NotPullable
            | ResponseObligation::AwaitingPushLeg => ProducerResponse::NoMessage,
        }
    }
}

/// Outbox that hands out each queued message once
///
/// The message is looked at, then claimed after `claim_delay`. Two pulls
/// interleaving between look and claim would both receive the same message,
/// so this producer relies on the engine serializing pulls per channel.
pub struct QueueProducer {
    name: String,
    claim_delay: Duration,
    queue: Arc<Mutex<VecDeque<UserMessage>>>,
}

impl QueueProducer {
    /// Producer over `messages`
    pub fn new(
        name: impl Into<String>,
        claim_delay: Duration,
        messages: impl IntoIterator<Item = UserMessage>,
    ) -> Self {
        Self {
            name: name.into(),
            claim_delay,
            queue: Arc::new(Mutex::new(messages.into_iter().collect())),
        }
    }

    /// Messages not yet handed out
    pub fn pending(&self) -> Arc<Mutex<VecDeque<UserMessage>>> {
        Arc::clone(&self.queue)
    }
}

#[async_trait]
impl MessageProducer for QueueProducer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_produce(&self, _mpc: &MpcId, _context: &PullContext) -> ProducerResponse {
        let head = self.queue.lock().front().cloned();
        let Some(message) = head else {
            return ProducerResponse::NoMessage;
        };
        tokio::time::sleep(self.claim_delay).await;
        let mut queue = self.queue.lock();
        if queue.front().map(UserMessage::message_id) == Some(message.message_id()) {
            queue.pop_front();
        }
        ProducerResponse::message(message)
    }
}
