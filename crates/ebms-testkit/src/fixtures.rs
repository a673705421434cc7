//! Message, P-Mode and engine fixtures

use crate::signals::RecordingSignals;
use ebms_core::messages::{CollaborationInfo, Party, PartyInfo, Property};
use ebms_core::{
    MepBinding, MessageInfo, MpcId, PMode, PModeLeg, UserMessage, FINAL_RECIPIENT,
    ORIGINAL_SENDER,
};
use ebms_mpc::MpcRegistry;
use ebms_pull::{
    EngineConfig, ExchangeContext, ExchangeHistory, MessageProducer, ProducerRegistry,
    ProducerScope, PullEngine,
};
use std::sync::Arc;

/// Party id used for both sides of test exchanges
pub const DEFAULT_PARTY_ID: &str = "APP_1000000101";

/// Value of the `originalSender` property on test messages
pub const TEST_ORIGINAL_SENDER: &str = "C1-test";

/// Value of the `finalRecipient` property on test messages
pub const TEST_FINAL_RECIPIENT: &str = "C4-test";

/// ebMS3 default initiator role
pub const INITIATOR_ROLE: &str =
    "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/initiator";

/// ebMS3 default responder role
pub const RESPONDER_ROLE: &str =
    "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/responder";

/// Channel key registered by [`test_engine`] besides the default channel
pub const TEST_MPC: &str = "urn:fdc:ebms:mpc:test";

/// A user message with `message_id` on the default channel
pub fn test_user_message(message_id: &str) -> UserMessage {
    UserMessage {
        message_info: MessageInfo::with_id(message_id),
        party_info: PartyInfo {
            from: Party {
                id: DEFAULT_PARTY_ID.to_string(),
                role: INITIATOR_ROLE.to_string(),
            },
            to: Party {
                id: DEFAULT_PARTY_ID.to_string(),
                role: RESPONDER_ROLE.to_string(),
            },
        },
        collaboration_info: CollaborationInfo {
            agreement_ref: None,
            pmode_id: None,
            service_type: None,
            service: "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/service"
                .to_string(),
            action: "http://docs.oasis-open.org/ebxml-msg/ebms/v3.0/ns/core/200704/test"
                .to_string(),
            conversation_id: format!("conversation-{message_id}"),
        },
        properties: vec![
            Property::new(ORIGINAL_SENDER, TEST_ORIGINAL_SENDER),
            Property::new(FINAL_RECIPIENT, TEST_FINAL_RECIPIENT),
        ],
        mpc: None,
        payload: format!("<Payload id=\"{message_id}\"/>").into_bytes(),
    }
}

/// A user message placed on `mpc`
pub fn test_user_message_on(message_id: &str, mpc: &MpcId) -> UserMessage {
    let mut message = test_user_message(message_id);
    message.mpc = Some(mpc.clone());
    message
}

/// Parse a channel key that is known to be valid
pub fn mpc(key: &str) -> MpcId {
    MpcId::new(key).unwrap()
}

/// Exchange context with a random pull message id and no P-Mode
pub fn pull_exchange() -> ExchangeContext {
    ExchangeContext::new(MessageInfo::new())
}

/// Two-way (or one-way) P-Mode for `binding` whose pulled legs sit on `channel`
pub fn pmode_for(binding: MepBinding, channel: &MpcId) -> PMode {
    let leg = PModeLeg::on_channel(channel.clone());
    let leg2 = match binding.mep() {
        ebms_core::Mep::OneWay => None,
        ebms_core::Mep::TwoWay => Some(leg.clone()),
    };
    PMode::new(format!("pm-{binding}"), binding, leg, leg2).unwrap()
}

/// Exchange context governed by a P-Mode for `binding`
pub fn exchange_for(binding: MepBinding, channel: &MpcId, history: ExchangeHistory) -> ExchangeContext {
    pull_exchange()
        .with_pmode(pmode_for(binding, channel))
        .with_history(history)
}

/// Engine with the default channel and [`TEST_MPC`] registered and a
/// recording signal callback
pub fn test_engine(
    producers: Vec<(ProducerScope, Arc<dyn MessageProducer>)>,
) -> (PullEngine, RecordingSignals) {
    test_engine_with_config(EngineConfig::testing(), producers)
}

/// Like [`test_engine`] with an explicit configuration
pub fn test_engine_with_config(
    config: EngineConfig,
    producers: Vec<(ProducerScope, Arc<dyn MessageProducer>)>,
) -> (PullEngine, RecordingSignals) {
    let channels: MpcRegistry = config.build_registry().unwrap();
    channels.ensure(TEST_MPC).unwrap();
    let registry = ProducerRegistry::new();
    for (scope, producer) in producers {
        registry.register(scope, producer);
    }
    let signals = RecordingSignals::new();
    let engine = PullEngine::new(Arc::new(channels), Arc::new(registry), config)
        .with_signals(signals.clone());
    (engine, signals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_carries_routing_properties() {
        let message = test_user_message("fixture@ebms");
        assert_eq!(message.property(ORIGINAL_SENDER), Some(TEST_ORIGINAL_SENDER));
        assert_eq!(message.property(FINAL_RECIPIENT), Some(TEST_FINAL_RECIPIENT));
        assert_eq!(message.message_id(), "fixture@ebms");
    }

    #[test]
    fn test_pmode_for_matches_binding_legs() {
        let channel = mpc(TEST_MPC);
        let two_way = pmode_for(MepBinding::PushAndPull, &channel);
        assert_eq!(two_way.channels(), vec![&channel, &channel]);

        let one_way = pmode_for(MepBinding::Pull, &channel);
        assert!(one_way.leg(2).is_none());
    }
}
