//! Property test strategies for ebMS types

use crate::fixtures::test_user_message;
use ebms_core::{ReliabilityContract, ReplyPattern, TriState};
use ebms_pull::{ProducerAnswer, ProducerResponse};
use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

/// Any tri-state value
pub fn arb_tristate() -> impl Strategy<Value = TriState> {
    prop_oneof![
        Just(TriState::True),
        Just(TriState::False),
        Just(TriState::Undefined),
    ]
}

/// Any reply pattern, or none
pub fn arb_reply_pattern() -> impl Strategy<Value = Option<ReplyPattern>> {
    prop::option::of(prop_oneof![
        Just(ReplyPattern::Response),
        Just(ReplyPattern::Callback),
        Just(ReplyPattern::Poll),
    ])
}

/// A syntactically valid channel key
pub fn arb_mpc_key() -> impl Strategy<Value = String> {
    "urn:mpc:[a-z0-9]{1,12}"
}

/// A reliability contract with every field drawn independently
pub fn arb_reliability_contract() -> impl Strategy<Value = ReliabilityContract> {
    (
        (arb_tristate(), arb_tristate(), prop::option::of("https://ack\\.example/[a-z]{1,6}")),
        (arb_tristate(), arb_reply_pattern(), arb_tristate(), arb_tristate()),
        (
            arb_tristate(),
            prop::collection::vec("eb:[A-Za-z]{1,10}", 0..4),
            arb_tristate(),
        ),
    )
        .prop_map(
            |(
                (at_least_once, ack_on_delivery, acks_to),
                (ack_response, reply_pattern, at_most_once, in_order),
                (start_group, correlation, terminate_group),
            )| {
                ReliabilityContract::new(
                    at_least_once,
                    ack_on_delivery,
                    acks_to,
                    ack_response,
                    reply_pattern,
                    at_most_once,
                    in_order,
                    start_group,
                    correlation,
                    terminate_group,
                )
                .unwrap()
            },
        )
}

/// Answer of producer number `index`: nothing, a failure, or a message
pub fn arb_producer_answer(index: usize) -> impl Strategy<Value = ProducerAnswer> {
    prop_oneof![
        Just(ProducerResponse::NoMessage),
        Just(ProducerResponse::failed("unavailable")),
        Just(ProducerResponse::message(test_user_message(&format!(
            "m{index}@ebms"
        )))),
    ]
    .prop_map(move |response| ProducerAnswer {
        producer: format!("producer-{index}"),
        response,
    })
}

/// Answers of up to `max` distinct producers
pub fn arb_producer_answers(max: usize) -> impl Strategy<Value = Vec<ProducerAnswer>> {
    (0..=max).prop_flat_map(|count| {
        (0..count)
            .map(arb_producer_answer)
            .collect::<Vec<_>>()
    })
}
