//! Reliability contract of a P-Mode leg
//!
//! Expresses the negotiated reliability semantics of one leg: at-least-once
//! delivery and its acknowledgment options, at-most-once duplicate
//! elimination, in-order delivery, and reliability group control.
//!
//! Every boolean parameter is a [`TriState`]. The `is_*_defined` accessors
//! report whether a value was configured; the plain `is_*` accessors resolve
//! an undefined value to the field's `DEFAULT_*` constant. Resolution happens
//! only at the point of behavioural use, e.g. when deciding whether to emit
//! an acknowledgment.

use crate::errors::CoreError;
use crate::tristate::TriState;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default for the at-least-once contract
pub const DEFAULT_AT_LEAST_ONCE: bool = false;
/// Default for acknowledging only on application delivery
pub const DEFAULT_AT_LEAST_ONCE_ACK_ON_DELIVERY: bool = false;
/// Default for acknowledging reliable responses
pub const DEFAULT_AT_LEAST_ONCE_ACK_RESPONSE: bool = false;
/// Default for the at-most-once contract
pub const DEFAULT_AT_MOST_ONCE: bool = false;
/// Default for in-order delivery
pub const DEFAULT_IN_ORDER: bool = false;
/// Default for starting a new reliability group
pub const DEFAULT_START_GROUP: bool = false;
/// Default for terminating the reliability group
pub const DEFAULT_TERMINATE_GROUP: bool = false;

/// How reliability acknowledgments travel back to the sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplyPattern {
    /// Synchronously on the back-channel of the underlying protocol
    Response,
    /// As a separate callback to the sender
    Callback,
    /// Pulled separately by the sender
    Poll,
}

impl ReplyPattern {
    /// Name as it appears in P-Mode documents
    pub fn as_str(self) -> &'static str {
        match self {
            ReplyPattern::Response => "Response",
            ReplyPattern::Callback => "Callback",
            ReplyPattern::Poll => "Poll",
        }
    }
}

impl fmt::Display for ReplyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplyPattern {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "response" => Ok(ReplyPattern::Response),
            "callback" => Ok(ReplyPattern::Callback),
            "poll" => Ok(ReplyPattern::Poll),
            other => Err(CoreError::invalid_argument(
                "AtLeastOnceReplyPattern",
                format!("unknown reply pattern '{other}'"),
            )),
        }
    }
}

/// Reliability parameters of one P-Mode leg
///
/// Two contracts are equal iff every field is equal, including the
/// correlation references in order, so contracts can be cached and
/// deduplicated by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReliabilityContract {
    at_least_once: TriState,
    at_least_once_ack_on_delivery: TriState,
    #[serde(deserialize_with = "deserialize_acks_to")]
    at_least_once_acks_to: Option<String>,
    at_least_once_ack_response: TriState,
    at_least_once_reply_pattern: Option<ReplyPattern>,
    at_most_once: TriState,
    in_order: TriState,
    start_group: TriState,
    correlation: Vec<String>,
    terminate_group: TriState,
}

impl ReliabilityContract {
    /// Create a contract from all ten parameters
    ///
    /// `acks_to` absent means acknowledgments go to the same endpoint as the
    /// message channel; when present it must be a URI, so blank values or
    /// values containing whitespace are rejected. An empty `correlation`
    /// means no correlation is defined.
    pub fn new(
        at_least_once: TriState,
        at_least_once_ack_on_delivery: TriState,
        at_least_once_acks_to: Option<String>,
        at_least_once_ack_response: TriState,
        at_least_once_reply_pattern: Option<ReplyPattern>,
        at_most_once: TriState,
        in_order: TriState,
        start_group: TriState,
        correlation: Vec<String>,
        terminate_group: TriState,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            at_least_once,
            at_least_once_ack_on_delivery,
            at_least_once_acks_to: check_acks_to(at_least_once_acks_to)?,
            at_least_once_ack_response,
            at_least_once_reply_pattern,
            at_most_once,
            in_order,
            start_group,
            correlation,
            terminate_group,
        })
    }

    /// Parse the comma-separated correlation list used in P-Mode documents
    ///
    /// Blank entries are rejected; an empty or blank input yields no
    /// correlation.
    pub fn parse_correlation(list: &str) -> Result<Vec<String>, CoreError> {
        if list.trim().is_empty() {
            return Ok(Vec::new());
        }
        list.split(',')
            .map(|part| {
                let part = part.trim();
                if part.is_empty() {
                    Err(CoreError::invalid_argument(
                        "Correlation",
                        "empty element reference in correlation list",
                    ))
                } else {
                    Ok(part.to_string())
                }
            })
            .collect()
    }

    // =========================================================================
    // At-least-once
    // =========================================================================

    /// Whether the at-least-once contract was configured
    pub fn is_at_least_once_defined(&self) -> bool {
        self.at_least_once.is_defined()
    }

    /// At-least-once (guaranteed delivery) between MSH and consumer
    pub fn is_at_least_once(&self) -> bool {
        self.at_least_once.resolve(DEFAULT_AT_LEAST_ONCE)
    }

    /// Raw at-least-once flag
    pub fn at_least_once(&self) -> TriState {
        self.at_least_once
    }

    /// Set the at-least-once flag
    pub fn set_at_least_once(&mut self, value: impl Into<TriState>) {
        self.at_least_once = value.into();
    }

    /// Whether ack-on-delivery was configured
    pub fn is_at_least_once_ack_on_delivery_defined(&self) -> bool {
        self.at_least_once_ack_on_delivery.is_defined()
    }

    /// Acknowledge only once delivered to the consumer rather than on receipt
    pub fn is_at_least_once_ack_on_delivery(&self) -> bool {
        self.at_least_once_ack_on_delivery
            .resolve(DEFAULT_AT_LEAST_ONCE_ACK_ON_DELIVERY)
    }

    /// Raw ack-on-delivery flag
    pub fn at_least_once_ack_on_delivery(&self) -> TriState {
        self.at_least_once_ack_on_delivery
    }

    /// Set the ack-on-delivery flag
    pub fn set_at_least_once_ack_on_delivery(&mut self, value: impl Into<TriState>) {
        self.at_least_once_ack_on_delivery = value.into();
    }

    /// Where acknowledgments are sent; `None` means the message channel's endpoint
    pub fn at_least_once_acks_to(&self) -> Option<&str> {
        self.at_least_once_acks_to.as_deref()
    }

    /// Set the acknowledgment destination
    ///
    /// Blank values are rejected and leave the contract unchanged.
    pub fn set_at_least_once_acks_to(&mut self, acks_to: Option<String>) -> Result<(), CoreError> {
        self.at_least_once_acks_to = check_acks_to(acks_to)?;
        Ok(())
    }

    /// Whether ack-response was configured
    pub fn is_at_least_once_ack_response_defined(&self) -> bool {
        self.at_least_once_ack_response.is_defined()
    }

    /// A reliably sent response must itself be acknowledged
    pub fn is_at_least_once_ack_response(&self) -> bool {
        self.at_least_once_ack_response
            .resolve(DEFAULT_AT_LEAST_ONCE_ACK_RESPONSE)
    }

    /// Raw ack-response flag
    pub fn at_least_once_ack_response(&self) -> TriState {
        self.at_least_once_ack_response
    }

    /// Set the ack-response flag
    pub fn set_at_least_once_ack_response(&mut self, value: impl Into<TriState>) {
        self.at_least_once_ack_response = value.into();
    }

    /// Acknowledgment reply pattern, if configured
    pub fn at_least_once_reply_pattern(&self) -> Option<ReplyPattern> {
        self.at_least_once_reply_pattern
    }

    /// Set the acknowledgment reply pattern
    pub fn set_at_least_once_reply_pattern(&mut self, pattern: Option<ReplyPattern>) {
        self.at_least_once_reply_pattern = pattern;
    }

    // =========================================================================
    // At-most-once and ordering
    // =========================================================================

    /// Whether at-most-once was configured
    pub fn is_at_most_once_defined(&self) -> bool {
        self.at_most_once.is_defined()
    }

    /// Duplicate elimination on receipt
    pub fn is_at_most_once(&self) -> bool {
        self.at_most_once.resolve(DEFAULT_AT_MOST_ONCE)
    }

    /// Raw at-most-once flag
    pub fn at_most_once(&self) -> TriState {
        self.at_most_once
    }

    /// Set the at-most-once flag
    pub fn set_at_most_once(&mut self, value: impl Into<TriState>) {
        self.at_most_once = value.into();
    }

    /// Whether in-order was configured
    pub fn is_in_order_defined(&self) -> bool {
        self.in_order.is_defined()
    }

    /// User messages belong to an ordered sequence
    pub fn is_in_order(&self) -> bool {
        self.in_order.resolve(DEFAULT_IN_ORDER)
    }

    /// Raw in-order flag
    pub fn in_order(&self) -> TriState {
        self.in_order
    }

    /// Set the in-order flag
    pub fn set_in_order(&mut self, value: impl Into<TriState>) {
        self.in_order = value.into();
    }

    // =========================================================================
    // Reliability groups
    // =========================================================================

    /// Whether start-group was configured
    pub fn is_start_group_defined(&self) -> bool {
        self.start_group.is_defined()
    }

    /// Messages start a new reliability group or sequence
    pub fn is_start_group(&self) -> bool {
        self.start_group.resolve(DEFAULT_START_GROUP)
    }

    /// Raw start-group flag
    pub fn start_group(&self) -> TriState {
        self.start_group
    }

    /// Set the start-group flag
    pub fn set_start_group(&mut self, value: impl Into<TriState>) {
        self.start_group = value.into();
    }

    /// Element references correlating a message with an existing group.
    ///
    /// Returns an owned copy; changing it does not affect the contract.
    pub fn correlation(&self) -> Vec<String> {
        self.correlation.clone()
    }

    /// Whether any correlation reference is configured
    pub fn has_correlation(&self) -> bool {
        !self.correlation.is_empty()
    }

    /// Replace the correlation references
    pub fn set_correlation(&mut self, correlation: Vec<String>) {
        self.correlation = correlation;
    }

    /// Whether terminate-group was configured
    pub fn is_terminate_group_defined(&self) -> bool {
        self.terminate_group.is_defined()
    }

    /// Messages close the group they correlate with
    pub fn is_terminate_group(&self) -> bool {
        self.terminate_group.resolve(DEFAULT_TERMINATE_GROUP)
    }

    /// Raw terminate-group flag
    pub fn terminate_group(&self) -> TriState {
        self.terminate_group
    }

    /// Set the terminate-group flag
    pub fn set_terminate_group(&mut self, value: impl Into<TriState>) {
        self.terminate_group = value.into();
    }
}

fn check_acks_to(acks_to: Option<String>) -> Result<Option<String>, CoreError> {
    match acks_to {
        Some(uri) if uri.trim().is_empty() || uri.chars().any(char::is_whitespace) => Err(
            CoreError::invalid_argument("AtLeastOnce.AcksTo", format!("'{uri}' is not a URI")),
        ),
        acks_to => Ok(acks_to),
    }
}

fn deserialize_acks_to<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    check_acks_to(Option::<String>::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(contract: &ReliabilityContract) -> u64 {
        let mut hasher = DefaultHasher::new();
        contract.hash(&mut hasher);
        hasher.finish()
    }

    fn sample() -> ReliabilityContract {
        ReliabilityContract::new(
            TriState::True,
            TriState::False,
            Some("https://ack.example.org/as4".to_string()),
            TriState::Undefined,
            Some(ReplyPattern::Callback),
            TriState::True,
            TriState::Undefined,
            TriState::False,
            vec![
                "eb:UserMessage/eb:CollaborationInfo/eb:ConversationId".to_string(),
                "eb:UserMessage/eb:MessageProperties/eb:Property[@name=\"ProcessInstance\"]"
                    .to_string(),
            ],
            TriState::Undefined,
        )
        .unwrap()
    }

    #[test]
    fn test_defined_tracks_constructor_inputs() {
        let contract = sample();
        assert!(contract.is_at_least_once_defined());
        assert!(contract.is_at_least_once_ack_on_delivery_defined());
        assert!(!contract.is_at_least_once_ack_response_defined());
        assert!(contract.is_at_most_once_defined());
        assert!(!contract.is_in_order_defined());
        assert!(contract.is_start_group_defined());
        assert!(!contract.is_terminate_group_defined());
    }

    #[test]
    fn test_undefined_resolves_to_false() {
        let contract = ReliabilityContract::default();
        assert!(!contract.is_at_least_once());
        assert!(!contract.is_at_least_once_ack_on_delivery());
        assert!(!contract.is_at_least_once_ack_response());
        assert!(!contract.is_at_most_once());
        assert!(!contract.is_in_order());
        assert!(!contract.is_start_group());
        assert!(!contract.is_terminate_group());
        assert_eq!(contract.at_least_once_acks_to(), None);
        assert_eq!(contract.at_least_once_reply_pattern(), None);
        assert!(!contract.has_correlation());
    }

    #[test]
    fn test_explicit_false_is_defined() {
        let mut contract = ReliabilityContract::default();
        contract.set_in_order(false);
        assert!(contract.is_in_order_defined());
        assert!(!contract.is_in_order());
    }

    #[test]
    fn test_setters_touch_only_their_field() {
        let original = sample();

        let mut contract = original.clone();
        contract.set_at_least_once(false);
        assert_eq!(contract.at_least_once(), TriState::False);
        assert_eq!(contract.in_order(), original.in_order());
        assert_eq!(contract.at_most_once(), original.at_most_once());

        let mut contract = original.clone();
        contract.set_at_least_once_ack_on_delivery(true);
        assert_eq!(contract.at_least_once_ack_on_delivery(), TriState::True);
        assert_eq!(contract.in_order(), original.in_order());

        let mut contract = original.clone();
        contract.set_at_least_once_ack_response(Some(true));
        assert_eq!(contract.at_least_once_ack_response(), TriState::True);
        assert_eq!(contract.in_order(), original.in_order());

        let mut contract = original.clone();
        contract.set_at_most_once(TriState::Undefined);
        assert!(!contract.is_at_most_once_defined());
        assert_eq!(contract.in_order(), original.in_order());
    }

    #[test]
    fn test_equal_contracts_hash_identically() {
        let a = sample();
        let b = sample();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_single_field_change_breaks_equality() {
        let base = sample();

        let mut changed = base.clone();
        changed.set_terminate_group(true);
        assert_ne!(base, changed);

        let mut changed = base.clone();
        changed.set_at_least_once_acks_to(None).unwrap();
        assert_ne!(base, changed);

        let mut changed = base.clone();
        changed.set_at_least_once_reply_pattern(Some(ReplyPattern::Poll));
        assert_ne!(base, changed);
    }

    #[test]
    fn test_blank_acks_to_rejected() {
        let mut contract = sample();
        for bad in ["", "   ", "https://ack.example.org/a b"] {
            assert!(matches!(
                contract.set_at_least_once_acks_to(Some(bad.to_string())),
                Err(CoreError::InvalidArgument { .. })
            ));
        }
        assert_eq!(contract.at_least_once_acks_to(), Some("https://ack.example.org/as4"));

        let built = ReliabilityContract::new(
            TriState::True,
            TriState::Undefined,
            Some(String::new()),
            TriState::Undefined,
            None,
            TriState::Undefined,
            TriState::Undefined,
            TriState::Undefined,
            Vec::new(),
            TriState::Undefined,
        );
        assert!(built.is_err());
    }

    #[test]
    fn test_blank_acks_to_rejected_when_deserialized() {
        assert!(serde_json::from_str::<ReliabilityContract>(r#"{"atLeastOnceAcksTo":""}"#).is_err());
        let contract: ReliabilityContract =
            serde_json::from_str(r#"{"atLeastOnceAcksTo":"https://ack.example.org/as4"}"#).unwrap();
        assert_eq!(contract.at_least_once_acks_to(), Some("https://ack.example.org/as4"));
        let absent: ReliabilityContract = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.at_least_once_acks_to(), None);
    }

    #[test]
    fn test_correlation_order_matters() {
        let base = sample();
        let mut reversed = base.clone();
        let mut refs = base.correlation();
        refs.reverse();
        reversed.set_correlation(refs);
        assert_ne!(base, reversed);
    }

    #[test]
    fn test_correlation_is_a_copy() {
        let contract = sample();
        let mut refs = contract.correlation();
        refs.clear();
        refs.push("eb:UserMessage/eb:MessageInfo/eb:MessageId".to_string());
        assert_eq!(contract.correlation().len(), 2);
        assert_eq!(contract, sample());
    }

    #[test]
    fn test_parse_correlation() {
        let refs = ReliabilityContract::parse_correlation(
            "eb:UserMessage/eb:CollaborationInfo/eb:ConversationId, eb:UserMessage/eb:PartyInfo",
        )
        .unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[1], "eb:UserMessage/eb:PartyInfo");

        assert!(ReliabilityContract::parse_correlation("  ").unwrap().is_empty());
        assert!(ReliabilityContract::parse_correlation("a,,b").is_err());
    }

    #[test]
    fn test_reply_pattern_parse() {
        assert_eq!("poll".parse::<ReplyPattern>(), Ok(ReplyPattern::Poll));
        assert_eq!("Response".parse::<ReplyPattern>(), Ok(ReplyPattern::Response));
        assert!("sometimes".parse::<ReplyPattern>().is_err());
        assert_eq!(ReplyPattern::Callback.to_string(), "Callback");
    }

    #[test]
    fn test_serde_roundtrip_keeps_undefined() {
        let contract = sample();
        let json = serde_json::to_string(&contract).unwrap();
        assert!(json.contains("\"inOrder\":\"undefined\""));
        let back: ReliabilityContract = serde_json::from_str(&json).unwrap();
        assert_eq!(back, contract);

        let partial: ReliabilityContract =
            serde_json::from_str(r#"{"atMostOnce":"true"}"#).unwrap();
        assert!(partial.is_at_most_once());
        assert!(!partial.is_at_least_once_defined());
    }
}
