//! Logical ebMS message model
//!
//! The core never touches raw markup. These types are what the wire codec
//! (see [`crate::effects::WireCodec`]) converts to and from the transport
//! payload.

pub mod header;

pub use header::{
    CollaborationInfo, MessageInfo, Party, PartyInfo, Property, FINAL_RECIPIENT,
    MESSAGE_ID_SUFFIX, ORIGINAL_SENDER,
};

use crate::mpc::MpcId;
use serde::{Deserialize, Serialize};

/// A business document together with its ebMS header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessage {
    /// Identity and timing
    pub message_info: MessageInfo,
    /// Sender and receiver
    pub party_info: PartyInfo,
    /// Collaboration context
    pub collaboration_info: CollaborationInfo,
    /// Message properties
    pub properties: Vec<Property>,
    /// Channel the message is placed on, absent for the default channel
    pub mpc: Option<MpcId>,
    /// Opaque business payload
    pub payload: Vec<u8>,
}

impl UserMessage {
    /// Message id of the user message
    pub fn message_id(&self) -> &str {
        &self.message_info.message_id
    }

    /// Value of the first property with `name`
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Effective channel, falling back to the default channel
    pub fn effective_mpc(&self) -> MpcId {
        self.mpc.clone().unwrap_or_else(MpcId::default_mpc)
    }
}

/// A pull request signal
///
/// The channel key is kept as received: it may be absent or malformed, both
/// of which are protocol errors decided by the arbitration engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    /// Identity and timing of the signal
    pub message_info: MessageInfo,
    /// Requested channel key, verbatim
    pub mpc: Option<String>,
}

impl PullRequest {
    /// Pull request for a channel key
    pub fn new(mpc: Option<impl Into<String>>) -> Self {
        Self {
            message_info: MessageInfo::new(),
            mpc: mpc.map(Into::into),
        }
    }

    /// Message id of the signal
    pub fn message_id(&self) -> &str {
        &self.message_info.message_id
    }
}
