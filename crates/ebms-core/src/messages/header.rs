//! Header blocks shared by user and signal messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Suffix appended to generated message ids
pub const MESSAGE_ID_SUFFIX: &str = "@ebms";

/// Message property naming the original sender (C1)
pub const ORIGINAL_SENDER: &str = "originalSender";

/// Message property naming the final recipient (C4)
pub const FINAL_RECIPIENT: &str = "finalRecipient";

/// Identity and timing of a single message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageInfo {
    /// Globally unique message id
    pub message_id: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Id of the message this one refers to
    pub ref_to_message_id: Option<String>,
}

impl MessageInfo {
    /// New message info with a random id and the current time
    pub fn new() -> Self {
        Self::with_id(Self::random_message_id())
    }

    /// Message info with a caller-chosen id
    pub fn with_id(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            timestamp: Utc::now(),
            ref_to_message_id: None,
        }
    }

    /// Set the referenced message id
    pub fn referring_to(mut self, message_id: impl Into<String>) -> Self {
        self.ref_to_message_id = Some(message_id.into());
        self
    }

    /// Generate a random message id
    pub fn random_message_id() -> String {
        format!("{}{MESSAGE_ID_SUFFIX}", Uuid::new_v4())
    }
}

impl Default for MessageInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// A party with its role in the exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Party identifier
    pub id: String,
    /// Role URI
    pub role: String,
}

/// Sending and receiving party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfo {
    /// Sender
    pub from: Party,
    /// Receiver
    pub to: Party,
}

/// Business collaboration the message belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationInfo {
    /// Agreement reference
    pub agreement_ref: Option<String>,
    /// P-Mode the message was sent under
    pub pmode_id: Option<String>,
    /// Service type
    pub service_type: Option<String>,
    /// Service
    pub service: String,
    /// Action within the service
    pub action: String,
    /// Conversation the message belongs to
    pub conversation_id: String,
}

/// Named message property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Optional property type
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Property value
    pub value: String,
}

impl Property {
    /// Untyped property
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            value: value.into(),
        }
    }

    /// Typed property
    pub fn typed(name: impl Into<String>, kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind.into()),
            value: value.into(),
        }
    }
}
