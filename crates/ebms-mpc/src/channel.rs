//! Partition channel records

use chrono::{DateTime, Utc};
use ebms_core::MpcId;
use serde::{Deserialize, Serialize};

/// How a channel record came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelOrigin {
    /// The ebMS3 default channel registered at startup
    Default,
    /// Explicitly registered
    Registered,
    /// Created the first time a pull targeted a declared key
    Lazy,
}

/// A Message Partition Channel
///
/// Exists independently of any in-flight message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mpc {
    id: MpcId,
    origin: ChannelOrigin,
    created_at: DateTime<Utc>,
}

impl Mpc {
    /// New explicitly registered channel
    pub fn new(id: MpcId) -> Self {
        Self::with_origin(id, ChannelOrigin::Registered)
    }

    /// New channel with the given origin
    pub fn with_origin(id: MpcId, origin: ChannelOrigin) -> Self {
        Self {
            id,
            origin,
            created_at: Utc::now(),
        }
    }

    /// Channel key
    pub fn id(&self) -> &MpcId {
        &self.id
    }

    /// How the record was created
    pub fn origin(&self) -> ChannelOrigin {
        self.origin
    }

    /// When the record was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
